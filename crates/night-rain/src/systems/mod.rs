pub mod render;
pub mod weather;
