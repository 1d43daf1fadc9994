pub mod instance;

pub use instance::{
    BoltVertex, DropInstance, FrameBuffers, RippleInstance, SkyInstance, TrailVertex,
};
