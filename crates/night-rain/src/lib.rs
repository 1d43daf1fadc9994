pub mod api;
pub mod core;
pub mod systems;
pub mod renderer;

// Re-export key types at crate root for convenience
pub use api::config::{AmbientConfig, LightningConfig, RainConfig, RippleConfig};
pub use api::types::{Rgb, SoundEvent, SoundKind, SoundSink};
pub use core::time::{FrameStats, IntervalGate, SimClock};
pub use renderer::instance::{
    BoltVertex, DropInstance, FrameBuffers, RippleInstance, SkyInstance, TrailVertex,
};
pub use systems::render::build_frame_buffers;
pub use systems::weather::{
    AmbientField, Cloud, DropState, FallPhysics, Impact, LightningBolt, Moon, RainState,
    Raindrop, RippleParams, Rng, Snapshot, Star, TrailSample, WaterRipple,
};
