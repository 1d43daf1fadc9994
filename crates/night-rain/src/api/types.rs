use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Linear RGB color, each channel nominally in [0, 1].
pub type Rgb = [f32; 3];

/// Which sound the audio host should play.
/// The numeric value is what the web bridge writes into the event buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SoundKind {
    /// A raindrop crossed the water plane.
    Impact = 0,
    /// A ripple started spreading.
    Ripple = 1,
}

/// A fire-and-forget "play this sound here" request.
/// Volume and pan are the audio host's business; only the source position is reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundEvent {
    pub kind: SoundKind,
    pub position: Vec3,
}

impl SoundEvent {
    /// Floats per event in the flat bridge buffer: kind, x, y, z.
    pub const FLOATS: usize = 4;

    pub fn impact(position: Vec3) -> Self {
        Self { kind: SoundKind::Impact, position }
    }

    pub fn ripple(position: Vec3) -> Self {
        Self { kind: SoundKind::Ripple, position }
    }

    pub fn to_floats(&self) -> [f32; Self::FLOATS] {
        [
            self.kind as u8 as f32,
            self.position.x,
            self.position.y,
            self.position.z,
        ]
    }
}

/// Anything that can receive sound events. Entities get one of these for the
/// duration of an update call instead of holding a reference to their owner.
pub trait SoundSink {
    fn play(&mut self, event: SoundEvent);
}

impl SoundSink for Vec<SoundEvent> {
    fn play(&mut self, event: SoundEvent) {
        self.push(event);
    }
}
