use bytemuck::{Pod, Zeroable};

/// A falling raindrop head. 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DropInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// World-space point size.
    pub size: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Current brightness (can exceed 1.0 for near drops).
    pub alpha: f32,
}

/// One sample of a raindrop trail, drawn as a fading point. 8 floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TrailVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Shrinks toward the tail.
    pub size: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub alpha: f32,
}

/// A ripple on the water plane. 12 floats = 48 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RippleInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub radius: f32,
    pub thickness: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Opacity after the visibility multiplier.
    pub alpha: f32,
    pub wave_height: f32,
    /// Concentric rings to draw.
    pub rings: f32,
    pub _pad: f32,
}

/// One end of a lightning segment. Bolts are written as a line list:
/// two vertices per segment. 8 floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BoltVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub thickness: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub intensity: f32,
}

/// Star, cloud or moon billboard. 8 floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SkyInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub size: f32,
    /// Brightness for stars and the moon, opacity for clouds and the halo.
    pub alpha: f32,
    /// One of the `SkyInstance::KIND_*` constants.
    pub kind: f32,
    pub _pad: [f32; 2],
}

impl SkyInstance {
    pub const KIND_STAR: f32 = 0.0;
    pub const KIND_CLOUD: f32 = 1.0;
    pub const KIND_MOON: f32 = 2.0;
    pub const KIND_HALO: f32 = 3.0;
}

/// Per-frame instance data handed to the renderer.
#[derive(Debug, Default)]
pub struct FrameBuffers {
    pub drops: Vec<DropInstance>,
    pub trails: Vec<TrailVertex>,
    pub ripples: Vec<RippleInstance>,
    pub bolts: Vec<BoltVertex>,
    pub sky: Vec<SkyInstance>,
}

impl FrameBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the given number of raindrops.
    pub fn with_capacity(max_drops: usize) -> Self {
        Self {
            drops: Vec::with_capacity(max_drops),
            trails: Vec::with_capacity(max_drops * 8),
            ripples: Vec::with_capacity(max_drops / 4),
            bolts: Vec::with_capacity(64),
            sky: Vec::with_capacity(160),
        }
    }

    pub fn clear(&mut self) {
        self.drops.clear();
        self.trails.clear();
        self.ripples.clear();
        self.bolts.clear();
        self.sky.clear();
    }

    pub fn drop_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.drops)
    }

    pub fn trail_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.trails)
    }

    pub fn ripple_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.ripples)
    }

    pub fn bolt_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.bolts)
    }

    pub fn sky_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.sky)
    }
}
