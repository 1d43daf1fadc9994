use glam::Vec3;
use night_rain::{build_frame_buffers, FrameBuffers, FrameStats, RainConfig, RainState, SoundEvent};

/// Wires one rain simulation to the flat buffers the JavaScript host reads.
///
/// The bridge keeps a single `thread_local!` RainRunner and exports free
/// functions via `#[wasm_bindgen]`, since wasm-bindgen cannot export
/// structs holding borrowed snapshots.
pub struct RainRunner {
    state: RainState,
    buffers: FrameBuffers,
    /// Flat `[kind, x, y, z]` records for this frame's sounds.
    sound_buffer: Vec<f32>,
    stats: FrameStats,
}

impl RainRunner {
    pub fn new(config: RainConfig, seed: u64) -> Self {
        let buffers = FrameBuffers::with_capacity(config.rain_density as usize * 8);
        Self {
            state: RainState::new(config, seed),
            buffers,
            sound_buffer: Vec::with_capacity(64 * SoundEvent::FLOATS),
            stats: FrameStats::new(),
        }
    }

    /// Run one frame: advance the simulation, rebuild instance buffers, pack sounds.
    pub fn tick(&mut self, dt: f32, camera: Vec3) {
        self.stats.record(dt);
        self.state.tick(dt, camera);

        let snapshot = self.state.snapshot();
        build_frame_buffers(&snapshot, self.state.config(), &mut self.buffers);

        self.sound_buffer.clear();
        for sound in self.state.sounds() {
            self.sound_buffer.extend_from_slice(&sound.to_floats());
        }
    }

    /// Merge a (possibly partial) JSON document into the current configuration.
    /// Bad JSON leaves the current config untouched.
    pub fn set_config_json(&mut self, json: &str) -> bool {
        match self.state.config().merge_json(json) {
            Ok(config) => {
                self.state.set_config(config);
                true
            }
            Err(e) => {
                log::warn!("rejected rain config: {}", e);
                false
            }
        }
    }

    pub fn config_json(&self) -> String {
        match self.state.config().to_json() {
            Ok(json) => json,
            Err(e) => {
                log::warn!("failed to serialize rain config: {}", e);
                String::new()
            }
        }
    }

    pub fn set_lightning_enabled(&mut self, enabled: bool) {
        self.state.config_mut().lightning.enabled = enabled;
    }

    pub fn set_density(&mut self, density: u32) {
        self.state.config_mut().rain_density = density;
    }

    /// Regenerate stars and clouds so new ambient counts take effect.
    pub fn reset_ambient(&mut self) {
        self.state.reset_ambient();
    }

    pub fn state(&self) -> &RainState {
        &self.state
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    // ---- Pointer accessors for the host's buffer reads ----

    pub fn drops_ptr(&self) -> *const f32 {
        self.buffers.drop_floats().as_ptr()
    }

    pub fn drop_count(&self) -> u32 {
        self.buffers.drops.len() as u32
    }

    pub fn trails_ptr(&self) -> *const f32 {
        self.buffers.trail_floats().as_ptr()
    }

    pub fn trail_vertex_count(&self) -> u32 {
        self.buffers.trails.len() as u32
    }

    pub fn ripples_ptr(&self) -> *const f32 {
        self.buffers.ripple_floats().as_ptr()
    }

    pub fn ripple_instance_count(&self) -> u32 {
        self.buffers.ripples.len() as u32
    }

    pub fn bolts_ptr(&self) -> *const f32 {
        self.buffers.bolt_floats().as_ptr()
    }

    pub fn bolt_vertex_count(&self) -> u32 {
        self.buffers.bolts.len() as u32
    }

    pub fn sky_ptr(&self) -> *const f32 {
        self.buffers.sky_floats().as_ptr()
    }

    pub fn sky_count(&self) -> u32 {
        self.buffers.sky.len() as u32
    }

    pub fn sound_events_ptr(&self) -> *const f32 {
        self.sound_buffer.as_ptr()
    }

    /// Number of sound events, not floats.
    pub fn sound_events_len(&self) -> u32 {
        (self.sound_buffer.len() / SoundEvent::FLOATS) as u32
    }
}
