//! Rain simulation: raindrops, ripples, lightning and the ambient sky.
//!
//! This module provides the `RainState` facade that owns every entity
//! collection and runs the per-frame update, plus the individual entity
//! types, which can be used directly if needed.

mod rng;
mod raindrop;
mod ripple;
mod lightning;
mod ambient;
mod spawn;

// Re-export public types
pub use rng::Rng;
pub use raindrop::{layer_depth, DropState, FallPhysics, Impact, Raindrop, TrailSample};
pub use ripple::{RippleParams, WaterRipple, FADE_EPSILON, SURFACE_OFFSET};
pub use lightning::LightningBolt;
pub use ambient::{AmbientField, Cloud, Moon, Star};
pub use spawn::{lightning_endpoints, raindrop_position, DistanceBand};

use glam::Vec3;

use crate::api::config::{RainConfig, RippleConfig};
use crate::api::types::{SoundEvent, SoundSink};
use crate::core::time::{IntervalGate, SimClock};

/// Read-only view of the simulation after a tick, for the renderer.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub raindrops: &'a [Raindrop],
    pub ripples: &'a [WaterRipple],
    pub lightning: &'a [LightningBolt],
    pub stars: &'a [Star],
    pub clouds: &'a [Cloud],
    pub moon: &'a Moon,
    pub camera: Vec3,
    pub total_time: f32,
}

/// Owns every entity collection and advances them in a fixed order each tick:
/// spawn, raindrops, ripples, ambient sky, lightning.
pub struct RainState {
    raindrops: Vec<Raindrop>,
    ripples: Vec<WaterRipple>,
    /// Ripples from this tick's impacts. Hidden from snapshots until the next tick.
    pending_ripples: Vec<WaterRipple>,
    /// Last tick's impacts, joined at the start of this tick's ripple pass.
    arriving_ripples: Vec<WaterRipple>,
    lightning: Vec<LightningBolt>,
    ambient: AmbientField,
    sounds: Vec<SoundEvent>,
    config: RainConfig,
    rng: Rng,
    clock: SimClock,
    spawn_gate: IntervalGate,
    lightning_gate: IntervalGate,
    camera: Vec3,
}

impl RainState {
    /// Camera pose used until the host supplies one.
    pub const DEFAULT_CAMERA: Vec3 = Vec3::new(0.0, 60.0, 120.0);

    /// Create a new RainState with the given configuration and RNG seed.
    pub fn new(config: RainConfig, seed: u64) -> Self {
        let mut rng = Rng::new(seed.wrapping_add(7919));
        let ambient = AmbientField::new(&config.ambient, &mut rng);
        log::debug!(
            "rain state: {} stars, {} clouds, density {}",
            ambient.stars.len(),
            ambient.clouds.len(),
            config.rain_density
        );
        RainState {
            raindrops: Vec::with_capacity(4096),
            ripples: Vec::with_capacity(1024),
            pending_ripples: Vec::new(),
            arriving_ripples: Vec::new(),
            lightning: Vec::new(),
            ambient,
            sounds: Vec::with_capacity(64),
            spawn_gate: IntervalGate::new(config.spawn_interval),
            lightning_gate: IntervalGate::new(config.lightning.first_strike_delay),
            config,
            rng,
            clock: SimClock::new(),
            camera: Self::DEFAULT_CAMERA,
        }
    }

    /// Advance the simulation by `dt` seconds as seen from `camera`.
    /// Sound events from this tick are available from [`Self::sounds`] until the next tick.
    pub fn tick(&mut self, dt: f32, camera: Vec3) {
        self.sounds.clear();
        if !dt.is_finite() || dt <= 0.0 {
            log::warn!("ignoring frame with dt = {}", dt);
            return;
        }
        self.camera = camera;
        std::mem::swap(&mut self.pending_ripples, &mut self.arriving_ripples);

        self.clock.advance(dt);

        self.spawn_gate.set_interval(self.config.spawn_interval);
        if self.spawn_gate.accumulate(dt) {
            self.spawn_raindrops();
        }

        self.update_raindrops(dt);

        self.ripples.append(&mut self.arriving_ripples);
        self.ripples.retain_mut(|r| !r.update(dt));

        self.ambient
            .update(self.clock.total(), dt, &self.config.ambient, &mut self.rng);

        self.update_lightning(dt);
    }

    /// Roll `rain_density / 4` spawn candidates, each gated by `spawn_chance`.
    fn spawn_raindrops(&mut self) {
        let camera = self.camera;
        for _ in 0..self.config.spawn_candidates() {
            if !self.rng.chance(self.config.spawn_chance) {
                continue;
            }
            let position = raindrop_position(camera, &mut self.rng);
            let drop = Raindrop::spawn(position, camera, &self.config, &mut self.rng);
            self.raindrops.push(drop);
        }
    }

    fn update_raindrops(&mut self, dt: f32) {
        let physics = FallPhysics::from_config(&self.config, self.camera);
        let RainState {
            raindrops,
            pending_ripples,
            sounds,
            rng,
            config,
            ..
        } = self;

        raindrops.retain_mut(|drop| {
            if let Some(impact) = drop.update(dt, &physics, sounds) {
                let ripple = ripple_from_impact(&impact, config.water_height, &config.ripple, rng);
                if rng.chance(config.ripple.sound_chance) {
                    sounds.play(SoundEvent::ripple(ripple.position));
                }
                pending_ripples.push(ripple);
            }
            !drop.is_dead()
        });
    }

    fn update_lightning(&mut self, dt: f32) {
        if self.config.lightning.enabled && self.lightning_gate.accumulate(dt) {
            self.strike_lightning();
            let frequency = self.config.lightning.frequency;
            let next = frequency + self.rng.next_f32() * frequency;
            self.lightning_gate.set_interval(next);
        }
        // Bolts already in flight burn out even if lightning was just disabled
        self.lightning.retain_mut(|bolt| bolt.update(dt));
    }

    /// Spawn one lightning bolt from the sky to near the water, around the camera.
    pub fn strike_lightning(&mut self) {
        let (start, end) = lightning_endpoints(
            self.camera,
            self.config.water_height,
            &self.config.lightning,
            &mut self.rng,
        );
        let bolt = LightningBolt::generate(start, end, &self.config.lightning, &mut self.rng);
        log::debug!(
            "lightning: {} segments, {} branches, {:.2}s",
            bolt.num_segments(),
            bolt.branches,
            bolt.duration
        );
        self.lightning.push(bolt);
    }

    /// Insert a pre-built raindrop. It is updated from the next tick on.
    pub fn spawn_raindrop(&mut self, drop: Raindrop) {
        self.raindrops.push(drop);
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            raindrops: &self.raindrops,
            ripples: &self.ripples,
            lightning: &self.lightning,
            stars: &self.ambient.stars,
            clouds: &self.ambient.clouds,
            moon: &self.ambient.moon,
            camera: self.camera,
            total_time: self.clock.total(),
        }
    }

    /// Sound events emitted by the most recent tick.
    pub fn sounds(&self) -> &[SoundEvent] {
        &self.sounds
    }

    pub fn config(&self) -> &RainConfig {
        &self.config
    }

    /// Mutable access for the UI. Applies to future spawns and updates only.
    pub fn config_mut(&mut self) -> &mut RainConfig {
        &mut self.config
    }

    pub fn set_config(&mut self, config: RainConfig) {
        self.config = config;
    }

    /// Regenerate stars and clouds, e.g. after changing their counts.
    pub fn reset_ambient(&mut self) {
        self.ambient = AmbientField::new(&self.config.ambient, &mut self.rng);
    }

    /// Remove every raindrop, ripple and bolt. The sky and clock are kept.
    pub fn clear(&mut self) {
        self.raindrops.clear();
        self.ripples.clear();
        self.pending_ripples.clear();
        self.arriving_ripples.clear();
        self.lightning.clear();
        self.sounds.clear();
    }

    pub fn camera(&self) -> Vec3 {
        self.camera
    }

    pub fn total_time(&self) -> f32 {
        self.clock.total()
    }

    pub fn raindrop_count(&self) -> usize {
        self.raindrops.len()
    }

    pub fn ripple_count(&self) -> usize {
        self.ripples.len()
    }

    pub fn lightning_count(&self) -> usize {
        self.lightning.len()
    }
}

impl Default for RainState {
    fn default() -> Self {
        Self::new(RainConfig::default(), 42)
    }
}

/// Build the ripple a raindrop leaves behind.
fn ripple_from_impact(
    impact: &Impact,
    water_height: f32,
    config: &RippleConfig,
    rng: &mut Rng,
) -> WaterRipple {
    let color = if config.inherit_drop_color {
        impact.color
    } else {
        rng.pick(&config.colors).copied().unwrap_or(impact.color)
    };
    let params = RippleParams::roll(config, rng);
    WaterRipple::new(impact.position, water_height, color, params)
}
