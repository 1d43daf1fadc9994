//! Expanding rings left on the water by raindrop impacts.

use glam::Vec3;

use super::rng::Rng;
use crate::api::config::RippleConfig;
use crate::api::types::Rgb;

/// Ripples sit just above the water so they never z-fight with it.
pub const SURFACE_OFFSET: f32 = 0.02;

/// Opacity at or below which a ripple counts as faded out.
pub const FADE_EPSILON: f32 = 0.02;

/// Per-ripple parameters, rolled once at creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleParams {
    pub seed_radius: f32,
    pub max_radius: f32,
    pub thickness: f32,
    pub growth_rate: f32,
    pub max_lifetime: f32,
    pub pulse_frequency: f32,
    pub pulse_amplitude: f32,
    pub wave_height: f32,
    pub growth_damping: f32,
    pub fade_exponent: f32,
}

impl Default for RippleParams {
    fn default() -> Self {
        Self {
            seed_radius: 0.5,
            max_radius: 5.0,
            thickness: 0.2,
            growth_rate: 2.0,
            max_lifetime: 2.0,
            pulse_frequency: 0.0,
            pulse_amplitude: 0.0,
            wave_height: 0.0,
            growth_damping: 0.5,
            fade_exponent: 2.0,
        }
    }
}

impl RippleParams {
    pub fn roll(config: &RippleConfig, rng: &mut Rng) -> Self {
        let mut roll = |(min, max): (f32, f32)| rng.range(min, max);
        Self {
            seed_radius: config.seed_radius,
            max_radius: roll(config.max_radius),
            thickness: roll(config.thickness),
            growth_rate: roll(config.growth_rate),
            max_lifetime: roll(config.max_lifetime),
            pulse_frequency: roll(config.pulse_frequency),
            pulse_amplitude: roll(config.pulse_amplitude),
            wave_height: roll(config.wave_height),
            growth_damping: config.growth_damping,
            fade_exponent: config.fade_exponent,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WaterRipple {
    pub position: Vec3,
    pub color: Rgb,
    pub radius: f32,
    pub thickness: f32,
    pub opacity: f32,
    pub wave_height: f32,
    /// Seconds since creation.
    pub lifetime: f32,
    base_opacity: f32,
    params: RippleParams,
}

impl WaterRipple {
    /// Create a ripple at `at`, pinned to the water plane.
    pub fn new(at: Vec3, water_height: f32, color: Rgb, params: RippleParams) -> Self {
        Self {
            position: Vec3::new(at.x, water_height + SURFACE_OFFSET, at.z),
            color,
            radius: params.seed_radius.min(params.max_radius),
            thickness: params.thickness,
            opacity: 1.0,
            wave_height: params.wave_height,
            lifetime: 0.0,
            base_opacity: 1.0,
            params,
        }
    }

    pub fn params(&self) -> &RippleParams {
        &self.params
    }

    pub fn max_radius(&self) -> f32 {
        self.params.max_radius
    }

    pub fn max_lifetime(&self) -> f32 {
        self.params.max_lifetime
    }

    /// Fraction of the maximum lifetime used so far, clamped to [0, 1].
    pub fn progress(&self) -> f32 {
        if self.params.max_lifetime <= 0.0 {
            return 1.0;
        }
        (self.lifetime / self.params.max_lifetime).clamp(0.0, 1.0)
    }

    /// Advance one tick. Returns true once the ripple is dead.
    pub fn update(&mut self, dt: f32) -> bool {
        self.lifetime += dt;
        let p = &self.params;
        let progress = self.progress();

        // Growth slows with age but never reverses
        let growth_factor = (1.0 - progress * p.growth_damping).max(0.0);
        self.radius = (self.radius + p.growth_rate * dt * growth_factor).min(p.max_radius);

        let phase = self.lifetime * p.pulse_frequency;
        self.thickness = 0.3 + 0.4 * phase.sin() * p.pulse_amplitude;
        self.opacity = self.base_opacity * (1.0 - progress.powf(p.fade_exponent));
        self.wave_height = (0.1 + 0.2 * (phase * 1.2).sin()) * (1.0 - progress);

        self.is_dead()
    }

    /// Any one of: full size, faded out, out of time.
    pub fn is_dead(&self) -> bool {
        self.radius >= self.params.max_radius
            || self.opacity <= FADE_EPSILON
            || self.lifetime >= self.params.max_lifetime
    }
}
