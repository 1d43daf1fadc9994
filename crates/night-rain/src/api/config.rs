//! Tunable simulation parameters.
//!
//! The UI layer owns a copy of `RainConfig` and pushes it into the
//! simulation whenever a slider moves. Every struct here is `#[serde(default)]`,
//! so a partial JSON document only overrides the fields it names.
//!
//! Changes take effect on the next spawn or update. Parameters already rolled
//! into a live raindrop, ripple or bolt are never rewritten.

use serde::{Deserialize, Serialize};

use crate::api::types::Rgb;

/// Top-level configuration for the rain simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainConfig {
    /// Spawn candidates per spawn pass are `rain_density / 4`.
    pub rain_density: u32,
    /// Seconds between spawn passes.
    pub spawn_interval: f32,
    /// Probability that each spawn candidate becomes a raindrop.
    pub spawn_chance: f32,
    /// Palette raindrop colors are drawn from.
    pub raindrop_colors: Vec<Rgb>,
    /// Base size range, scaled by `2 - layer_depth`.
    pub size_range: (f32, f32),
    /// Downward launch speed range, scaled by layer depth.
    pub speed_range: (f32, f32),
    /// Seconds a raindrop may live before it is culled regardless of state.
    pub lifespan_range: (f32, f32),
    /// Twinkle oscillator speed range.
    pub twinkle_range: (f32, f32),
    /// Hard cap on trail samples per raindrop.
    pub max_trail_length: usize,
    /// Height of the water plane.
    pub water_height: f32,
    /// Downward acceleration applied to falling drops.
    pub gravity: f32,
    /// Lateral sway strength for the nearest drops.
    pub sway: f32,
    /// Lateral velocity damping.
    pub drag: f32,
    /// Brightness lost per second after a drop enters the water.
    pub entry_fade_rate: f32,
    /// Camera distance at which layer depth saturates to 1.
    pub depth_range: f32,
    pub ripple: RippleConfig,
    pub lightning: LightningConfig,
    pub ambient: AmbientConfig,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            rain_density: 200,
            spawn_interval: 0.008,
            spawn_chance: 0.8,
            raindrop_colors: vec![
                [0.9, 0.2, 1.0],
                [0.2, 0.9, 1.0],
                [1.0, 1.0, 0.2],
                [1.0, 0.5, 0.1],
                [0.2, 1.0, 0.6],
            ],
            size_range: (1.0, 3.0),
            speed_range: (3.0, 8.0),
            lifespan_range: (4.0, 8.0),
            twinkle_range: (1.0, 6.0),
            max_trail_length: 12,
            water_height: 0.0,
            gravity: 2.0,
            sway: 0.1,
            drag: 0.1,
            entry_fade_rate: 3.0,
            depth_range: 200.0,
            ripple: RippleConfig::default(),
            lightning: LightningConfig::default(),
            ambient: AmbientConfig::default(),
        }
    }
}

impl RainConfig {
    /// Parse a configuration from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Apply a partial JSON document on top of this configuration.
    /// Fields the document doesn't name keep their current values, not the defaults.
    pub fn merge_json(&self, json: &str) -> Result<Self, serde_json::Error> {
        let mut merged = serde_json::to_value(self)?;
        let patch: serde_json::Value = serde_json::from_str(json)?;
        merge_values(&mut merged, patch);
        serde_json::from_value(merged)
    }

    /// Serialize the configuration to JSON for the UI.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Number of spawn candidates rolled per spawn pass.
    pub fn spawn_candidates(&self) -> u32 {
        self.rain_density / 4
    }

    // -- Builder pattern --

    pub fn with_density(mut self, density: u32) -> Self {
        self.rain_density = density;
        self
    }

    pub fn with_spawn_chance(mut self, chance: f32) -> Self {
        self.spawn_chance = chance;
        self
    }

    pub fn with_water_height(mut self, height: f32) -> Self {
        self.water_height = height;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_sway(mut self, sway: f32) -> Self {
        self.sway = sway;
        self
    }

    pub fn with_lightning_enabled(mut self, enabled: bool) -> Self {
        self.lightning.enabled = enabled;
        self
    }
}

/// Ripple spawn ranges and shape constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    /// Radius a ripple starts with.
    pub seed_radius: f32,
    pub max_radius: (f32, f32),
    pub thickness: (f32, f32),
    pub growth_rate: (f32, f32),
    pub max_lifetime: (f32, f32),
    pub pulse_frequency: (f32, f32),
    pub pulse_amplitude: (f32, f32),
    pub wave_height: (f32, f32),
    /// How much growth slows over a ripple's life (0 = constant speed).
    pub growth_damping: f32,
    /// Exponent of the opacity fade curve.
    pub fade_exponent: f32,
    /// Probability that a new ripple emits a sound event.
    pub sound_chance: f32,
    /// Concentric rings the renderer draws per ripple.
    pub rings: u32,
    /// Opacity multiplier applied at render time.
    pub visibility: f32,
    /// Palette used when ripples don't inherit the drop color.
    pub colors: Vec<Rgb>,
    /// Use the impacting raindrop's color instead of the ripple palette.
    pub inherit_drop_color: bool,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            seed_radius: 3.0,
            max_radius: (80.0, 200.0),
            thickness: (0.6, 1.8),
            growth_rate: (15.0, 40.0),
            max_lifetime: (6.0, 10.0),
            pulse_frequency: (3.0, 7.0),
            pulse_amplitude: (0.3, 0.7),
            wave_height: (0.1, 0.3),
            growth_damping: 0.5,
            fade_exponent: 2.0,
            sound_chance: 0.3,
            rings: 5,
            visibility: 2.0,
            colors: vec![
                [0.6, 0.8, 1.0],
                [0.8, 1.0, 1.0],
                [0.9, 0.9, 1.0],
                [0.7, 0.9, 1.0],
                [0.6, 0.9, 0.9],
            ],
            inherit_drop_color: true,
        }
    }
}

/// Lightning timing and bolt shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightningConfig {
    pub enabled: bool,
    /// Base seconds between strikes; each interval is rolled in `[f, 2f)`.
    pub frequency: f32,
    /// Global brightness multiplier applied at render time.
    pub intensity: f32,
    /// Seconds before the first strike.
    pub first_strike_delay: f32,
    /// Peak lateral displacement at the bolt midpoint.
    pub max_offset: f32,
    /// Minimum number of path segments.
    pub min_segments: u32,
    /// Segment count is `min_segments + [0, extra_segments)`.
    pub extra_segments: u32,
    /// Horizontal spread of strike origins around the camera.
    pub sky_spread: f32,
    /// Horizontal spread of the ground point around the origin.
    pub ground_spread: f32,
    /// Origin height above the camera.
    pub sky_height: (f32, f32),
    /// Ground point height above the water plane.
    pub ground_height: (f32, f32),
    /// Per-channel RGB bands a bolt's color is rolled from.
    pub color_range: [(f32, f32); 3],
    /// Rolled starting brightness of a bolt, before the global `intensity`.
    pub peak_intensity: (f32, f32),
    /// Seconds a flash lasts.
    pub duration: (f32, f32),
    pub thickness: (f32, f32),
    /// Branch count is rolled in `[0, max_branches]`.
    pub max_branches: u32,
}

impl Default for LightningConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            frequency: 8.0,
            intensity: 1.0,
            first_strike_delay: 5.0,
            max_offset: 15.0,
            min_segments: 8,
            extra_segments: 6,
            sky_spread: 400.0,
            ground_spread: 100.0,
            sky_height: (100.0, 200.0),
            ground_height: (5.0, 25.0),
            color_range: [(0.7, 1.0), (0.8, 1.0), (0.9, 1.0)],
            peak_intensity: (0.8, 1.2),
            duration: (0.2, 0.6),
            thickness: (1.5, 3.5),
            max_branches: 2,
        }
    }
}

/// Stars, clouds and the moon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub star_count: usize,
    pub cloud_count: usize,
    /// Clouds wrap once they drift past this x coordinate.
    pub pond_size: f32,
    /// Multiplier on every star's twinkle speed.
    pub star_twinkle_speed: f32,
    pub moon_position: [f32; 3],
    pub moon_size: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            star_count: 150,
            cloud_count: 5,
            pond_size: 500.0,
            star_twinkle_speed: 1.0,
            moon_position: [70.0, 60.0, -100.0],
            moon_size: 20.0,
        }
    }
}

/// Recursively overlay `patch` onto `base`. Objects merge key by key; anything else replaces.
fn merge_values(base: &mut serde_json::Value, patch: serde_json::Value) {
    match (base, patch) {
        (serde_json::Value::Object(base), serde_json::Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge_values(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{
            "rain_density": 40,
            "lightning": { "enabled": false }
        }"#;
        let config = RainConfig::from_json(json).unwrap();
        assert_eq!(config.rain_density, 40);
        assert!(!config.lightning.enabled);
        assert_eq!(config.lightning.frequency, 8.0);
        assert_eq!(config.ripple.rings, 5);
        assert_eq!(config.raindrop_colors.len(), 5);
    }

    #[test]
    fn json_survives_a_trip_through_the_ui() {
        let mut config = RainConfig::default().with_density(64);
        config.ripple.visibility = 3.5;
        let json = config.to_json().unwrap();
        let back = RainConfig::from_json(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(RainConfig::from_json("{ rain_density: ").is_err());
        assert!(RainConfig::from_json(r#"{ "rain_density": "lots" }"#).is_err());
    }

    #[test]
    fn merge_keeps_current_values() {
        let mut current = RainConfig::default().with_lightning_enabled(false);
        current.ripple.rings = 2;
        let merged = current
            .merge_json(r#"{ "rain_density": 40, "ripple": { "visibility": 1.0 } }"#)
            .unwrap();
        assert_eq!(merged.rain_density, 40);
        assert!(!merged.lightning.enabled, "untouched field fell back to its default");
        assert_eq!(merged.ripple.rings, 2);
        assert_eq!(merged.ripple.visibility, 1.0);
    }

    #[test]
    fn merge_rejects_bad_documents() {
        let current = RainConfig::default();
        assert!(current.merge_json("{ nope").is_err());
        assert!(current.merge_json(r#"{ "rain_density": "lots" }"#).is_err());
        assert!(current.merge_json("[1, 2]").is_err());
    }

    #[test]
    fn spawn_candidates_is_quarter_density() {
        assert_eq!(RainConfig::default().spawn_candidates(), 50);
        assert_eq!(RainConfig::default().with_density(3).spawn_candidates(), 0);
    }
}
