//! Where new raindrops and lightning strikes appear.

use std::f32::consts::TAU;

use glam::Vec3;

use super::rng::Rng;
use crate::api::config::LightningConfig;

/// Spawn ring around the camera. Far rings are wider and higher so the rain
/// looks equally dense at every depth once perspective shrinks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceBand {
    Near,
    Mid,
    Far,
}

impl DistanceBand {
    /// 40% near, 30% mid, 30% far.
    pub fn from_roll(roll: f32) -> Self {
        if roll < 0.4 {
            DistanceBand::Near
        } else if roll < 0.7 {
            DistanceBand::Mid
        } else {
            DistanceBand::Far
        }
    }

    /// Horizontal radius of the band for a camera `camera_distance` from the pond center.
    pub fn radius(self, camera_distance: f32) -> f32 {
        let near = camera_distance * 0.3;
        let far = camera_distance * 1.5;
        match self {
            DistanceBand::Near => near,
            DistanceBand::Mid => (near + far) * 0.5,
            DistanceBand::Far => far,
        }
    }

    /// Spawn height range above the camera.
    pub fn height(self) -> (f32, f32) {
        match self {
            DistanceBand::Near => (15.0, 40.0),
            DistanceBand::Mid => (25.0, 60.0),
            DistanceBand::Far => (35.0, 85.0),
        }
    }
}

/// Pick a spawn point for a raindrop around the camera.
pub fn raindrop_position(camera: Vec3, rng: &mut Rng) -> Vec3 {
    let band = DistanceBand::from_roll(rng.next_f32());
    let radius = band.radius(camera.length());
    let (low, high) = band.height();
    let height = rng.range(low, high);

    let angle = rng.next_f32() * TAU;
    let distance = rng.next_f32() * radius;
    Vec3::new(
        camera.x + distance * angle.cos(),
        camera.y + height,
        camera.z + distance * angle.sin(),
    )
}

/// Sky origin and ground point of a new lightning strike.
pub fn lightning_endpoints(
    camera: Vec3,
    water_height: f32,
    config: &LightningConfig,
    rng: &mut Rng,
) -> (Vec3, Vec3) {
    let start = Vec3::new(
        camera.x + rng.centered(config.sky_spread),
        camera.y + rng.range(config.sky_height.0, config.sky_height.1),
        camera.z + rng.centered(config.sky_spread),
    );
    let end = Vec3::new(
        start.x + rng.centered(config.ground_spread),
        water_height + rng.range(config.ground_height.0, config.ground_height.1),
        start.z + rng.centered(config.ground_spread),
    );
    (start, end)
}
