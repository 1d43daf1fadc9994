//! Decorative sky: twinkling stars, drifting clouds and the moon.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::rng::Rng;
use crate::api::config::AmbientConfig;

/// A star on the sky dome. Brightness is a pure function of time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: Vec3,
    pub brightness: f32,
    pub twinkle_speed: f32,
    pub size: f32,
}

impl Star {
    fn random(rng: &mut Rng) -> Self {
        // Upper hemisphere, lifted above the horizon
        let theta = rng.next_f32() * TAU;
        let phi = rng.next_f32() * PI * 0.5;
        let radius = rng.range(200.0, 250.0);
        Star {
            position: Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.cos() + 20.0,
                radius * phi.sin() * theta.sin(),
            ),
            brightness: rng.range(0.5, 1.0),
            twinkle_speed: rng.range(0.5, 5.5),
            size: rng.range(0.5, 2.0),
        }
    }

    pub fn brightness_at(&self, total_time: f32, speed_scale: f32) -> f32 {
        0.5 + 0.5 * (total_time * self.twinkle_speed * speed_scale).sin()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cloud {
    pub position: Vec3,
    pub size: f32,
    pub opacity: f32,
    pub speed: f32,
}

impl Cloud {
    fn random(rng: &mut Rng) -> Self {
        Cloud {
            position: Vec3::new(
                rng.range(-100.0, 100.0),
                rng.range(40.0, 70.0),
                rng.range(-100.0, 0.0),
            ),
            size: rng.range(10.0, 30.0),
            opacity: rng.range(0.2, 0.5),
            speed: rng.range(0.5, 2.5),
        }
    }

    /// Drift along +x; past `pond_size` wrap to the far side with a fresh z and opacity.
    fn drift(&mut self, dt: f32, pond_size: f32, rng: &mut Rng) {
        self.position.x += self.speed * dt;
        if self.position.x > pond_size {
            self.position.x = -pond_size;
            self.position.z = rng.centered(pond_size);
            self.opacity = rng.range(0.2, 0.5);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moon {
    pub position: Vec3,
    pub size: f32,
    pub halo_size: f32,
}

impl Moon {
    pub fn from_config(config: &AmbientConfig) -> Self {
        Moon {
            position: Vec3::from_array(config.moon_position),
            size: config.moon_size,
            halo_size: config.moon_size * 1.5,
        }
    }
}

/// Fixed-size collections of sky entities.
#[derive(Debug, Clone)]
pub struct AmbientField {
    pub stars: Vec<Star>,
    pub clouds: Vec<Cloud>,
    pub moon: Moon,
}

impl AmbientField {
    pub fn new(config: &AmbientConfig, rng: &mut Rng) -> Self {
        AmbientField {
            stars: (0..config.star_count).map(|_| Star::random(rng)).collect(),
            clouds: (0..config.cloud_count).map(|_| Cloud::random(rng)).collect(),
            moon: Moon::from_config(config),
        }
    }

    pub fn update(&mut self, total_time: f32, dt: f32, config: &AmbientConfig, rng: &mut Rng) {
        for star in &mut self.stars {
            star.brightness = star.brightness_at(total_time, config.star_twinkle_speed);
        }
        for cloud in &mut self.clouds {
            cloud.drift(dt, config.pond_size, rng);
        }
        self.moon = Moon::from_config(config);
    }
}
