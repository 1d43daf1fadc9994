//! Falling raindrops with a comet trail.
//!
//! A drop moves through `Falling -> Entered -> Gone` and never back. Crossing
//! the water plane is the one externally visible transition: it plays an
//! impact sound and hands an [`Impact`] back to the caller, which turns it
//! into a ripple.

use std::collections::VecDeque;

use glam::Vec3;

use super::rng::Rng;
use crate::api::config::RainConfig;
use crate::api::types::{Rgb, SoundEvent, SoundSink};

/// Lifecycle of a raindrop. Ordered: a drop's state only ever increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DropState {
    Falling,
    /// Below the surface, fading out.
    Entered,
    Gone,
}

/// One remembered position in a raindrop's trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSample {
    pub position: Vec3,
    pub alpha: f32,
}

/// Emitted once, on the tick a drop crosses the water plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub position: Vec3,
    pub color: Rgb,
}

/// Per-frame physics inputs shared by every drop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallPhysics {
    pub camera: Vec3,
    pub water_height: f32,
    pub gravity: f32,
    pub sway: f32,
    pub drag: f32,
    pub entry_fade_rate: f32,
    pub depth_range: f32,
}

impl FallPhysics {
    pub fn from_config(config: &RainConfig, camera: Vec3) -> Self {
        Self {
            camera,
            water_height: config.water_height,
            gravity: config.gravity,
            sway: config.sway,
            drag: config.drag,
            entry_fade_rate: config.entry_fade_rate,
            depth_range: config.depth_range,
        }
    }
}

/// Perceived depth in [0, 1]: 0 at the camera, 1 at `depth_range` and beyond.
pub fn layer_depth(position: Vec3, camera: Vec3, depth_range: f32) -> f32 {
    if depth_range <= 0.0 {
        return 1.0;
    }
    (position.distance(camera) / depth_range).min(1.0)
}

#[derive(Debug, Clone)]
pub struct Raindrop {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: Rgb,
    pub size: f32,
    pub brightness: f32,
    pub twinkle_speed: f32,
    /// 0 = near, 1 = far. Recomputed from the camera every tick.
    pub layer_depth: f32,
    /// Seconds after which the drop is culled even if it never reached the water.
    pub lifespan: f32,
    /// Seconds since spawn.
    pub lifetime: f32,
    pub visible: bool,
    trail: VecDeque<TrailSample>,
    max_trail_length: usize,
    trail_timer: f32,
    trail_interval: f32,
    state: DropState,
}

impl Raindrop {
    /// Multiplicative alpha decay applied to every trail sample each tick.
    pub const TRAIL_DECAY: f32 = 0.98;

    /// A drop with fixed, non-random parameters.
    pub fn new(position: Vec3, velocity: Vec3, color: Rgb) -> Self {
        Self {
            position,
            velocity,
            color,
            size: 1.0,
            brightness: 1.0,
            twinkle_speed: 0.0,
            layer_depth: 0.0,
            lifespan: 3.0,
            lifetime: 0.0,
            visible: true,
            trail: VecDeque::with_capacity(8),
            max_trail_length: 8,
            trail_timer: 0.0,
            trail_interval: 0.05,
            state: DropState::Falling,
        }
    }

    /// A drop with every parameter rolled from `config`, tiered by distance to `camera`.
    pub fn spawn(position: Vec3, camera: Vec3, config: &RainConfig, rng: &mut Rng) -> Self {
        let depth = layer_depth(position, camera, config.depth_range);
        let color = rng.pick(&config.raindrop_colors).copied().unwrap_or([1.0; 3]);

        let mut velocity = Vec3::new(
            rng.centered(1.0),
            -rng.range(config.speed_range.0, config.speed_range.1),
            rng.centered(1.0),
        );
        // Far drops fall faster
        velocity.y *= 0.7 + depth * 0.6;

        let size = (2.0 - depth) * rng.range(config.size_range.0, config.size_range.1);
        let lifespan = rng.range(config.lifespan_range.0, config.lifespan_range.1);
        let brightness = rng.range(0.8, 1.2);
        let twinkle = rng.range(config.twinkle_range.0, config.twinkle_range.1);

        // Near drops get longer trails; far ones sample less often
        let trail_len = (4 + ((1.0 - depth) * 8.0) as usize).min(config.max_trail_length);
        let trail_interval = 0.03 + depth * 0.02;

        let mut drop = Self::new(position, velocity, color)
            .with_size(size.max(0.0))
            .with_lifespan(lifespan)
            .with_brightness(brightness)
            .with_twinkle_speed(twinkle)
            .with_trail(trail_len, trail_interval);
        drop.layer_depth = depth;
        drop
    }

    // -- Builder pattern --

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_lifespan(mut self, lifespan: f32) -> Self {
        self.lifespan = lifespan;
        self
    }

    pub fn with_brightness(mut self, brightness: f32) -> Self {
        self.brightness = brightness;
        self
    }

    pub fn with_twinkle_speed(mut self, speed: f32) -> Self {
        self.twinkle_speed = speed;
        self
    }

    pub fn with_trail(mut self, max_length: usize, interval: f32) -> Self {
        self.max_trail_length = max_length;
        self.trail_interval = interval;
        self.trail.truncate(max_length);
        self
    }

    pub fn state(&self) -> DropState {
        self.state
    }

    /// Trail samples, newest first.
    pub fn trail(&self) -> &VecDeque<TrailSample> {
        &self.trail
    }

    pub fn max_trail_length(&self) -> usize {
        self.max_trail_length
    }

    /// Gone, or out of time. The lifespan check catches drops that never reach the water.
    pub fn is_dead(&self) -> bool {
        self.state == DropState::Gone || self.lifetime > self.lifespan
    }

    /// Advance one tick. Returns the impact on the tick the drop crosses the water plane.
    pub fn update(
        &mut self,
        dt: f32,
        physics: &FallPhysics,
        sounds: &mut impl SoundSink,
    ) -> Option<Impact> {
        self.lifetime += dt;
        self.layer_depth = layer_depth(self.position, physics.camera, physics.depth_range);

        match self.state {
            DropState::Falling => {
                self.brightness = self.twinkle_brightness();
                self.sample_trail(dt);
                self.decay_trail();

                self.position += self.velocity * dt;

                let sway = physics.sway * (1.0 - self.layer_depth);
                let t = self.lifetime;
                let push_x = (t * 3.0 + self.position.z).cos() * sway;
                let push_z = (t * 2.5 + self.position.x).sin() * sway;
                self.velocity.x += (push_x - self.velocity.x * physics.drag) * dt;
                self.velocity.z += (push_z - self.velocity.z * physics.drag) * dt;
                self.velocity.y -= physics.gravity * (0.8 + self.layer_depth * 0.4) * dt;

                if self.position.y <= physics.water_height {
                    self.advance_to(DropState::Entered);
                    self.visible = false;
                    sounds.play(SoundEvent::impact(self.position));
                    return Some(Impact {
                        position: self.position,
                        color: self.color,
                    });
                }
            }
            DropState::Entered => {
                self.decay_trail();
                self.brightness = (self.brightness - physics.entry_fade_rate * dt).max(0.0);
                if self.brightness <= 0.0 {
                    self.advance_to(DropState::Gone);
                }
            }
            DropState::Gone => {}
        }
        None
    }

    /// Closed-form twinkle: no oscillator state is carried between ticks.
    fn twinkle_brightness(&self) -> f32 {
        let wave = 0.7 + 0.3 * (self.lifetime * self.twinkle_speed + self.position.x * 0.1).sin();
        wave * (1.2 - self.layer_depth * 0.4)
    }

    fn sample_trail(&mut self, dt: f32) {
        self.trail_timer += dt;
        if self.trail_timer < self.trail_interval {
            return;
        }
        self.trail_timer = 0.0;
        self.trail.push_front(TrailSample {
            position: self.position,
            alpha: self.brightness,
        });
        self.trail.truncate(self.max_trail_length);
    }

    fn decay_trail(&mut self) {
        for sample in self.trail.iter_mut() {
            sample.alpha *= Self::TRAIL_DECAY;
        }
    }

    fn advance_to(&mut self, next: DropState) {
        debug_assert!(next >= self.state, "raindrop state went backwards");
        self.state = self.state.max(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_air() -> FallPhysics {
        FallPhysics {
            camera: Vec3::new(0.0, 60.0, 120.0),
            water_height: 0.0,
            gravity: 0.0,
            sway: 0.0,
            drag: 0.1,
            entry_fade_rate: 3.0,
            depth_range: 200.0,
        }
    }

    #[test]
    fn drop_enters_water_on_the_tenth_tick() {
        let physics = still_air();
        let mut sounds: Vec<SoundEvent> = Vec::new();
        let mut drop = Raindrop::new(Vec3::new(0.0, 50.0, 0.0), Vec3::new(0.0, -5.0, 0.0), [1.0; 3])
            .with_lifespan(100.0);

        for tick in 1..=9 {
            let impact = drop.update(1.0, &physics, &mut sounds);
            assert!(impact.is_none(), "early impact at tick {}", tick);
            assert_eq!(drop.state(), DropState::Falling);
        }
        let impact = drop.update(1.0, &physics, &mut sounds);
        assert!(impact.is_some(), "no impact on tick 10");
        assert_eq!(drop.state(), DropState::Entered);
        assert!(!drop.visible);
        assert_eq!(sounds.len(), 1);
        assert_eq!(sounds[0], SoundEvent::impact(Vec3::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn impact_is_signalled_exactly_once() {
        let physics = still_air();
        let mut sounds: Vec<SoundEvent> = Vec::new();
        let mut drop = Raindrop::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -10.0, 0.0), [1.0; 3])
            .with_lifespan(100.0);

        let mut impacts = 0;
        let mut last_state = drop.state();
        for _ in 0..200 {
            if drop.update(0.05, &physics, &mut sounds).is_some() {
                impacts += 1;
            }
            assert!(drop.state() >= last_state, "state went backwards");
            last_state = drop.state();
        }
        assert_eq!(impacts, 1);
        assert_eq!(sounds.len(), 1);
        assert_eq!(drop.state(), DropState::Gone);
        assert!(drop.is_dead());
    }

    #[test]
    fn entered_drop_fades_out() {
        let physics = still_air();
        let mut sounds: Vec<SoundEvent> = Vec::new();
        let mut drop = Raindrop::new(Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.0, -1.0, 0.0), [1.0; 3])
            .with_lifespan(100.0);
        assert!(drop.update(1.0, &physics, &mut sounds).is_some());
        let at_impact = drop.brightness;
        drop.update(0.1, &physics, &mut sounds);
        assert!(drop.brightness < at_impact);
        for _ in 0..20 {
            drop.update(0.1, &physics, &mut sounds);
        }
        assert_eq!(drop.state(), DropState::Gone);
        assert_eq!(drop.brightness, 0.0);
    }

    #[test]
    fn lifespan_kills_a_stalled_drop() {
        let physics = still_air();
        let mut sounds: Vec<SoundEvent> = Vec::new();
        let mut drop =
            Raindrop::new(Vec3::new(0.0, 50.0, 0.0), Vec3::ZERO, [1.0; 3]).with_lifespan(1.0);
        for _ in 0..11 {
            drop.update(0.1, &physics, &mut sounds);
        }
        assert_eq!(drop.state(), DropState::Falling);
        assert!(drop.is_dead());
        assert!(sounds.is_empty());
    }

    #[test]
    fn trail_is_bounded_newest_first_and_decays() {
        let physics = still_air();
        let mut sounds: Vec<SoundEvent> = Vec::new();
        let mut drop =
            Raindrop::new(Vec3::new(0.0, 100.0, 0.0), Vec3::new(0.0, -1.0, 0.0), [1.0; 3])
                .with_lifespan(100.0)
                .with_trail(4, 0.05);

        for _ in 0..20 {
            drop.update(0.05, &physics, &mut sounds);
            assert!(drop.trail().len() <= 4);
        }
        assert_eq!(drop.trail().len(), 4);
        // Newest sample is the highest point still on the way down
        let ys: Vec<f32> = drop.trail().iter().map(|s| s.position.y).collect();
        assert!(ys.windows(2).all(|w| w[0] < w[1]), "trail not newest-first: {:?}", ys);

        let before = drop.trail()[3].alpha;
        drop.update(0.01, &physics, &mut sounds); // too short to sample
        assert!((drop.trail()[3].alpha - before * Raindrop::TRAIL_DECAY).abs() < 1e-6);
    }

    #[test]
    fn near_drops_sway_more_than_far_drops() {
        let mut physics = still_air();
        physics.sway = 5.0;
        physics.camera = Vec3::ZERO;
        let mut sounds: Vec<SoundEvent> = Vec::new();
        let mut near = still_drop(10.0);
        let mut far = still_drop(400.0);
        for _ in 0..10 {
            near.update(0.01, &physics, &mut sounds);
            far.update(0.01, &physics, &mut sounds);
        }
        assert_eq!(far.layer_depth, 1.0);
        assert_eq!(far.velocity.x, 0.0);
        assert!(near.velocity.x.abs() > 0.0);
    }

    fn still_drop(height: f32) -> Raindrop {
        Raindrop::new(Vec3::new(0.0, height, 0.0), Vec3::ZERO, [1.0; 3]).with_lifespan(100.0)
    }

    #[test]
    fn far_drops_accelerate_faster() {
        let mut physics = still_air();
        physics.gravity = 2.0;
        physics.camera = Vec3::ZERO;
        let mut sounds: Vec<SoundEvent> = Vec::new();
        let mut near = still_drop(10.0);
        let mut far = still_drop(400.0);
        for _ in 0..10 {
            near.update(0.01, &physics, &mut sounds);
            far.update(0.01, &physics, &mut sounds);
        }
        assert!(near.velocity.y < 0.0);
        assert!(
            far.velocity.y < near.velocity.y,
            "far {} not faster than near {}",
            far.velocity.y,
            near.velocity.y
        );
        // Full depth falls at 1.2x gravity, the camera's own position at 0.8x
        assert!((far.velocity.y + 2.0 * 1.2 * 0.1).abs() < 1e-5);
    }

    #[test]
    fn far_drops_spawn_with_faster_fall() {
        let config = RainConfig::default();
        let camera = Vec3::new(0.0, 60.0, 120.0);
        let near_pos = camera + Vec3::new(0.0, 1.0, 0.0);
        let far_pos = camera + Vec3::new(0.0, 300.0, 0.0);

        // Same seed, so both roll the same base speed before depth scaling
        let near = Raindrop::spawn(near_pos, camera, &config, &mut Rng::new(17));
        let far = Raindrop::spawn(far_pos, camera, &config, &mut Rng::new(17));
        assert_eq!(far.layer_depth, 1.0);
        assert!(far.velocity.y < near.velocity.y);

        let near_scale = 0.7 + near.layer_depth * 0.6;
        let ratio = far.velocity.y / near.velocity.y;
        assert!((ratio - 1.3 / near_scale).abs() < 1e-4, "speed ratio {}", ratio);
    }

    #[test]
    fn spawned_drop_rolls_within_config() {
        let config = RainConfig::default();
        let camera = Vec3::new(0.0, 60.0, 120.0);
        let mut rng = Rng::new(42);
        for _ in 0..200 {
            let pos = Vec3::new(rng.centered(300.0), 80.0, rng.centered(300.0));
            let drop = Raindrop::spawn(pos, camera, &config, &mut rng);
            assert_eq!(drop.state(), DropState::Falling);
            assert!(drop.size >= 0.0 && drop.brightness >= 0.0);
            assert!(drop.lifespan >= 4.0 && drop.lifespan < 8.0);
            assert!(drop.velocity.y < 0.0);
            assert!(drop.max_trail_length() <= config.max_trail_length);
            assert!(config.raindrop_colors.contains(&drop.color));
        }
    }

    #[test]
    fn layer_depth_saturates() {
        let cam = Vec3::ZERO;
        assert_eq!(layer_depth(Vec3::new(100.0, 0.0, 0.0), cam, 200.0), 0.5);
        assert_eq!(layer_depth(Vec3::new(900.0, 0.0, 0.0), cam, 200.0), 1.0);
        assert_eq!(layer_depth(Vec3::ZERO, cam, 0.0), 1.0);
    }
}
