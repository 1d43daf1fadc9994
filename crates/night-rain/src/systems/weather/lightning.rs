//! Lightning bolts: a jagged sky-to-ground path and a short flickering flash.

use glam::Vec3;

use super::rng::Rng;
use crate::api::config::LightningConfig;
use crate::api::types::Rgb;

/// A single lightning strike.
#[derive(Debug, Clone)]
pub struct LightningBolt {
    pub start: Vec3,
    pub end: Vec3,
    /// Path from `start` to `end`, inclusive. Always `num_segments + 1` points.
    pub points: Vec<Vec3>,
    pub color: Rgb,
    /// Current brightness. Starts at the rolled peak and decays to 0 over `duration`.
    pub intensity: f32,
    /// Seconds the flash lasts.
    pub duration: f32,
    pub elapsed: f32,
    pub thickness: f32,
    /// Number of side branches the renderer may draw. Branch geometry is not generated.
    pub branches: u32,
    active: bool,
}

impl LightningBolt {
    /// Flicker frequency of the flash envelope.
    const FLICKER: f32 = 50.0;

    /// Generate a bolt between two points with every visual parameter rolled from `rng`.
    pub fn generate(start: Vec3, end: Vec3, config: &LightningConfig, rng: &mut Rng) -> Self {
        let num_segments = (config.min_segments + rng.next_int(config.extra_segments)).max(1);
        let points =
            Self::jagged_path(start, end, num_segments as usize, config.max_offset, rng);

        let color = config.color_range.map(|(lo, hi)| rng.range(lo, hi));

        LightningBolt {
            start,
            end,
            points,
            color,
            intensity: rng.range(config.peak_intensity.0, config.peak_intensity.1),
            duration: rng.range(config.duration.0, config.duration.1),
            elapsed: 0.0,
            thickness: rng.range(config.thickness.0, config.thickness.1),
            branches: rng.next_int(config.max_branches + 1),
            active: true,
        }
    }

    /// Peak lateral displacement allowed at parameter `t` along the path:
    /// zero at both ends, `max_offset` at the midpoint.
    pub fn offset_envelope(t: f32, max_offset: f32) -> f32 {
        max_offset * (1.0 - (t - 0.5).abs() * 2.0)
    }

    /// Linear interpolation from `start` to `end` with every interior point
    /// displaced by a random offset bounded by [`Self::offset_envelope`].
    fn jagged_path(
        start: Vec3,
        end: Vec3,
        num_segments: usize,
        max_offset: f32,
        rng: &mut Rng,
    ) -> Vec<Vec3> {
        let mut points = Vec::with_capacity(num_segments + 1);
        points.push(start);
        for i in 1..num_segments {
            let t = i as f32 / num_segments as f32;
            let envelope = Self::offset_envelope(t, max_offset);
            let mut point = start.lerp(end, t);
            point.x += rng.centered(envelope);
            point.z += rng.centered(envelope);
            point.y += rng.centered(envelope) * 0.5;
            points.push(point);
        }
        points.push(end);
        points
    }

    pub fn num_segments(&self) -> usize {
        self.points.len() - 1
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advance the flash. Returns false once the bolt has burned out; it never reactivates.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }
        self.elapsed += dt;

        if self.elapsed >= self.duration {
            self.intensity = 0.0;
            self.active = false;
            return false;
        }

        let remaining = 1.0 - self.elapsed / self.duration;
        let flicker = 0.8 + 0.2 * (self.elapsed * Self::FLICKER).sin();
        self.intensity = remaining * flicker;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bolt(seed: u64) -> LightningBolt {
        let mut rng = Rng::new(seed);
        LightningBolt::generate(
            Vec3::new(0.0, 200.0, 0.0),
            Vec3::new(30.0, 10.0, -20.0),
            &LightningConfig::default(),
            &mut rng,
        )
    }

    #[test]
    fn path_has_segments_plus_one_points_and_exact_endpoints() {
        for seed in 1..50 {
            let b = bolt(seed);
            let n = b.num_segments();
            assert!((8..=13).contains(&n), "segment count {}", n);
            assert_eq!(b.points.len(), n + 1);
            assert_eq!(b.points[0], b.start);
            assert_eq!(b.points[n], b.end);
        }
    }

    #[test]
    fn interior_offsets_respect_the_envelope() {
        let max_offset = LightningConfig::default().max_offset;
        for seed in 1..50 {
            let b = bolt(seed);
            let n = b.num_segments();
            for (i, p) in b.points.iter().enumerate() {
                let t = i as f32 / n as f32;
                let base = b.start.lerp(b.end, t);
                let env = LightningBolt::offset_envelope(t, max_offset);
                let d = *p - base;
                assert!(d.x.abs() <= env * 0.5 + 1e-3, "x offset {} > {}", d.x, env);
                assert!(d.z.abs() <= env * 0.5 + 1e-3, "z offset {} > {}", d.z, env);
                assert!(d.y.abs() <= env * 0.25 + 1e-3, "y offset {} > {}", d.y, env);
            }
        }
    }

    #[test]
    fn envelope_peaks_in_the_middle() {
        assert_eq!(LightningBolt::offset_envelope(0.0, 15.0), 0.0);
        assert_eq!(LightningBolt::offset_envelope(1.0, 15.0), 0.0);
        assert_eq!(LightningBolt::offset_envelope(0.5, 15.0), 15.0);
        assert!(LightningBolt::offset_envelope(0.25, 15.0) < 15.0);
    }

    #[test]
    fn rolled_parameters_in_band() {
        for seed in 1..50 {
            let b = bolt(seed);
            assert!(b.intensity >= 0.8 && b.intensity < 1.2);
            assert!(b.duration >= 0.2 && b.duration < 0.6);
            assert!(b.thickness >= 1.5 && b.thickness < 3.5);
            assert!(b.branches <= 2);
            assert!(b.is_active());
        }
    }

    #[test]
    fn flash_decays_and_deactivates_once() {
        let mut b = bolt(3);
        let duration = b.duration;
        let mut deactivations = 0;
        let mut was_active = true;
        let mut t = 0.0;
        while t < duration * 3.0 {
            let alive = b.update(0.01);
            t += 0.01;
            if was_active && !alive {
                deactivations += 1;
            }
            if alive {
                assert!(b.intensity <= 1.0 - b.elapsed / duration + 1e-6);
                assert!(b.intensity >= 0.0);
            }
            was_active = alive;
        }
        assert_eq!(deactivations, 1);
        assert!(!b.is_active());
        assert_eq!(b.intensity, 0.0);
        assert!(!b.update(0.01), "bolt came back to life");
    }

    #[test]
    fn flash_ranges_come_from_config() {
        let config = LightningConfig {
            color_range: [(0.1, 0.1), (0.2, 0.2), (0.3, 0.3)],
            peak_intensity: (2.0, 2.0),
            duration: (1.5, 1.5),
            thickness: (4.0, 4.0),
            max_branches: 0,
            ..LightningConfig::default()
        };
        let mut rng = Rng::new(21);
        let b = LightningBolt::generate(Vec3::Y * 100.0, Vec3::ZERO, &config, &mut rng);
        assert_eq!(b.color, [0.1, 0.2, 0.3]);
        assert_eq!(b.intensity, 2.0);
        assert_eq!(b.duration, 1.5);
        assert_eq!(b.thickness, 4.0);
        assert_eq!(b.branches, 0);
    }

    #[test]
    fn zero_extra_segments_is_fixed_count() {
        let config = LightningConfig {
            min_segments: 4,
            extra_segments: 0,
            ..LightningConfig::default()
        };
        let mut rng = Rng::new(8);
        let b = LightningBolt::generate(Vec3::Y * 10.0, Vec3::ZERO, &config, &mut rng);
        assert_eq!(b.points.len(), 5);
    }
}
