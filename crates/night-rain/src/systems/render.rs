use crate::api::config::RainConfig;
use crate::renderer::instance::{
    BoltVertex, DropInstance, FrameBuffers, RippleInstance, SkyInstance, TrailVertex,
};
use crate::systems::weather::{DropState, Snapshot};

/// Opacity of the moon's halo billboard.
const HALO_ALPHA: f32 = 0.3;

/// Flatten a snapshot into per-frame instance buffers.
/// Only visible, falling drops get a head instance; trails are written for
/// every drop so they keep fading after impact.
pub fn build_frame_buffers(snapshot: &Snapshot, config: &RainConfig, buffers: &mut FrameBuffers) {
    buffers.clear();

    for drop in snapshot.raindrops {
        let [r, g, b] = drop.color;
        if drop.visible && drop.state() == DropState::Falling {
            buffers.drops.push(DropInstance {
                x: drop.position.x,
                y: drop.position.y,
                z: drop.position.z,
                size: drop.size,
                r,
                g,
                b,
                alpha: drop.brightness,
            });
        }

        let len = drop.trail().len() as f32;
        for (i, sample) in drop.trail().iter().enumerate() {
            buffers.trails.push(TrailVertex {
                x: sample.position.x,
                y: sample.position.y,
                z: sample.position.z,
                size: drop.size * (1.0 - i as f32 / len),
                r,
                g,
                b,
                alpha: sample.alpha,
            });
        }
    }

    let rings = config.ripple.rings as f32;
    for ripple in snapshot.ripples {
        let [r, g, b] = ripple.color;
        buffers.ripples.push(RippleInstance {
            x: ripple.position.x,
            y: ripple.position.y,
            z: ripple.position.z,
            radius: ripple.radius,
            thickness: ripple.thickness,
            r,
            g,
            b,
            alpha: ripple.opacity * config.ripple.visibility,
            wave_height: ripple.wave_height,
            rings,
            _pad: 0.0,
        });
    }

    for bolt in snapshot.lightning {
        if !bolt.is_active() {
            continue;
        }
        let [r, g, b] = bolt.color;
        let intensity = bolt.intensity * config.lightning.intensity;
        // Line list: each segment contributes both of its endpoints
        for pair in bolt.points.windows(2) {
            for p in pair {
                buffers.bolts.push(BoltVertex {
                    x: p.x,
                    y: p.y,
                    z: p.z,
                    thickness: bolt.thickness,
                    r,
                    g,
                    b,
                    intensity,
                });
            }
        }
    }

    for star in snapshot.stars {
        buffers.sky.push(sky(star.position, star.size, star.brightness, SkyInstance::KIND_STAR));
    }
    for cloud in snapshot.clouds {
        buffers.sky.push(sky(cloud.position, cloud.size, cloud.opacity, SkyInstance::KIND_CLOUD));
    }
    let moon = snapshot.moon;
    buffers.sky.push(sky(moon.position, moon.halo_size, HALO_ALPHA, SkyInstance::KIND_HALO));
    buffers.sky.push(sky(moon.position, moon.size, 1.0, SkyInstance::KIND_MOON));
}

fn sky(position: glam::Vec3, size: f32, alpha: f32, kind: f32) -> SkyInstance {
    SkyInstance {
        x: position.x,
        y: position.y,
        z: position.z,
        size,
        alpha,
        kind,
        _pad: [0.0; 2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::weather::{RainState, Raindrop};
    use glam::Vec3;

    fn quiet() -> RainConfig {
        RainConfig::default()
            .with_density(0)
            .with_lightning_enabled(false)
            .with_gravity(0.0)
            .with_sway(0.0)
    }

    #[test]
    fn sky_holds_stars_clouds_and_moon() {
        let state = RainState::new(quiet(), 5);
        let mut buffers = FrameBuffers::new();
        build_frame_buffers(&state.snapshot(), state.config(), &mut buffers);

        let ambient = &state.config().ambient;
        assert_eq!(buffers.sky.len(), ambient.star_count + ambient.cloud_count + 2);
        let moon = buffers.sky.last().unwrap();
        assert_eq!(moon.kind, SkyInstance::KIND_MOON);
        assert_eq!(moon.size, ambient.moon_size);
        assert!(buffers.drops.is_empty());
        assert!(buffers.ripples.is_empty());
    }

    #[test]
    fn entered_drops_lose_their_head_but_keep_the_trail() {
        let mut state = RainState::new(quiet(), 5);
        state.spawn_raindrop(
            Raindrop::new(Vec3::new(0.0, 0.1, 0.0), Vec3::new(0.0, -10.0, 0.0), [1.0; 3])
                .with_lifespan(100.0),
        );
        state.spawn_raindrop(
            Raindrop::new(Vec3::new(5.0, 50.0, 0.0), Vec3::new(0.0, -1.0, 0.0), [1.0; 3])
                .with_lifespan(100.0),
        );
        state.tick(0.1, RainState::DEFAULT_CAMERA);

        let mut buffers = FrameBuffers::new();
        build_frame_buffers(&state.snapshot(), state.config(), &mut buffers);
        assert_eq!(buffers.drops.len(), 1);
        assert_eq!(buffers.drops[0].x, 5.0);
        // Both drops sampled a trail point before the first was submerged
        assert_eq!(buffers.trails.len(), 2);
    }

    #[test]
    fn ripples_carry_visibility_and_rings() {
        let mut config = quiet();
        config.ripple.visibility = 2.0;
        config.ripple.rings = 3;
        let mut state = RainState::new(config, 5);
        state.spawn_raindrop(
            Raindrop::new(Vec3::new(0.0, 0.1, 0.0), Vec3::new(0.0, -10.0, 0.0), [1.0; 3])
                .with_lifespan(100.0),
        );
        state.tick(0.1, RainState::DEFAULT_CAMERA);
        state.tick(0.1, RainState::DEFAULT_CAMERA);

        let mut buffers = FrameBuffers::new();
        build_frame_buffers(&state.snapshot(), state.config(), &mut buffers);
        assert_eq!(buffers.ripples.len(), 1);
        let ripple = state.snapshot().ripples[0].opacity;
        assert_eq!(buffers.ripples[0].alpha, ripple * 2.0);
        assert_eq!(buffers.ripples[0].rings, 3.0);
        assert_eq!(buffers.ripple_floats().len(), 12);
    }

    #[test]
    fn bolts_are_line_lists_scaled_by_intensity() {
        let mut config = quiet();
        config.lightning.intensity = 0.5;
        let mut state = RainState::new(config, 5);
        state.strike_lightning();

        let mut buffers = FrameBuffers::new();
        build_frame_buffers(&state.snapshot(), state.config(), &mut buffers);
        let bolt = &state.snapshot().lightning[0];
        assert_eq!(buffers.bolts.len(), bolt.num_segments() * 2);
        assert_eq!(buffers.bolts[0].intensity, bolt.intensity * 0.5);
        assert_eq!(buffers.bolts[0].x, bolt.start.x);
        assert_eq!(buffers.bolts.last().unwrap().y, bolt.end.y);
    }

    #[test]
    fn rebuilding_replaces_previous_frame() {
        let mut state = RainState::new(quiet(), 5);
        state.strike_lightning();
        let mut buffers = FrameBuffers::new();
        build_frame_buffers(&state.snapshot(), state.config(), &mut buffers);
        assert!(!buffers.bolts.is_empty());

        state.clear();
        build_frame_buffers(&state.snapshot(), state.config(), &mut buffers);
        assert!(buffers.bolts.is_empty());
    }
}
