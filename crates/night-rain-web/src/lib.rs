//! `#[wasm_bindgen]` exports driving one night-rain simulation from the browser.
//!
//! The host calls `rain_init()` once, then `rain_tick()` every animation frame
//! and reads the instance and sound buffers straight out of wasm memory.

use std::cell::RefCell;

use glam::Vec3;
use night_rain::RainConfig;
use wasm_bindgen::prelude::*;

pub mod runner;

pub use runner::RainRunner;

thread_local! {
    static RUNNER: RefCell<Option<RainRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut RainRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow.as_mut().expect("Rain not initialized. Call rain_init() first.");
        f(runner)
    })
}

fn install(config: RainConfig) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
    let density = config.rain_density;
    let runner = RainRunner::new(config, seed);

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("night-rain: initialized (density {})", density);
}

#[wasm_bindgen]
pub fn rain_init() {
    install(RainConfig::default());
}

/// Initialize from a JSON config. Falls back to defaults and returns false if it doesn't parse.
#[wasm_bindgen]
pub fn rain_init_with_config(json: &str) -> bool {
    match RainConfig::from_json(json) {
        Ok(config) => {
            install(config);
            true
        }
        Err(e) => {
            install(RainConfig::default());
            log::warn!("rejected rain config, using defaults: {}", e);
            false
        }
    }
}

#[wasm_bindgen]
pub fn rain_tick(dt: f32, camera_x: f32, camera_y: f32, camera_z: f32) {
    with_runner(|r| r.tick(dt, Vec3::new(camera_x, camera_y, camera_z)));
}

// ---- Configuration ----

#[wasm_bindgen]
pub fn rain_set_config(json: &str) -> bool {
    with_runner(|r| r.set_config_json(json))
}

#[wasm_bindgen]
pub fn rain_get_config() -> String {
    with_runner(|r| r.config_json())
}

#[wasm_bindgen]
pub fn rain_set_lightning_enabled(enabled: bool) {
    with_runner(|r| r.set_lightning_enabled(enabled));
}

#[wasm_bindgen]
pub fn rain_set_density(density: u32) {
    with_runner(|r| r.set_density(density));
}

/// Regenerate stars and clouds after changing their counts.
#[wasm_bindgen]
pub fn rain_reset_ambient() {
    with_runner(|r| r.reset_ambient());
}

// ---- Buffer accessors ----

#[wasm_bindgen]
pub fn rain_drops_ptr() -> *const f32 {
    with_runner(|r| r.drops_ptr())
}

#[wasm_bindgen]
pub fn rain_drop_count() -> u32 {
    with_runner(|r| r.drop_count())
}

#[wasm_bindgen]
pub fn rain_trails_ptr() -> *const f32 {
    with_runner(|r| r.trails_ptr())
}

#[wasm_bindgen]
pub fn rain_trail_vertex_count() -> u32 {
    with_runner(|r| r.trail_vertex_count())
}

#[wasm_bindgen]
pub fn rain_ripples_ptr() -> *const f32 {
    with_runner(|r| r.ripples_ptr())
}

#[wasm_bindgen]
pub fn rain_ripple_instance_count() -> u32 {
    with_runner(|r| r.ripple_instance_count())
}

#[wasm_bindgen]
pub fn rain_bolts_ptr() -> *const f32 {
    with_runner(|r| r.bolts_ptr())
}

#[wasm_bindgen]
pub fn rain_bolt_vertex_count() -> u32 {
    with_runner(|r| r.bolt_vertex_count())
}

#[wasm_bindgen]
pub fn rain_sky_ptr() -> *const f32 {
    with_runner(|r| r.sky_ptr())
}

#[wasm_bindgen]
pub fn rain_sky_count() -> u32 {
    with_runner(|r| r.sky_count())
}

#[wasm_bindgen]
pub fn rain_sound_events_ptr() -> *const f32 {
    with_runner(|r| r.sound_events_ptr())
}

#[wasm_bindgen]
pub fn rain_sound_events_len() -> u32 {
    with_runner(|r| r.sound_events_len())
}

// ---- Stats ----

#[wasm_bindgen]
pub fn rain_fps() -> f32 {
    with_runner(|r| r.stats().smoothed_fps)
}

#[wasm_bindgen]
pub fn rain_frame_time_ms() -> f32 {
    with_runner(|r| r.stats().frame_time_ms)
}

#[wasm_bindgen]
pub fn rain_raindrop_count() -> u32 {
    with_runner(|r| r.state().raindrop_count() as u32)
}

#[wasm_bindgen]
pub fn rain_ripple_count() -> u32 {
    with_runner(|r| r.state().ripple_count() as u32)
}

#[wasm_bindgen]
pub fn rain_lightning_count() -> u32 {
    with_runner(|r| r.state().lightning_count() as u32)
}
