//! Balls 2050 entry point
//!
//! Headless native driver: loads settings and the last save, plays a few
//! seconds of flings on the physics thread, then pauses and saves.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use balls_2050::persistence;
use balls_2050::sim::LogNotifier;
use balls_2050::{Engine, Settings, World};

const SAVE_FILE: &str = "save.json";
const DEFAULT_DATA_DIR: &str = "balls-2050-data";

/// Directions cycled through by the demo, screen coordinates
const FLINGS: [(f32, f32); 4] = [(0.0, 1.0), (1.0, 0.0), (0.0, -1.0), (-1.0, 0.0)];
const NUM_FLINGS: usize = 12;
const FLING_INTERVAL: Duration = Duration::from_millis(250);

fn main() {
    env_logger::init();
    log::info!("Balls 2050 (native) starting...");

    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    let save_path = data_dir.join(SAVE_FILE);

    let (settings, found) = Settings::load(&data_dir);
    let first_run = !found;
    if first_run {
        if let Err(e) = settings.save(&data_dir) {
            log::warn!("Could not write default settings: {}", e);
        }
    }

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let mut world = World::new(
        settings.sim.clone(),
        settings.palette(),
        seed,
        Box::new(LogNotifier),
    );

    match persistence::load_from_file(&save_path) {
        Ok(Some(data)) => world.restore(&data, first_run),
        Ok(None) => {}
        Err(e) => log::warn!("Ignoring unreadable save: {}", e),
    }
    // a restored game comes back paused; a restored win keeps its banner
    world.resume();

    let mut engine = Engine::new(world, &settings);
    engine.start();

    // draw loop stand-in: pull a snapshot each frame, fling every few frames
    let frame = Duration::from_secs_f32(settings.render_period());
    let frames_per_fling =
        (FLING_INTERVAL.as_secs_f32() / frame.as_secs_f32()).ceil().max(1.0) as usize;
    let mut flings = FLINGS.iter().cycle();
    for n in 0..NUM_FLINGS * frames_per_fling {
        if n % frames_per_fling == 0 {
            if let Some((x, y)) = flings.next() {
                engine.fling(*x, *y);
            }
        }
        let snapshot = engine.snapshot();
        log::trace!(
            "frame {}: {} balls, phase {:?}",
            n,
            snapshot.balls.len(),
            snapshot.phase
        );
        thread::sleep(frame);
    }

    engine.pause();
    engine.stop();
    let _ = engine.save(&save_path);

    let ui = engine.ui_data();
    println!(
        "Score: {}  High score: {}  Pressure: {}  Gravity angle: {:.2}",
        ui.score, ui.high_score, ui.pressure, ui.gravity_angle
    );
}
