//! Host driver: runs the world on a fixed-rate physics thread
//!
//! All mutable game state sits behind one mutex. The physics worker holds it
//! for exactly one tick; host calls (input, HUD reads, snapshots for drawing)
//! hold it for one short operation each.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use glam::Vec2;

use crate::consts::MAX_DT_FACTOR;
use crate::persistence::{self, PersistError};
use crate::settings::Settings;
use crate::sim::{ScreenRotation, Snapshot, TickInput, UiData, World};

/// Lock, recovering the data if a previous holder panicked
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clamp a measured frame time so a stall cannot produce one huge step
pub fn clamp_dt(measured: f32, period: f32) -> f32 {
    measured.clamp(0.0, period * MAX_DT_FACTOR)
}

pub struct Engine {
    world: Arc<Mutex<World>>,
    input: Arc<Mutex<TickInput>>,
    running: Arc<AtomicBool>,
    physics_thread: Option<JoinHandle<()>>,
    period: f32,
    gravity_mode: bool,
}

impl Engine {
    pub fn new(world: World, settings: &Settings) -> Self {
        Self {
            world: Arc::new(Mutex::new(world)),
            input: Arc::new(Mutex::new(TickInput::default())),
            running: Arc::new(AtomicBool::new(false)),
            physics_thread: None,
            period: settings.physics_period(),
            gravity_mode: settings.gravity_mode,
        }
    }

    /// Shared handle to the world, for hosts that draw under the lock
    pub fn world(&self) -> Arc<Mutex<World>> {
        self.world.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Spawn the physics worker. No-op if already running.
    pub fn start(&mut self) {
        if self.running.swap(true, Ordering::AcqRel) {
            return;
        }

        let world = self.world.clone();
        let input = self.input.clone();
        let running = self.running.clone();
        let period = self.period;

        let spawned = thread::Builder::new()
            .name("physics".into())
            .spawn(move || physics_loop(&world, &input, &running, period));
        match spawned {
            Ok(handle) => {
                self.physics_thread = Some(handle);
                log::info!("Engine started ({:.0} Hz physics)", 1.0 / period);
            }
            Err(e) => {
                self.running.store(false, Ordering::Release);
                log::error!("Could not start physics thread: {}", e);
            }
        }
    }

    /// Stop the worker and wait for it
    pub fn stop(&mut self) {
        if !self.running.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(handle) = self.physics_thread.take() {
            if handle.join().is_err() {
                log::error!("Physics thread panicked");
            }
        }
        log::info!("Engine stopped");
    }

    pub fn fling(&self, x: f32, y: f32) {
        if self.gravity_mode {
            return;
        }
        lock(&self.world).fling(x, y);
    }

    pub fn tap(&self) {
        lock(&self.world).tap();
    }

    pub fn pause(&self) {
        lock(&self.world).pause();
    }

    pub fn new_game(&self) {
        lock(&self.world).new_game();
    }

    /// Latest accelerometer reading; ignored unless gravity mode is on
    pub fn set_tilt(&self, tilt: Vec2, rotation: ScreenRotation) {
        if !self.gravity_mode {
            return;
        }
        *lock(&self.input) = TickInput {
            tilt: Some(tilt),
            rotation,
        };
    }

    pub fn ui_data(&self) -> UiData {
        lock(&self.world).ui_data()
    }

    pub fn snapshot(&self) -> Snapshot {
        lock(&self.world).snapshot()
    }

    /// Write the current game to `path`
    ///
    /// The save data is copied under the lock and written outside it.
    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        let data = lock(&self.world).to_save();
        persistence::save_to_file(path, &data).inspect_err(|e| {
            log::error!("Could not save game: {}", e);
        })
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop();
    }
}

fn physics_loop(
    world: &Mutex<World>,
    input: &Mutex<TickInput>,
    running: &AtomicBool,
    period: f32,
) {
    let target = Duration::from_secs_f32(period);
    let mut last = Instant::now();
    while running.load(Ordering::Acquire) {
        let start = Instant::now();
        let dt = clamp_dt(start.duration_since(last).as_secs_f32(), period);
        last = start;

        let tick_input = *lock(input);
        lock(world).physics_step(dt, &tick_input);

        if let Some(rest) = target.checked_sub(start.elapsed()) {
            thread::sleep(rest);
        }
    }
}
