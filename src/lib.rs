//! Balls 2050 - merge balls until one of them reads 2048
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, collisions, game state)
//! - `color`: Ball palette and text contrast
//! - `persistence`: Save/load of the world as JSON
//! - `settings`: Player preferences and simulation tuning
//! - `engine`: Fixed-rate physics worker driving a shared world

pub mod color;
pub mod engine;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use color::Palette;
pub use engine::Engine;
pub use settings::{Settings, SimConfig};
pub use sim::{GameEvent, GamePhase, Notifier, TickInput, UiData, World};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default physics rate (Hz)
    pub const PHYSICS_HZ: f32 = 60.0;
    /// Default render rate (Hz)
    pub const RENDER_HZ: f32 = 30.0;
    /// Measured dt is clamped to this multiple of the target period
    pub const MAX_DT_FACTOR: f32 = 1.5;

    /// Side of the square play-field in logical units
    pub const FIELD_SIZE: f32 = 512.0;
    /// Balls on the field after `new_game`
    pub const NUM_STARTING_BALLS: usize = 2;
    /// Radius of the disk new-ball velocities are drawn from
    pub const SPAWN_VELOCITY_RADIUS: f32 = 10.0;

    /// Free-fall acceleration magnitude
    pub const GRAVITY: f32 = 200.0;
    /// Coefficient of restitution for ball/ball bounces
    pub const RESTITUTION: f32 = 0.5;
    /// Fraction of velocity kept after hitting a wall
    pub const WALL_DAMPING: f32 = 0.9;

    /// Size at which the game is won (2^11 = 2048)
    pub const WIN_SIZE: u32 = 11;
    /// Median compression above which the game is lost
    pub const LOSE_COMPRESSION: f32 = 10.0;
    /// Number of per-tick compression samples the median is taken over
    pub const COMPRESSION_WINDOW: usize = 100;
    /// First size that triggers an achievement
    pub const FIRST_ACHIEVEMENT_SIZE: u32 = 5;

    /// Standard gravity reported by an accelerometer at rest (m/s²)
    pub const STANDARD_GRAVITY: f32 = 9.806_65;
    /// Tilt must swing this far (radians) before another ball spawns
    pub const TILT_SPAWN_ANGLE: f32 = std::f32::consts::FRAC_PI_4;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}
