//! Game settings and simulation tuning
//!
//! Persisted separately from the game save, as JSON in the data directory.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::{DEFAULT_PALETTE, Palette};
use crate::consts::*;

/// Physics constants and game thresholds
///
/// Every field falls back to its default when missing from the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Side of the square play-field
    pub field_size: f32,
    /// Balls spawned by `new_game`
    pub num_starting_balls: usize,
    /// Gravity magnitude applied along the fling direction
    pub gravity: f32,
    /// Ball/ball restitution
    pub restitution: f32,
    /// Velocity kept on wall bounces
    pub wall_damping: f32,
    /// Radius of the disk new-ball velocities are drawn from
    pub spawn_velocity_radius: f32,
    /// Size that wins the game
    pub win_size: u32,
    /// Median compression that loses the game
    pub lose_compression: f32,
    /// Samples in the compression median window
    pub compression_window: usize,
    /// First size that fires an achievement
    pub first_achievement_size: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            field_size: FIELD_SIZE,
            num_starting_balls: NUM_STARTING_BALLS,
            gravity: GRAVITY,
            restitution: RESTITUTION,
            wall_damping: WALL_DAMPING,
            spawn_velocity_radius: SPAWN_VELOCITY_RADIUS,
            win_size: WIN_SIZE,
            lose_compression: LOSE_COMPRESSION,
            compression_window: COMPRESSION_WINDOW,
            first_achievement_size: FIRST_ACHIEVEMENT_SIZE,
        }
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Device tilt drives gravity instead of flings
    pub gravity_mode: bool,
    /// Physics worker rate (Hz)
    pub physics_hz: f32,
    /// Render rate (Hz), for hosts that draw from snapshots
    pub render_hz: f32,
    /// Ball colors, 0xAARRGGBB
    pub ball_colors: Vec<u32>,
    /// Simulation tuning
    pub sim: SimConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gravity_mode: false,
            physics_hz: PHYSICS_HZ,
            render_hz: RENDER_HZ,
            ball_colors: DEFAULT_PALETTE.to_vec(),
            sim: SimConfig::default(),
        }
    }
}

impl Settings {
    /// File name inside the data directory
    pub const FILE_NAME: &'static str = "settings.json";

    /// Palette built from `ball_colors`
    pub fn palette(&self) -> Palette {
        Palette::from_argb(&self.ball_colors)
    }

    /// Target physics period in seconds
    pub fn physics_period(&self) -> f32 {
        1.0 / self.physics_hz.max(1.0)
    }

    /// Target period between drawn frames in seconds
    pub fn render_period(&self) -> f32 {
        1.0 / self.render_hz.max(1.0)
    }

    /// Load settings from `dir`
    ///
    /// Returns the settings and whether a settings file was found. A missing
    /// or unreadable file yields defaults; the flag doubles as the first-run
    /// marker for the host.
    pub fn load(dir: &Path) -> (Self, bool) {
        let path = dir.join(Self::FILE_NAME);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Could not read {}: {}", path.display(), e);
                }
                log::info!("Using default settings");
                return (Self::default(), false);
            }
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                (settings, true)
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {}", path.display(), e);
                (Self::default(), true)
            }
        }
    }

    /// Save settings to `dir`
    pub fn save(&self, dir: &Path) -> Result<(), crate::persistence::PersistError> {
        fs::create_dir_all(dir)?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(Self::FILE_NAME), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
