//! World state and the player-facing operations on it
//!
//! Everything that must be persisted to continue a game lives here.

use std::sync::Arc;

use glam::{Vec2, Vec4};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::compression::CompressionWindow;
use super::events::Notifier;
use crate::color::Palette;
use crate::persistence::{BallRecord, SaveData};
use crate::settings::SimConfig;

/// Where the game stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    /// Normal play
    #[default]
    Ongoing,
    /// A ball reached the win size; waiting for the player to dismiss
    Win,
    /// Field too crowded; terminal until a new game
    Lose,
    /// Playing on after a win, without further win checks
    Extended,
}

/// Read-only numbers for the HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiData {
    pub score: u64,
    pub high_score: u64,
    /// Direction of gravity, `atan2(x, -y)`
    pub gravity_angle: f32,
    /// Median compression x10, rounded
    pub pressure: i32,
}

/// What the renderer needs to draw one ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallView {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Vec4,
    pub text_color: Vec4,
    pub value: u64,
}

/// Copy of everything drawable, taken under the lock and drawn outside it
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub balls: Vec<BallView>,
    pub ui: UiData,
    pub phase: GamePhase,
    pub paused: bool,
    pub med_compression: f32,
}

/// The simulation
pub struct World {
    pub(crate) config: SimConfig,
    pub(crate) palette: Arc<Palette>,
    pub(crate) rng: Pcg32,
    pub(crate) notifier: Box<dyn Notifier>,

    pub(crate) balls: Vec<Ball>,
    pub(crate) compressions: CompressionWindow,
    pub(crate) med_compression: f32,
    pub(crate) phase: GamePhase,
    pub(crate) paused: bool,
    pub(crate) score: u64,
    pub(crate) high_score: u64,
    pub(crate) next_achievement_size: u32,
    pub(crate) grav_vec: Vec2,

    /// Gravity direction (radians) at the last tilt-triggered spawn
    pub(crate) tilt_spawn_angle: Option<f32>,
}

impl World {
    /// A world with a fresh game already set up
    pub fn new(
        config: SimConfig,
        palette: Palette,
        seed: u64,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let mut world = Self {
            compressions: CompressionWindow::new(config.compression_window),
            next_achievement_size: config.first_achievement_size,
            config,
            palette: Arc::new(palette),
            rng: Pcg32::seed_from_u64(seed),
            notifier,
            balls: Vec::new(),
            med_compression: 0.0,
            phase: GamePhase::Ongoing,
            paused: false,
            score: 0,
            high_score: 0,
            grav_vec: Vec2::ZERO,
            tilt_spawn_angle: None,
        };
        world.new_game();
        world
    }

    /// Reset everything except the high score
    pub fn new_game(&mut self) {
        self.balls.clear();
        for _ in 0..self.config.num_starting_balls {
            self.spawn_ball();
        }
        self.compressions.reset();
        self.med_compression = 0.0;
        self.phase = GamePhase::Ongoing;
        self.paused = false;
        self.score = 0;
        self.next_achievement_size = self.config.first_achievement_size;
        self.grav_vec = Vec2::ZERO;
        self.tilt_spawn_angle = None;
        log::info!("New game with {} balls", self.balls.len());
    }

    /// Add one random ball
    pub fn spawn_ball(&mut self) {
        let ball = Ball::random(
            &mut self.rng,
            self.config.field_size,
            self.config.spawn_velocity_radius,
            self.palette.clone(),
        );
        self.balls.push(ball);
    }

    /// Add a specific ball
    pub fn insert_ball(&mut self, size: u32, pos: Vec2, vel: Vec2) {
        self.balls.push(Ball::new(size, pos, vel, self.palette.clone()));
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::debug!("Paused");
            self.notifier.paused();
        }
    }

    /// Resume play; also dismisses the win banner
    pub fn unpause(&mut self) {
        if self.paused {
            log::debug!("Unpaused");
        }
        self.paused = false;
        if self.phase == GamePhase::Win {
            log::info!("Playing on past the win");
            self.phase = GamePhase::Extended;
        }
    }

    /// Clear the pause only; a win banner stays up until the player taps
    pub fn resume(&mut self) {
        if self.paused {
            log::debug!("Resumed");
            self.paused = false;
        }
    }

    /// A tap anywhere on the field
    pub fn tap(&mut self) {
        self.unpause();
    }

    /// Point gravity along a fling gesture and drop in a new ball
    ///
    /// Ignored while paused, after the game ended, or for a zero-length fling.
    pub fn fling(&mut self, x: f32, y: f32) {
        if !self.is_running() {
            return;
        }
        let Some(dir) = Vec2::new(x, y).try_normalize() else {
            log::debug!("Ignoring fling without direction");
            return;
        };
        // balls fall the way they were flung
        self.grav_vec = dir * self.config.gravity;
        self.spawn_ball();
    }

    /// Physics advances in this state
    pub fn is_running(&self) -> bool {
        !self.paused && matches!(self.phase, GamePhase::Ongoing | GamePhase::Extended)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn med_compression(&self) -> f32 {
        self.med_compression
    }

    pub fn compressions(&self) -> &CompressionWindow {
        &self.compressions
    }

    pub fn grav_vec(&self) -> Vec2 {
        self.grav_vec
    }

    pub fn next_achievement_size(&self) -> u32 {
        self.next_achievement_size
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn ui_data(&self) -> UiData {
        UiData {
            score: self.score,
            high_score: self.high_score,
            gravity_angle: self.grav_vec.x.atan2(-self.grav_vec.y),
            pressure: (self.med_compression * 10.0).round() as i32,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            balls: self
                .balls
                .iter()
                .map(|b| BallView {
                    pos: b.pos,
                    radius: b.radius(),
                    color: b.color(),
                    text_color: b.text_color(),
                    value: b.value(),
                })
                .collect(),
            ui: self.ui_data(),
            phase: self.phase,
            paused: self.paused,
            med_compression: self.med_compression,
        }
    }

    /// Everything needed to continue this game later
    pub fn to_save(&self) -> SaveData {
        SaveData {
            balls: Some(
                self.balls
                    .iter()
                    .map(|b| BallRecord {
                        size: Some(b.size()),
                        pos: Some(b.pos.to_array()),
                        vel: Some(b.vel.to_array()),
                    })
                    .collect(),
            ),
            last_compressions: Some(self.compressions.values().collect()),
            med_compression: Some(self.med_compression),
            state: Some(self.phase),
            paused: Some(self.paused),
            score: Some(self.score),
            high_score: Some(self.high_score),
            next_achievement_size: Some(self.next_achievement_size),
            grav_vec: Some(self.grav_vec.to_array()),
        }
    }

    /// Apply a save on top of the current state
    ///
    /// Absent fields keep their current values. A restored win is announced
    /// again. A restored loss is announced too, except on the first run after
    /// install, where a stale save just starts a new game.
    pub fn restore(&mut self, data: &SaveData, first_run: bool) {
        if let Some(records) = &data.balls {
            self.balls = records
                .iter()
                .map(|r| {
                    Ball::new(
                        r.size.unwrap_or(1),
                        r.pos.map(Vec2::from_array).unwrap_or_default(),
                        r.vel.map(Vec2::from_array).unwrap_or_default(),
                        self.palette.clone(),
                    )
                })
                .collect();
        }
        if let Some(values) = &data.last_compressions {
            self.compressions = CompressionWindow::from_values(values, self.config.compression_window);
        }
        if let Some(med) = data.med_compression {
            self.med_compression = med;
        }
        if let Some(phase) = data.state {
            self.phase = phase;
        }
        if let Some(paused) = data.paused {
            self.paused = paused;
        }
        if let Some(score) = data.score {
            self.score = score;
        }
        if let Some(high_score) = data.high_score {
            self.high_score = high_score;
        }
        if let Some(size) = data.next_achievement_size {
            self.next_achievement_size = size;
        }
        if let Some(grav) = data.grav_vec {
            self.grav_vec = Vec2::from_array(grav);
        }
        log::info!(
            "Restored {} balls, score {}, state {:?}",
            self.balls.len(),
            self.score,
            self.phase
        );

        match self.phase {
            GamePhase::Win => {
                self.notifier.game_win(self.score, self.score == self.high_score);
            }
            GamePhase::Lose if first_run => {
                log::info!("Discarding finished game from a previous install");
                self.new_game();
            }
            GamePhase::Lose => {
                self.notifier.game_over(self.score, self.score == self.high_score);
            }
            GamePhase::Ongoing | GamePhase::Extended => {}
        }
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("balls", &self.balls.len())
            .field("phase", &self.phase)
            .field("paused", &self.paused)
            .field("score", &self.score)
            .field("high_score", &self.high_score)
            .field("med_compression", &self.med_compression)
            .field("grav_vec", &self.grav_vec)
            .finish()
    }
}
