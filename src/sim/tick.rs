//! Fixed timestep simulation tick
//!
//! One call advances every ball, resolves every pair once, folds merges into
//! the score and runs the win/loss checks.

use glam::Vec2;

use super::collision::resolve;
use super::state::{GamePhase, World};
use crate::consts::{STANDARD_GRAVITY, TILT_SPAWN_ANGLE};
use crate::{cartesian_to_polar, normalize_angle};

/// Display rotation relative to the device's natural orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenRotation {
    #[default]
    Rotation0,
    Rotation90,
    Rotation180,
    Rotation270,
}

impl ScreenRotation {
    /// Remap a device-frame vector into the frame of the displayed screen
    pub fn apply(self, v: Vec2) -> Vec2 {
        match self {
            ScreenRotation::Rotation0 => v,
            ScreenRotation::Rotation90 => Vec2::new(-v.y, v.x),
            ScreenRotation::Rotation180 => Vec2::new(-v.x, -v.y),
            ScreenRotation::Rotation270 => Vec2::new(v.y, -v.x),
        }
    }
}

/// Per-tick input from the host
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Accelerometer reading (m/s², device frame, y up) in gravity mode
    pub tilt: Option<Vec2>,
    /// Current display rotation, used to interpret `tilt`
    pub rotation: ScreenRotation,
}

impl World {
    /// Advance the simulation by `dt` seconds
    ///
    /// No-op while paused or while a win/loss is being shown.
    pub fn physics_step(&mut self, dt: f32, input: &TickInput) {
        if !self.is_running() {
            return;
        }

        if let Some(tilt) = input.tilt {
            self.apply_tilt(tilt, input.rotation);
        }

        let field_size = self.config.field_size;
        let wall_damping = self.config.wall_damping;
        let restitution = self.config.restitution;

        let mut total_compression = 0.0;
        let mut i = 0;
        while i < self.balls.len() {
            if self.phase == GamePhase::Ongoing && self.balls[i].size() >= self.config.win_size {
                self.phase = GamePhase::Win;
                log::info!("Win! Score {}", self.score);
                self.notifier
                    .game_win(self.score, self.score == self.high_score);
            }

            self.balls[i].physics_step(dt, field_size, self.grav_vec, wall_damping);

            // Pairs after i. A merge removes j in place, so j is not advanced.
            let mut j = i + 1;
            while j < self.balls.len() {
                let (head, tail) = self.balls.split_at_mut(j);
                let collision = resolve(&mut head[i], &mut tail[0], restitution);
                if collision.merged {
                    let new_size = head[i].size();
                    self.balls.remove(j);
                    self.record_merge(new_size);
                } else {
                    total_compression += collision.compression;
                    j += 1;
                }
            }
            i += 1;
        }

        let average = if self.balls.is_empty() {
            0.0
        } else {
            total_compression / self.balls.len() as f32
        };
        self.compressions.push(average);
        self.med_compression = self.compressions.median();

        if matches!(self.phase, GamePhase::Ongoing | GamePhase::Extended)
            && self.med_compression > self.config.lose_compression
        {
            self.phase = GamePhase::Lose;
            log::info!(
                "Game over: pressure {:.2}, score {}",
                self.med_compression,
                self.score
            );
            self.notifier
                .game_over(self.score, self.score == self.high_score);
        }
    }

    /// Score a merge that produced a ball of `new_size`
    fn record_merge(&mut self, new_size: u32) {
        let merged_value = 1u64 << (new_size - 1).min(63);
        self.score = self.score.saturating_add(merged_value);
        self.high_score = self.high_score.max(self.score);

        if new_size >= self.next_achievement_size {
            log::info!("Achievement: size {}", new_size);
            self.notifier.achievement(new_size);
            self.next_achievement_size = new_size + 1;
        }
    }

    /// Gravity follows the device tilt; a big enough swing drops in a ball
    fn apply_tilt(&mut self, tilt: Vec2, rotation: ScreenRotation) {
        let screen = rotation.apply(tilt);
        // accelerometer x points right and y up; the field's y points down
        self.grav_vec = Vec2::new(-screen.x, screen.y) * (self.config.gravity / STANDARD_GRAVITY);

        if self.grav_vec.length_squared() < 1.0e-6 {
            return;
        }
        let (_, angle) = cartesian_to_polar(self.grav_vec);
        match self.tilt_spawn_angle {
            None => self.tilt_spawn_angle = Some(angle),
            Some(reference) => {
                if normalize_angle(angle - reference).abs() > TILT_SPAWN_ANGLE {
                    self.tilt_spawn_angle = Some(angle);
                    self.spawn_ball();
                }
            }
        }
    }
}
