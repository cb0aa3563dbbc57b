//! Notifications from the simulation to the host UI
//!
//! The world never reaches out to the UI directly. It is handed a
//! [`Notifier`] at construction and calls it when something the player
//! should see happens.

use std::sync::mpsc::Sender;

/// Something the host UI should react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Win { score: u64, new_high_score: bool },
    GameOver { score: u64, new_high_score: bool },
    Paused,
    Achievement { size: u32 },
}

/// Receiver of one-shot game notifications
pub trait Notifier: Send {
    fn game_win(&mut self, score: u64, new_high_score: bool);
    fn game_over(&mut self, score: u64, new_high_score: bool);
    fn paused(&mut self);
    fn achievement(&mut self, size: u32);
}

/// Forward every notification as a [`GameEvent`]
///
/// A closed receiver is not an error: the UI may already be gone.
impl Notifier for Sender<GameEvent> {
    fn game_win(&mut self, score: u64, new_high_score: bool) {
        let _ = self.send(GameEvent::Win {
            score,
            new_high_score,
        });
    }

    fn game_over(&mut self, score: u64, new_high_score: bool) {
        let _ = self.send(GameEvent::GameOver {
            score,
            new_high_score,
        });
    }

    fn paused(&mut self) {
        let _ = self.send(GameEvent::Paused);
    }

    fn achievement(&mut self, size: u32) {
        let _ = self.send(GameEvent::Achievement { size });
    }
}

/// Notifier for headless runs: everything goes to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn game_win(&mut self, score: u64, new_high_score: bool) {
        log::info!("Game won with {} points (new high score: {})", score, new_high_score);
    }

    fn game_over(&mut self, score: u64, new_high_score: bool) {
        log::info!("Game over with {} points (new high score: {})", score, new_high_score);
    }

    fn paused(&mut self) {
        log::info!("Game paused");
    }

    fn achievement(&mut self, size: u32) {
        log::info!("Achievement: reached {}", 1u64 << size.min(63));
    }
}

/// Drops every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn game_win(&mut self, _score: u64, _new_high_score: bool) {}
    fn game_over(&mut self, _score: u64, _new_high_score: bool) {}
    fn paused(&mut self) {}
    fn achievement(&mut self, _size: u32) {}
}
