//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of the ball list)
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod compression;
pub mod events;
pub mod state;
pub mod tick;

pub use ball::{Ball, rand_circle};
pub use collision::{Collision, resolve};
pub use compression::CompressionWindow;
pub use events::{GameEvent, LogNotifier, Notifier, NullNotifier};
pub use state::{BallView, GamePhase, Snapshot, UiData, World};
pub use tick::{ScreenRotation, TickInput};
