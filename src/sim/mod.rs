//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`'s `dt`
//! - Delayed resets run on the simulated clock, never wall-clock timers
//! - Stable iteration order (level list order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod color;
pub mod hazards;
pub mod jump;
pub mod state;
pub mod tick;

pub use collision::{PlatformContact, Rect, overlaps, resolve_platforms};
pub use color::{ShadeColor, active_color, inactive_color, is_active};
pub use state::{
    DeathCause, GameEvent, GamePhase, GameState, PendingReset, PlayerSnapshot, PlayerState,
};
pub use tick::{TickInput, tick};
