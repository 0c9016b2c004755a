//! Invert Cube - a color-inverting cube platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, hazards, game state)
//! - `level`: Level geometry model, built-in levels and the interchange codec
//! - `editor`: Level editor interaction model (view transform, modes, hit-testing)
//! - `platform`: Input snapshotting and frame timing
//! - `persistence`: Key-value level storage
//! - `progression`: Level completion and unlock rules
//! - `session`: Frame driver tying the simulation to its collaborators
//! - `tuning`: Data-driven physics constants

pub mod editor;
pub mod level;
pub mod persistence;
pub mod platform;
pub mod progression;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use level::{Level, LevelError, LevelRef};
pub use progression::Progression;
pub use session::GameSession;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Logical level dimensions (independent of display size)
    pub const LEVEL_WIDTH: f32 = 800.0;
    pub const LEVEL_HEIGHT: f32 = 600.0;

    /// Player cube edge length
    pub const PLAYER_SIZE: f32 = 30.0;
    pub const PLAYER_WEIGHT: f32 = 1.0;

    /// Downward acceleration (pixels/s², scaled by player weight)
    pub const GRAVITY: f32 = 5500.0;
    /// Horizontal speed while a direction is held (pixels/s)
    pub const MOVEMENT_SPEED: f32 = 350.0;
    /// Jump impulse (negative = upward)
    pub const JUMP_FORCE: f32 = -1500.0;

    /// Grace window after leaving a platform (seconds)
    pub const COYOTE_TIME_DURATION: f32 = 0.1;
    /// Grace window before landing (seconds)
    pub const JUMP_BUFFER_DURATION: f32 = 0.1;

    /// How far the player's bottom may sink past a trampoline top and still bounce
    pub const TRAMPOLINE_TOLERANCE: f32 = 5.0;

    /// Falling this far below the level counts as a death
    pub const FALL_DEATH_MARGIN: f32 = 200.0;
    /// Delay before resetting after a fall (death animation length)
    pub const FALL_RESET_DELAY: f64 = 0.4;
    /// Delay before the full-state reset after a spike hit
    pub const SPIKE_RESET_DELAY: f64 = 0.0;

    /// Largest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Editor zoom limits
    pub const MIN_ZOOM: f32 = 0.25;
    pub const MAX_ZOOM: f32 = 3.0;
    pub const ZOOM_STEP: f32 = 1.2;
    /// Fraction of the viewport the level occupies after auto-fit
    pub const FIT_MARGIN: f32 = 0.95;
    /// Erase hit-test margin in screen pixels (divided by zoom)
    pub const ERASE_TOLERANCE: f32 = 6.0;
}
