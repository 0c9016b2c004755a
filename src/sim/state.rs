//! Game state and core simulation types
//!
//! The player record is owned here and only mutated by `tick`. Rendering
//! reads the `PlayerSnapshot` published at the end of each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::level::{Level, LevelRef};
use crate::tuning::Tuning;

/// Current phase of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No level loaded
    Unloaded,
    /// Level fetch in flight
    Loading,
    /// Active gameplay
    Playing,
    /// Goal reached; simulation stopped
    Won,
}

/// The player cube
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub is_on_ground: bool,
    pub can_jump: bool,
    /// Scales gravity and divides trampoline force
    pub weight: f32,
    pub coyote_time_counter: f32,
    pub jump_buffer_counter: f32,
    /// Set by a teleport, cleared once the player touches no active portal
    #[serde(default)]
    pub inside_portal: bool,
}

impl PlayerState {
    /// Fresh player at rest at `pos`
    pub fn at(pos: Vec2, weight: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            is_on_ground: false,
            can_jump: false,
            weight,
            coyote_time_counter: 0.0,
            jump_buffer_counter: 0.0,
            inside_portal: false,
        }
    }

    pub fn rect(&self, size: f32) -> Rect {
        Rect::square(self.pos, size)
    }

    /// Drop ground contact and both jump-assist counters
    pub fn clear_ground_state(&mut self) {
        self.is_on_ground = false;
        self.can_jump = false;
        self.coyote_time_counter = 0.0;
        self.jump_buffer_counter = 0.0;
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            pos: self.pos,
            vel: self.vel,
            is_on_ground: self.is_on_ground,
            can_jump: self.can_jump,
        }
    }
}

/// Read-only copy of the player handed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub is_on_ground: bool,
    pub can_jump: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Spike,
    Fell,
}

/// Discrete things that happened during a tick, drained by the session
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Jumped,
    Bounced { velocity_y: f32 },
    Teleported { from: Vec2, to: Vec2 },
    PlayerDied { cause: DeathCause, at: Vec2 },
    PlayerReset,
    ColorsInverted { inverted: bool },
    LevelCompleted { level: Option<LevelRef> },
}

/// A full-state reset waiting on the simulated clock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingReset {
    /// Simulated time (seconds) at which the reset applies
    pub due: f64,
    pub cause: DeathCause,
}

/// Complete play-session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub level: Option<Level>,
    /// Identity of the loaded level, reported on completion
    pub level_ref: Option<LevelRef>,
    pub player: PlayerState,
    /// Global color inversion flag
    pub inverted: bool,
    pub tuning: Tuning,
    /// Simulated seconds since the level was loaded
    pub time: f64,
    pub pending_reset: Option<PendingReset>,
    /// Snapshot published at the end of the last tick
    pub published: PlayerSnapshot,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl GameState {
    pub fn new(tuning: Tuning) -> Self {
        let player = PlayerState::at(Vec2::ZERO, tuning.player_weight);
        Self {
            phase: GamePhase::Unloaded,
            level: None,
            level_ref: None,
            published: player.snapshot(),
            player,
            inverted: false,
            tuning,
            time: 0.0,
            pending_reset: None,
            events: Vec::new(),
        }
    }

    /// Mark a level fetch as in flight. The tick is a no-op until `load_level`.
    pub fn begin_loading(&mut self) {
        self.unload();
        self.phase = GamePhase::Loading;
    }

    /// Install a level and put the player at its start
    pub fn load_level(&mut self, level: Level, level_ref: Option<LevelRef>) {
        log::info!("Loaded level '{}' ({} elements)", level.name, level.element_count());
        self.level = Some(level);
        self.level_ref = level_ref;
        self.time = 0.0;
        self.phase = GamePhase::Playing;
        self.reset_player();
    }

    /// Drop the level and anything scheduled against it
    pub fn unload(&mut self) {
        self.level = None;
        self.level_ref = None;
        self.pending_reset = None;
        self.phase = GamePhase::Unloaded;
        self.events.clear();
    }

    /// Restart the loaded level from scratch, clearing a win
    pub fn restart(&mut self) {
        if self.level.is_none() {
            return;
        }
        self.phase = GamePhase::Playing;
        self.reset_player();
    }

    /// Full-state reset: player at the start, inversion off, nothing pending
    pub fn reset_player(&mut self) {
        let start = self.player_start();
        self.player = PlayerState::at(start, self.tuning.player_weight);
        self.inverted = false;
        self.pending_reset = None;
        self.published = self.player.snapshot();
    }

    /// Spawn point of the loaded level (origin when none is loaded)
    pub fn player_start(&self) -> Vec2 {
        self.level
            .as_ref()
            .map(|l| Vec2::from(l.player_start))
            .unwrap_or(Vec2::ZERO)
    }

    /// Queue a reset `delay` seconds from now. A reset already pending wins.
    pub fn schedule_reset(&mut self, delay: f64, cause: DeathCause) {
        if self.pending_reset.is_some() {
            return;
        }
        self.pending_reset = Some(PendingReset {
            due: self.time + delay,
            cause,
        });
    }

    pub fn cancel_pending_reset(&mut self) {
        self.pending_reset = None;
    }

    /// Horizontal velocity from an external source (touch controls).
    /// Persists until input or a collision changes it.
    pub fn set_horizontal_velocity(&mut self, vx: f32) {
        self.player.vel.x = vx;
    }

    pub fn has_won(&self) -> bool {
        self.phase == GamePhase::Won
    }

    pub fn player_rect(&self) -> Rect {
        self.player.rect(self.tuning.player_size)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Point;

    fn loaded() -> GameState {
        let mut state = GameState::default();
        let mut level = Level::new("test");
        level.player_start = Point::new(50.0, 450.0);
        state.load_level(level, Some(LevelRef::Builtin(1)));
        state
    }

    #[test]
    fn test_load_places_player_at_start() {
        let state = loaded();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.pos, Vec2::new(50.0, 450.0));
        assert_eq!(state.published.pos, Vec2::new(50.0, 450.0));
    }

    #[test]
    fn test_schedule_reset_is_idempotent() {
        let mut state = loaded();
        state.time = 2.0;
        state.schedule_reset(0.4, DeathCause::Fell);
        state.time = 2.2;
        state.schedule_reset(0.0, DeathCause::Spike);
        let pending = state.pending_reset.unwrap();
        assert_eq!(pending.cause, DeathCause::Fell);
        assert!((pending.due - 2.4).abs() < 1e-9);
    }

    #[test]
    fn test_unload_cancels_pending_reset() {
        let mut state = loaded();
        state.schedule_reset(0.4, DeathCause::Fell);
        state.unload();
        assert!(state.pending_reset.is_none());
        assert!(state.level.is_none());
        assert_eq!(state.phase, GamePhase::Unloaded);
    }

    #[test]
    fn test_restart_clears_win_and_inversion() {
        let mut state = loaded();
        state.phase = GamePhase::Won;
        state.inverted = true;
        state.player.pos = Vec2::new(600.0, 100.0);
        state.restart();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.inverted);
        assert_eq!(state.player.pos, Vec2::new(50.0, 450.0));
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = loaded();
        state.push_event(GameEvent::Jumped);
        assert_eq!(state.drain_events(), vec![GameEvent::Jumped]);
        assert!(state.drain_events().is_empty());
    }
}
