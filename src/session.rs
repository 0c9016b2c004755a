//! Play session driver
//!
//! Owns the simulation state and its collaborators (frame clock, input
//! tracker, progression, level library) and runs one tick per frame.

use crate::level::{Level, LevelError, LevelRef, builtin};
use crate::persistence::{BlobStore, LevelLibrary, StoreError};
use crate::platform::{Action, FrameClock, InputTracker};
use crate::progression::Progression;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, PlayerSnapshot, tick};

/// What the presentation layer needs to draw a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView<'a> {
    pub player: PlayerSnapshot,
    pub level: Option<&'a Level>,
    pub inverted: bool,
    pub phase: GamePhase,
}

pub struct GameSession<S: BlobStore> {
    state: GameState,
    clock: FrameClock,
    input: InputTracker,
    progression: Progression,
    library: LevelLibrary<S>,
}

impl<S: BlobStore> GameSession<S> {
    /// New session with progression read from the library's store
    pub fn new(settings: &Settings, library: LevelLibrary<S>) -> Self {
        let progression = Progression::load(library.store());
        Self {
            state: GameState::new(settings.tuning.clone()),
            clock: FrameClock::new(settings.tuning.max_frame_dt),
            input: InputTracker::new(settings.controls.clone()),
            progression,
            library,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn library(&self) -> &LevelLibrary<S> {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut LevelLibrary<S> {
        &mut self.library
    }

    pub fn key_down(&mut self, code: &str) -> Option<Action> {
        self.input.key_down(code)
    }

    pub fn key_up(&mut self, code: &str) -> Option<Action> {
        self.input.key_up(code)
    }

    /// Touch controls drive horizontal motion directly
    pub fn set_horizontal_velocity(&mut self, vx: f32) {
        self.state.set_horizontal_velocity(vx);
    }

    /// Enter `Loading`; frames are no-ops until `finish_loading`
    pub fn begin_loading(&mut self) {
        self.input.clear();
        self.state.begin_loading();
    }

    /// Complete a load started with `begin_loading`. On error the session is
    /// left unloaded and the error is handed back to the caller.
    pub fn finish_loading(
        &mut self,
        result: Result<Level, LevelError>,
        level_ref: LevelRef,
    ) -> Result<(), LevelError> {
        match result {
            Ok(level) => {
                self.state.load_level(level.normalized(), Some(level_ref));
                self.clock.reset();
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to load level {:?}: {}", level_ref, e);
                self.state.unload();
                Err(e)
            }
        }
    }

    /// Fetch a built-in or stored level and start playing it
    pub fn load(&mut self, level_ref: LevelRef) -> Result<(), StoreError> {
        self.begin_loading();
        let fetched: Result<Level, StoreError> = match &level_ref {
            LevelRef::Builtin(id) => builtin::level(*id)
                .ok_or_else(|| LevelError::NotFound(format!("builtin level {id}")).into()),
            LevelRef::Custom(id) => self.library.load_level(id),
        };
        match fetched {
            Ok(level) => Ok(self.finish_loading(Ok(level), level_ref)?),
            Err(StoreError::Level(e)) => Ok(self.finish_loading(Err(e), level_ref)?),
            Err(e) => {
                log::warn!("Failed to read level {:?}: {}", level_ref, e);
                self.state.unload();
                Err(e)
            }
        }
    }

    /// Run one animation frame at timestamp `now_ms`
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let dt = self.clock.advance(now_ms);
        self.step(dt)
    }

    /// Run one tick of exactly `dt` seconds (capped by tuning)
    pub fn step(&mut self, dt: f32) -> Vec<GameEvent> {
        let input = self.input.snapshot();
        tick(&mut self.state, &input, dt);
        self.input.end_frame();

        let events = self.state.drain_events();
        for event in &events {
            if let GameEvent::LevelCompleted {
                level: Some(LevelRef::Builtin(id)),
            } = event
            {
                self.record_completion(*id);
            }
        }
        events
    }

    fn record_completion(&mut self, level_id: u32) {
        if !self.progression.mark_level_completed(level_id) {
            return;
        }
        if let Err(e) = self.progression.save(self.library.store_mut()) {
            log::warn!("Failed to save progression: {}", e);
        }
    }

    /// Navigate away from the level
    pub fn leave(&mut self) {
        self.state.cancel_pending_reset();
        self.input.clear();
        self.clock.reset();
        self.state.unload();
    }

    pub fn view(&self) -> RenderView<'_> {
        RenderView {
            player: self.state.published,
            level: self.state.level.as_ref(),
            inverted: self.state.inverted,
            phase: self.state.phase,
        }
    }
}
