//! Per-frame simulation tick
//!
//! Order of a tick: jump-assist counters, horizontal input, gravity, jump,
//! platforms, trampolines, spikes, portals, level bounds, goal.

use super::collision::{any_active_overlap, resolve_platforms};
use super::hazards::{hits_spike, portal_destination, reached_goal, resolve_trampolines};
use super::jump;
use super::state::{DeathCause, GameEvent, GamePhase, GameState};

/// Frame-coherent input snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump pressed this frame (edge, not level)
    pub jump: bool,
    /// A direction key was released and none is held: stop horizontal motion
    pub release_horizontal: bool,
    pub restart: bool,
    pub invert_colors: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // A negative cap yields a zero step
    let dt = dt.min(state.tuning.max_frame_dt).max(0.0);

    if input.restart && state.level.is_some() {
        state.restart();
        state.push_event(GameEvent::PlayerReset);
        return;
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time += f64::from(dt);

    if let Some(pending) = state.pending_reset {
        if state.time < pending.due {
            // Death animation still showing the pre-reset position
            return;
        }
        state.reset_player();
        state.push_event(GameEvent::PlayerReset);
    }

    if input.invert_colors {
        state.inverted = !state.inverted;
        let inverted = state.inverted;
        state.push_event(GameEvent::ColorsInverted { inverted });
    }

    let Some(level) = state.level.as_ref() else {
        return;
    };
    let tuning = &state.tuning;
    let player = &mut state.player;
    let inverted = state.inverted;
    let start = glam::Vec2::from(level.player_start);
    let mut events = Vec::new();

    // 1. Jump assist counters
    jump::update_counters(player, input.jump, dt, tuning);

    // 2. Horizontal input
    if input.left {
        player.vel.x = -tuning.movement_speed;
    } else if input.right {
        player.vel.x = tuning.movement_speed;
    } else if input.release_horizontal {
        player.vel.x = 0.0;
    }

    // 3. Gravity, skipped while grounded with the coyote window spent
    if !(player.is_on_ground && player.coyote_time_counter <= 0.0) {
        player.vel.y += tuning.gravity * player.weight * dt;
    }

    // 4. Jump
    if jump::try_jump(player, tuning) {
        events.push(GameEvent::Jumped);
    }

    // 5. Platforms
    let contact = resolve_platforms(
        player.rect(tuning.player_size),
        player.vel,
        &level.platforms,
        inverted,
        dt,
    );
    player.pos.x = contact.x;
    player.pos.y = contact.y;
    player.is_on_ground = contact.bottom;
    if contact.top || contact.bottom {
        player.vel.y = 0.0;
    }
    if contact.left || contact.right {
        player.vel.x = 0.0;
    }

    // 6. Trampolines
    if let Some(vy) = resolve_trampolines(
        &player.rect(tuning.player_size),
        player.vel.y,
        player.weight,
        &level.trampolines,
        inverted,
        tuning.trampoline_tolerance,
    ) {
        player.vel.y = vy;
        player.is_on_ground = false;
        events.push(GameEvent::Bounced { velocity_y: vy });
    }

    // 7. Spikes
    if hits_spike(&player.rect(tuning.player_size), &level.obstacles, inverted) {
        let before = player.pos;
        player.pos = start;
        player.vel = glam::Vec2::ZERO;
        if before != start {
            log::debug!("Player hit a spike at {:?}", before);
            let delay = tuning.spike_reset_delay;
            events.push(GameEvent::PlayerDied {
                cause: DeathCause::Spike,
                at: before,
            });
            finish(state, events);
            state.schedule_reset(delay, DeathCause::Spike);
            return;
        }
    }

    // 8. Portals, one teleport per entry
    let rect = player.rect(tuning.player_size);
    if player.inside_portal {
        let still_inside = any_active_overlap(
            &rect,
            inverted,
            level.portals.iter().map(|p| (p.color, p.rect())),
        );
        if !still_inside {
            player.inside_portal = false;
        }
    } else if let Some(dest) = portal_destination(&rect, &level.portals, inverted) {
        let from = player.pos;
        player.pos = dest;
        player.vel = glam::Vec2::ZERO;
        player.clear_ground_state();
        player.inside_portal = true;
        log::debug!("Teleported {:?} -> {:?}", from, dest);
        events.push(GameEvent::Teleported { from, to: dest });
    }

    // 9. Level bounds
    let max_x = tuning.max_player_x();
    if player.pos.x < 0.0 {
        player.pos.x = 0.0;
        player.vel.x = 0.0;
    } else if player.pos.x > max_x {
        player.pos.x = max_x;
        player.vel.x = 0.0;
    }
    if player.pos.y < 0.0 {
        player.pos.y = 0.0;
        player.vel.y = 0.0;
    }
    if player.pos.y > tuning.fall_limit() {
        let at = player.pos;
        let delay = tuning.fall_reset_delay;
        log::debug!("Player fell off the level at {:?}", at);
        events.push(GameEvent::PlayerDied {
            cause: DeathCause::Fell,
            at,
        });
        finish(state, events);
        state.schedule_reset(delay, DeathCause::Fell);
        return;
    }

    // 10. Goal
    let won = reached_goal(&player.rect(tuning.player_size), &level.goal);
    finish(state, events);
    if won && !state.has_won() {
        state.phase = GamePhase::Won;
        let level_ref = state.level_ref.clone();
        log::info!("Level completed: {:?}", level_ref);
        state.push_event(GameEvent::LevelCompleted { level: level_ref });
    }
}

/// Publish the snapshot and hand over this tick's events
fn finish(state: &mut GameState, events: Vec<GameEvent>) {
    state.published = state.player.snapshot();
    for event in events {
        state.push_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Goal, Level, LevelRef, Platform, Point, Portal, Spike, Trampoline};
    use crate::sim::color::ShadeColor;
    use crate::sim::state::PlayerState;
    use glam::Vec2;

    const DT: f32 = 0.016;

    fn floor_level() -> Level {
        let mut level = Level::new("floor");
        level.player_start = Point::new(50.0, 450.0);
        level
            .platforms
            .push(Platform::new(0.0, 550.0, ShadeColor::Black).with_size(800.0, 50.0));
        level
    }

    fn start(level: Level) -> GameState {
        let mut state = GameState::default();
        state.load_level(level, Some(LevelRef::Builtin(1)));
        state
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_player_settles_on_floor() {
        let mut state = start(floor_level());
        let mut ticks = 0;
        while !state.player.is_on_ground && ticks < 120 {
            tick(&mut state, &idle(), DT);
            ticks += 1;
        }
        assert!(state.player.is_on_ground, "never landed");
        assert_eq!(state.player.pos.y, 550.0 - state.tuning.player_size);
        assert_eq!(state.player.vel.y, 0.0);

        // Stays put while idle
        for _ in 0..30 {
            tick(&mut state, &idle(), DT);
        }
        assert!(state.player.is_on_ground);
        assert_eq!(state.player.pos.y, 520.0);
        assert_eq!(state.published.pos, state.player.pos);
    }

    #[test]
    fn test_falls_through_inactive_floor() {
        let mut state = start(floor_level());
        state.inverted = true;
        for _ in 0..30 {
            tick(&mut state, &idle(), DT);
        }
        assert!(!state.player.is_on_ground);
        assert!(state.player.pos.y > 520.0);
    }

    #[test]
    fn test_jump_from_floor() {
        let mut state = start(floor_level());
        for _ in 0..60 {
            tick(&mut state, &idle(), DT);
        }
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, DT);
        assert!(state.player.vel.y < 0.0);
        assert!(state.player.pos.y < 520.0);
        assert!(state.drain_events().contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_horizontal_input_and_release() {
        let mut state = start(floor_level());
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &right, DT);
        assert_eq!(state.player.vel.x, state.tuning.movement_speed);

        // Velocity persists without input
        tick(&mut state, &idle(), DT);
        assert_eq!(state.player.vel.x, state.tuning.movement_speed);

        let release = TickInput {
            release_horizontal: true,
            ..Default::default()
        };
        tick(&mut state, &release, DT);
        assert_eq!(state.player.vel.x, 0.0);
    }

    #[test]
    fn test_spike_resets_to_start_once() {
        let mut level = floor_level();
        level.obstacles.push(Spike::new(500.0, 530.0, ShadeColor::Black));
        let mut state = start(level);
        state.player.pos = Vec2::new(505.0, 495.0);
        state.player.vel = Vec2::new(100.0, 0.0);

        tick(&mut state, &idle(), DT);
        assert_eq!(state.player.pos, Vec2::new(50.0, 450.0));
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert!(state.pending_reset.is_some());

        let deaths = |events: &[GameEvent]| {
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::PlayerDied { cause: DeathCause::Spike, .. }))
                .count()
        };
        let mut events = state.drain_events();
        assert_eq!(deaths(&events), 1);

        // The zero-delay reset lands on the next tick
        tick(&mut state, &idle(), DT);
        assert!(state.pending_reset.is_none());
        events.extend(state.drain_events());
        assert_eq!(deaths(&events), 1);
        assert!(events.contains(&GameEvent::PlayerReset));
    }

    #[test]
    fn test_spike_at_start_is_not_a_death() {
        let mut level = Level::new("camped");
        level.player_start = Point::new(505.0, 495.0);
        level.obstacles.push(Spike::new(500.0, 530.0, ShadeColor::Black));
        level.goal = Goal::new(500.0, 480.0);
        let mut state = start(level);

        // Zero step: the player stays on the spawn point, inside the spike
        tick(&mut state, &idle(), 0.0);
        assert_eq!(state.player.pos, Vec2::new(505.0, 495.0));
        assert!(state.pending_reset.is_none());
        let events = state.drain_events();
        assert!(!events.iter().any(|e| matches!(e, GameEvent::PlayerDied { .. })));
        // The tick ran on to the goal check
        assert!(state.has_won());
        assert!(matches!(events.last(), Some(GameEvent::LevelCompleted { .. })));
    }

    #[test]
    fn test_negative_frame_cap_freezes_instead_of_panicking() {
        let mut state = start(floor_level());
        state.tuning.max_frame_dt = -1.0;
        tick(&mut state, &idle(), DT);
        assert_eq!(state.player.pos, Vec2::new(50.0, 450.0));
        assert_eq!(state.time, 0.0);
    }

    #[test]
    fn test_trampoline_bounce() {
        let mut level = Level::new("bounce");
        level.player_start = Point::new(310.0, 400.0);
        level.trampolines.push(Trampoline::new(300.0, 530.0, ShadeColor::Black));
        let mut state = start(level);
        state.player.pos = Vec2::new(310.0, 499.0);
        state.player.vel = Vec2::new(0.0, 100.0);

        tick(&mut state, &idle(), DT);
        assert_eq!(state.player.vel.y, -10000.0);
        assert!(!state.player.is_on_ground);
    }

    #[test]
    fn test_portal_teleports_once() {
        let mut level = Level::new("portal");
        level.player_start = Point::new(10.0, 10.0);
        level.portals.push(Portal::new(
            150.0,
            275.0,
            ShadeColor::Black,
            Point::new(600.0, 200.0),
            1,
        ));
        // Exit portal sits right on the destination
        level.portals.push(Portal::new(
            590.0,
            190.0,
            ShadeColor::Black,
            Point::new(150.0, 275.0),
            1,
        ));
        let mut state = start(level);
        state.player.pos = Vec2::new(155.0, 280.0);

        tick(&mut state, &idle(), 0.0);
        assert_eq!(state.player.pos, Vec2::new(600.0, 200.0));
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert_eq!(state.player.jump_buffer_counter, 0.0);

        // Standing in the exit portal must not bounce the player back
        tick(&mut state, &idle(), 0.0);
        assert_eq!(state.player.pos, Vec2::new(600.0, 200.0));
        let teleports = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Teleported { .. }))
            .count();
        assert_eq!(teleports, 1);
    }

    #[test]
    fn test_fall_off_schedules_delayed_reset() {
        let mut state = start(Level::new("void"));
        state.player.pos = Vec2::new(100.0, 795.0);
        state.player.vel = Vec2::new(0.0, 1000.0);

        tick(&mut state, &idle(), DT);
        let pending = state.pending_reset.expect("reset scheduled");
        assert_eq!(pending.cause, DeathCause::Fell);
        let frozen = state.player.pos;

        // Frozen until the delay elapses, and no second death
        for _ in 0..10 {
            tick(&mut state, &idle(), DT);
        }
        assert_eq!(state.player.pos, frozen);
        let events = state.drain_events();
        let deaths = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerDied { .. }))
            .count();
        assert_eq!(deaths, 1);

        let mut waited = 10;
        while state.pending_reset.is_some() && waited < 60 {
            tick(&mut state, &idle(), DT);
            waited += 1;
        }
        assert!(state.pending_reset.is_none());
        assert!(waited >= 24, "reset fired early after {waited} ticks");
        // Back at the start, one tick of gravity applied
        assert!(state.player.pos.y < 460.0);
    }

    #[test]
    fn test_bounds_clamp() {
        let mut state = start(floor_level());
        state.player.pos = Vec2::new(2.0, 5.0);
        state.player.vel = Vec2::new(-350.0, -600.0);
        tick(&mut state, &idle(), DT);
        assert_eq!(state.player.pos.x, 0.0);
        assert_eq!(state.player.vel.x, 0.0);
        assert_eq!(state.player.pos.y, 0.0);
        assert_eq!(state.player.vel.y, 0.0);

        state.player.pos = Vec2::new(768.0, 300.0);
        state.player.vel = Vec2::new(350.0, 0.0);
        tick(&mut state, &idle(), DT);
        assert_eq!(state.player.pos.x, 770.0);
    }

    #[test]
    fn test_goal_completes_once() {
        let mut level = floor_level();
        level.goal = crate::level::Goal::new(100.0, 500.0);
        let mut state = start(level);
        state.player.pos = Vec2::new(110.0, 510.0);

        tick(&mut state, &idle(), DT);
        assert!(state.has_won());
        tick(&mut state, &idle(), DT);
        let completions = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::LevelCompleted { .. }))
            .count();
        assert_eq!(completions, 1);
    }

    #[test]
    fn test_noop_when_not_playing() {
        let mut state = GameState::default();
        tick(&mut state, &idle(), DT);
        assert_eq!(state.time, 0.0);

        state.begin_loading();
        tick(&mut state, &idle(), DT);
        assert_eq!(state.phase, GamePhase::Loading);
        assert_eq!(state.player, PlayerState::at(Vec2::ZERO, 1.0));
    }

    #[test]
    fn test_invert_toggles_and_restart_resets() {
        let mut state = start(floor_level());
        let invert = TickInput {
            invert_colors: true,
            ..Default::default()
        };
        tick(&mut state, &invert, DT);
        assert!(state.inverted);

        state.player.pos = Vec2::new(300.0, 100.0);
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, DT);
        assert!(!state.inverted);
        assert_eq!(state.player.pos, Vec2::new(50.0, 450.0));
    }

    #[test]
    fn test_dt_is_capped() {
        let mut state = start(Level::new("empty"));
        tick(&mut state, &idle(), 5.0);
        assert!((state.time - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput {
                jump: true,
                right: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                left: true,
                ..Default::default()
            },
        ];
        let mut a = start(crate::level::builtin::level(1).unwrap());
        let mut b = start(crate::level::builtin::level(1).unwrap());
        for _ in 0..20 {
            for input in &inputs {
                tick(&mut a, input, DT);
                tick(&mut b, input, DT);
            }
        }
        assert_eq!(a.player, b.player);
        assert_eq!(a.time, b.time);
    }
}
