//! Jump assist: coyote time and jump buffering
//!
//! Both counters count down in seconds. Coyote time lets a jump succeed
//! shortly after walking off a ledge; the buffer remembers a jump pressed
//! shortly before landing.

use super::state::PlayerState;
use crate::tuning::Tuning;

/// Advance both counters by `dt` and register a fresh jump press
pub fn update_counters(player: &mut PlayerState, jump_pressed: bool, dt: f32, tuning: &Tuning) {
    player.coyote_time_counter = if player.is_on_ground {
        tuning.coyote_time
    } else {
        (player.coyote_time_counter - dt).max(0.0)
    };

    player.jump_buffer_counter = (player.jump_buffer_counter - dt).max(0.0);
    if jump_pressed {
        player.jump_buffer_counter = tuning.jump_buffer;
    }

    player.can_jump = player.is_on_ground || player.coyote_time_counter > 0.0;
}

/// Whether a buffered jump may fire this tick
#[inline]
pub fn should_jump(player: &PlayerState) -> bool {
    player.jump_buffer_counter > 0.0
        && (player.is_on_ground || (player.coyote_time_counter > 0.0 && !player.is_on_ground))
}

/// Fire the jump if allowed. Returns true when it fired.
pub fn try_jump(player: &mut PlayerState, tuning: &Tuning) -> bool {
    if !should_jump(player) {
        return false;
    }
    player.vel.y = tuning.jump_force;
    player.is_on_ground = false;
    player.can_jump = false;
    player.coyote_time_counter = 0.0;
    player.jump_buffer_counter = 0.0;
    true
}
