//! Trampolines, spikes, portals and the goal
//!
//! Each resolver reads the player's post-platform position and reports
//! what should happen. None of them touch game flow (death callbacks,
//! delayed resets, win state); `tick` owns that.

use glam::Vec2;

use super::collision::{Rect, overlaps};
use super::color::is_active;
use crate::level::{Goal, Portal, Spike, Trampoline};

/// New vertical velocity if the player lands on an active trampoline.
///
/// Only a top-side landing counts: the player must be falling (or resting)
/// and its bottom edge may be at most `tolerance` below the trampoline top.
pub fn resolve_trampolines(
    player: &Rect,
    vel_y: f32,
    weight: f32,
    trampolines: &[Trampoline],
    inverted: bool,
    tolerance: f32,
) -> Option<f32> {
    if vel_y < 0.0 {
        return None;
    }
    trampolines
        .iter()
        .filter(|t| is_active(t.color, inverted))
        .filter(|t| overlaps(player, &t.rect()))
        .filter(|t| player.bottom() - t.y <= tolerance)
        .last()
        .map(|t| t.force / weight)
}

/// Whether the player touches an active spike (base-anchored rects)
pub fn hits_spike(player: &Rect, spikes: &[Spike], inverted: bool) -> bool {
    spikes
        .iter()
        .any(|s| is_active(s.color, inverted) && overlaps(player, &s.rect()))
}

/// Destination of the first active portal the player overlaps
pub fn portal_destination(player: &Rect, portals: &[Portal], inverted: bool) -> Option<Vec2> {
    portals
        .iter()
        .find(|p| is_active(p.color, inverted) && overlaps(player, &p.rect()))
        .map(|p| Vec2::from(p.destination))
}

/// Goal overlap, independent of color
#[inline]
pub fn reached_goal(player: &Rect, goal: &Goal) -> bool {
    overlaps(player, &goal.rect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Point;
    use crate::sim::color::ShadeColor;

    const SIZE: f32 = 30.0;

    fn player(x: f32, y: f32) -> Rect {
        Rect::new(x, y, SIZE, SIZE)
    }

    #[test]
    fn test_trampoline_bounce_from_above() {
        let t = Trampoline::new(300.0, 530.0, ShadeColor::Black);
        // Bottom edge 3px into the trampoline
        let vy = resolve_trampolines(&player(310.0, 503.0), 200.0, 1.0, &[t], false, 5.0);
        assert_eq!(vy, Some(-10000.0));
    }

    #[test]
    fn test_trampoline_scales_by_weight() {
        let t = Trampoline::new(300.0, 530.0, ShadeColor::Black);
        let vy = resolve_trampolines(&player(310.0, 503.0), 0.0, 2.0, &[t], false, 5.0);
        assert_eq!(vy, Some(-5000.0));
    }

    #[test]
    fn test_trampoline_ignores_rising_and_side_contact() {
        let t = Trampoline::new(300.0, 530.0, ShadeColor::Black);
        assert_eq!(
            resolve_trampolines(&player(310.0, 503.0), -50.0, 1.0, &[t.clone()], false, 5.0),
            None
        );
        // Overlapping from the side, bottom well below the top edge
        assert_eq!(
            resolve_trampolines(&player(275.0, 520.0), 0.0, 1.0, &[t], false, 5.0),
            None
        );
    }

    #[test]
    fn test_inactive_trampoline_ignored() {
        let t = Trampoline::new(300.0, 530.0, ShadeColor::White);
        assert_eq!(
            resolve_trampolines(&player(310.0, 503.0), 100.0, 1.0, &[t], false, 5.0),
            None
        );
    }

    #[test]
    fn test_spike_uses_base_offset() {
        let spike = Spike::new(500.0, 530.0, ShadeColor::Black);
        // Occupies y in [510, 530]
        assert!(hits_spike(&player(510.0, 490.0), &[spike.clone()], false));
        // Above the spike top: touching at 510 is not a hit
        assert!(!hits_spike(&player(510.0, 480.0), &[spike.clone()], false));
        // Would overlap if y were treated as the top
        assert!(!hits_spike(&player(510.0, 535.0), &[spike.clone()], false));
        assert!(!hits_spike(&player(510.0, 490.0), &[spike], true));
    }

    #[test]
    fn test_portal_destination() {
        let portal = Portal::new(150.0, 275.0, ShadeColor::Black, Point::new(600.0, 200.0), 1);
        assert_eq!(
            portal_destination(&player(160.0, 290.0), &[portal.clone()], false),
            Some(Vec2::new(600.0, 200.0))
        );
        assert_eq!(portal_destination(&player(160.0, 290.0), &[portal.clone()], true), None);
        assert_eq!(portal_destination(&player(400.0, 290.0), &[portal], false), None);
    }

    #[test]
    fn test_goal_ignores_color() {
        let goal = Goal::new(700.0, 500.0);
        assert!(reached_goal(&player(690.0, 510.0), &goal));
        assert!(!reached_goal(&player(650.0, 510.0), &goal));
    }
}
