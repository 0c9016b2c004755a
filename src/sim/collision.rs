//! Collision detection and response for axis-aligned boxes
//!
//! Everything in a level is an AABB. Platforms are resolved per axis:
//! vertical first, then horizontal at the already-resolved height. There is
//! no corner special-casing, and a fast enough player can tunnel through a
//! thin platform between frames. Both are accepted limitations of discrete
//! per-frame resolution.

use glam::Vec2;

use super::color::{ShadeColor, is_active};
use crate::level::Platform;

/// Axis-aligned rectangle, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of edge `size` with its top-left corner at `pos`
    pub fn square(pos: Vec2, size: f32) -> Self {
        Self::new(pos.x, pos.y, size, size)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn at(&self, x: f32, y: f32) -> Self {
        Self { x, y, ..*self }
    }

    /// Grow by `margin` on every side
    pub fn inflate(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// Inclusive point containment
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }
}

/// Strict AABB overlap. Touching edges do not count.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// Outcome of resolving the player against platforms for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlatformContact {
    /// Resolved position
    pub x: f32,
    pub y: f32,
    /// Hit a ceiling while rising
    pub top: bool,
    /// Landed on a platform while falling
    pub bottom: bool,
    /// Blocked while moving left
    pub left: bool,
    /// Blocked while moving right
    pub right: bool,
}

/// Move `player` by `vel * dt` and push it out of every active platform.
///
/// Velocity is not touched; the caller zeroes components based on the
/// returned contact flags. When several platforms overlap on one axis the
/// last one in list order wins.
pub fn resolve_platforms(
    player: Rect,
    vel: Vec2,
    platforms: &[Platform],
    inverted: bool,
    dt: f32,
) -> PlatformContact {
    let active: Vec<&Platform> = platforms
        .iter()
        .filter(|p| is_active(p.color, inverted))
        .collect();

    let tentative_x = player.x + vel.x * dt;
    let tentative_y = player.y + vel.y * dt;

    let mut contact = PlatformContact {
        x: tentative_x,
        y: tentative_y,
        ..Default::default()
    };

    // Vertical pass at the starting X
    let vertical = player.at(player.x, tentative_y);
    for platform in &active {
        if !overlaps(&vertical, &platform.rect()) {
            continue;
        }
        if vel.y > 0.0 {
            contact.y = platform.y - player.height;
            contact.bottom = true;
        } else if vel.y < 0.0 {
            contact.y = platform.y + platform.height;
            contact.top = true;
        }
    }

    // Horizontal pass at the resolved Y
    let horizontal = player.at(tentative_x, contact.y);
    for platform in &active {
        if !overlaps(&horizontal, &platform.rect()) {
            continue;
        }
        if vel.x > 0.0 {
            contact.x = platform.x - player.width;
            contact.right = true;
        } else if vel.x < 0.0 {
            contact.x = platform.x + platform.width;
            contact.left = true;
        }
    }

    contact
}

/// Whether any active `(color, rect)` pair overlaps `rect`
pub fn any_active_overlap<I>(rect: &Rect, inverted: bool, items: I) -> bool
where
    I: IntoIterator<Item = (ShadeColor, Rect)>,
{
    items
        .into_iter()
        .any(|(color, r)| is_active(color, inverted) && overlaps(rect, &r))
}
