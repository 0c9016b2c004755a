//! Color activation
//!
//! Exactly one of the two colors is active at a time. Inversion swaps which
//! one. Only active elements take part in physics.

use serde::{Deserialize, Serialize};

/// Logical color tag of a level element (not a render color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadeColor {
    /// Primary color, active while not inverted
    #[default]
    Black,
    /// Secondary color, active while inverted
    White,
}

impl ShadeColor {
    pub fn other(self) -> Self {
        match self {
            ShadeColor::Black => ShadeColor::White,
            ShadeColor::White => ShadeColor::Black,
        }
    }
}

#[inline]
pub fn active_color(inverted: bool) -> ShadeColor {
    if inverted {
        ShadeColor::White
    } else {
        ShadeColor::Black
    }
}

#[inline]
pub fn inactive_color(inverted: bool) -> ShadeColor {
    active_color(inverted).other()
}

/// Whether an element of `color` is solid/deadly/usable right now
#[inline]
pub fn is_active(color: ShadeColor, inverted: bool) -> bool {
    color == active_color(inverted)
}
