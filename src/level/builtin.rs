//! Levels shipped with the game, keyed by a 1-based id

use super::{Goal, Level, Platform, Point, Portal, Spike, Trampoline};
use crate::sim::color::ShadeColor::{Black, White};

/// Number of built-in levels
pub const LEVEL_COUNT: u32 = 3;

/// Built-in level `id`, or `None` when out of range
pub fn level(id: u32) -> Option<Level> {
    let level = match id {
        1 => first_steps(),
        2 => two_tones(),
        3 => springs_and_gates(),
        _ => return None,
    };
    Some(level.normalized())
}

/// Ids of every built-in level in play order
pub fn ids() -> impl Iterator<Item = u32> {
    1..=LEVEL_COUNT
}

fn first_steps() -> Level {
    Level {
        name: "First Steps".into(),
        platforms: vec![
            Platform::new(0.0, 550.0, Black).with_size(800.0, 50.0),
            Platform::new(300.0, 430.0, Black),
        ],
        obstacles: vec![Spike::new(400.0, 550.0, Black)],
        trampolines: Vec::new(),
        portals: Vec::new(),
        goal: Goal::new(700.0, 500.0),
        player_start: Point::new(50.0, 450.0),
    }
}

fn two_tones() -> Level {
    Level {
        name: "Two Tones".into(),
        platforms: vec![
            Platform::new(0.0, 550.0, Black).with_size(350.0, 50.0),
            Platform::new(350.0, 550.0, White).with_size(450.0, 50.0),
            Platform::new(250.0, 420.0, White).with_size(150.0, 20.0),
            Platform::new(500.0, 330.0, Black).with_size(150.0, 20.0),
        ],
        obstacles: vec![
            Spike::new(450.0, 550.0, Black),
            Spike::new(600.0, 550.0, Black),
        ],
        trampolines: Vec::new(),
        portals: Vec::new(),
        goal: Goal::new(720.0, 500.0),
        player_start: Point::new(50.0, 450.0),
    }
}

fn springs_and_gates() -> Level {
    Level {
        name: "Springs and Gates".into(),
        platforms: vec![
            Platform::new(0.0, 550.0, Black).with_size(500.0, 50.0),
            Platform::new(100.0, 335.0, White).with_size(150.0, 20.0),
            Platform::new(550.0, 260.0, White).with_size(250.0, 20.0),
        ],
        obstacles: vec![Spike::new(450.0, 550.0, White)],
        trampolines: vec![Trampoline::new(300.0, 530.0, Black)],
        portals: vec![Portal::new(
            150.0,
            275.0,
            White,
            Point::new(600.0, 200.0),
            1,
        )],
        goal: Goal::new(720.0, 210.0),
        player_start: Point::new(50.0, 450.0),
    }
}
