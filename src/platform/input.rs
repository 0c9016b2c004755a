//! Keyboard input
//!
//! Key codes follow the DOM `KeyboardEvent.code` names ("ArrowLeft",
//! "KeyA", "Space"). The tracker collects raw down/up events between frames
//! and hands the simulation one `TickInput` per frame.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// Game actions a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Jump,
    Restart,
    InvertColors,
}

/// Key table, remappable through settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub jump: Vec<String>,
    pub restart: Vec<String>,
    pub invert_colors: Vec<String>,
}

fn keys(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: keys(&["ArrowLeft", "KeyA"]),
            right: keys(&["ArrowRight", "KeyD"]),
            jump: keys(&["Space", "ArrowUp", "KeyW"]),
            restart: keys(&["KeyR"]),
            invert_colors: keys(&["KeyE", "ShiftLeft", "ShiftRight"]),
        }
    }
}

impl KeyBindings {
    /// Action bound to `code`, if any. Earlier actions win on conflicts.
    pub fn action_for(&self, code: &str) -> Option<Action> {
        [
            (Action::Left, &self.left),
            (Action::Right, &self.right),
            (Action::Jump, &self.jump),
            (Action::Restart, &self.restart),
            (Action::InvertColors, &self.invert_colors),
        ]
        .into_iter()
        .find(|(_, codes)| codes.iter().any(|c| c == code))
        .map(|(action, _)| action)
    }

    pub fn bind(&mut self, action: Action, code: impl Into<String>) {
        let code = code.into();
        let list = match action {
            Action::Left => &mut self.left,
            Action::Right => &mut self.right,
            Action::Jump => &mut self.jump,
            Action::Restart => &mut self.restart,
            Action::InvertColors => &mut self.invert_colors,
        };
        if !list.contains(&code) {
            list.push(code);
        }
    }
}

/// Accumulates key events and produces per-frame snapshots
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    bindings: KeyBindings,
    /// Physical keys currently down
    held_keys: HashSet<String>,
    /// Actions newly pressed since the last `end_frame`
    pressed: HashSet<Action>,
    horizontal_released: bool,
}

impl InputTracker {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Default::default()
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Returns the bound action so callers can suppress default handling
    pub fn key_down(&mut self, code: &str) -> Option<Action> {
        let action = self.bindings.action_for(code)?;
        // Auto-repeat keydowns do not count as fresh presses
        if self.held_keys.insert(code.to_string()) {
            self.pressed.insert(action);
        }
        Some(action)
    }

    pub fn key_up(&mut self, code: &str) -> Option<Action> {
        let action = self.bindings.action_for(code)?;
        self.held_keys.remove(code);
        if matches!(action, Action::Left | Action::Right)
            && !self.is_held(Action::Left)
            && !self.is_held(Action::Right)
        {
            self.horizontal_released = true;
        }
        Some(action)
    }

    /// Whether any key bound to `action` is down
    pub fn is_held(&self, action: Action) -> bool {
        self.held_keys
            .iter()
            .any(|code| self.bindings.action_for(code) == Some(action))
    }

    /// Snapshot for the current frame
    pub fn snapshot(&self) -> TickInput {
        let left = self.is_held(Action::Left);
        let right = self.is_held(Action::Right);
        TickInput {
            left,
            right,
            jump: self.pressed.contains(&Action::Jump),
            release_horizontal: self.horizontal_released && !left && !right,
            restart: self.pressed.contains(&Action::Restart),
            invert_colors: self.pressed.contains(&Action::InvertColors),
        }
    }

    /// Clear one-shot inputs after the frame consumed them
    pub fn end_frame(&mut self) {
        self.pressed.clear();
        self.horizontal_released = false;
    }

    /// Drop everything (window blur, leaving the level)
    pub fn clear(&mut self) {
        self.held_keys.clear();
        self.end_frame();
    }
}
