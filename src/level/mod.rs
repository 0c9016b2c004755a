//! Level geometry model
//!
//! A level is a set of per-kind element lists plus the two mandatory
//! singletons (goal and player start). Positions are logical coordinates
//! with a top-left origin and Y growing downward, except for spikes whose
//! stored `y` is the base (bottom edge).

pub mod builtin;
pub mod codec;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::collision::Rect;
use crate::sim::color::ShadeColor;

pub use codec::{decode, encode};

/// Errors raised while obtaining or parsing a level
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level not found: {0}")]
    NotFound(String),
    #[error("level code is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("level code is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("level data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level data is missing required object `{0}`")]
    MissingField(&'static str),
    #[error("portal id {0} is out of range")]
    PortalIdOutOfRange(u32),
}

/// Where a level comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelRef {
    /// Static level shipped with the game, numbered from 1
    Builtin(u32),
    /// User level stored through the persistence layer
    Custom(String),
}

/// A 2D point in logical coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        Vec2::new(p.x, p.y)
    }
}

impl From<Vec2> for Point {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Replace a missing or degenerate dimension with the kind's default
fn or_default(value: f32, default: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        default
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    #[serde(default = "Platform::default_width")]
    pub width: f32,
    #[serde(default = "Platform::default_height")]
    pub height: f32,
    #[serde(default)]
    pub color: ShadeColor,
}

impl Platform {
    pub const WIDTH: f32 = 200.0;
    pub const HEIGHT: f32 = 20.0;

    fn default_width() -> f32 {
        Self::WIDTH
    }

    fn default_height() -> f32 {
        Self::HEIGHT
    }

    pub fn new(x: f32, y: f32, color: ShadeColor) -> Self {
        Self {
            x,
            y,
            width: Self::WIDTH,
            height: Self::HEIGHT,
            color,
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A deadly obstacle. `y` is the base of the spike, not its top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spike {
    pub x: f32,
    pub y: f32,
    #[serde(default = "Spike::default_width")]
    pub width: f32,
    #[serde(default = "Spike::default_height")]
    pub height: f32,
    #[serde(default)]
    pub color: ShadeColor,
}

impl Spike {
    pub const WIDTH: f32 = 50.0;
    pub const HEIGHT: f32 = 20.0;

    fn default_width() -> f32 {
        Self::WIDTH
    }

    fn default_height() -> f32 {
        Self::HEIGHT
    }

    pub fn new(x: f32, y: f32, color: ShadeColor) -> Self {
        Self {
            x,
            y,
            width: Self::WIDTH,
            height: Self::HEIGHT,
            color,
        }
    }

    /// Occupied rectangle, spanning `[y - height, y]` vertically
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y - self.height, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trampoline {
    pub x: f32,
    pub y: f32,
    #[serde(default = "Trampoline::default_width")]
    pub width: f32,
    #[serde(default = "Trampoline::default_height")]
    pub height: f32,
    #[serde(default)]
    pub color: ShadeColor,
    /// Vertical impulse, divided by player weight on bounce (negative = up)
    #[serde(default = "Trampoline::default_force")]
    pub force: f32,
}

impl Trampoline {
    pub const WIDTH: f32 = 50.0;
    pub const HEIGHT: f32 = 20.0;
    pub const FORCE: f32 = -10000.0;

    fn default_width() -> f32 {
        Self::WIDTH
    }

    fn default_height() -> f32 {
        Self::HEIGHT
    }

    fn default_force() -> f32 {
        Self::FORCE
    }

    pub fn new(x: f32, y: f32, color: ShadeColor) -> Self {
        Self {
            x,
            y,
            width: Self::WIDTH,
            height: Self::HEIGHT,
            color,
            force: Self::FORCE,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portal {
    pub x: f32,
    pub y: f32,
    #[serde(default = "Portal::default_width")]
    pub width: f32,
    #[serde(default = "Portal::default_height")]
    pub height: f32,
    #[serde(default)]
    pub color: ShadeColor,
    pub destination: Point,
    /// Pairs entry and exit visually; assigned by the editor
    #[serde(default)]
    pub portal_id: u32,
}

impl Portal {
    pub const WIDTH: f32 = 40.0;
    pub const HEIGHT: f32 = 60.0;

    fn default_width() -> f32 {
        Self::WIDTH
    }

    fn default_height() -> f32 {
        Self::HEIGHT
    }

    pub fn new(x: f32, y: f32, color: ShadeColor, destination: Point, portal_id: u32) -> Self {
        Self {
            x,
            y,
            width: Self::WIDTH,
            height: Self::HEIGHT,
            color,
            destination,
            portal_id,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Level exit. Always active regardless of color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub x: f32,
    pub y: f32,
    #[serde(default = "Goal::default_width")]
    pub width: f32,
    #[serde(default = "Goal::default_height")]
    pub height: f32,
}

impl Goal {
    pub const WIDTH: f32 = 50.0;
    pub const HEIGHT: f32 = 50.0;
    /// Position the editor falls back to when the goal is erased
    pub const DEFAULT_POS: Point = Point::new(700.0, 500.0);

    fn default_width() -> f32 {
        Self::WIDTH
    }

    fn default_height() -> f32 {
        Self::HEIGHT
    }

    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            width: Self::WIDTH,
            height: Self::HEIGHT,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

impl Default for Goal {
    fn default() -> Self {
        Self::new(Self::DEFAULT_POS.x, Self::DEFAULT_POS.y)
    }
}

/// Default player spawn, also used when the editor erases the start marker
pub const DEFAULT_PLAYER_START: Point = Point::new(50.0, 450.0);

/// Element kinds the editor can place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Platform,
    Spike,
    Trampoline,
    Portal,
    Goal,
    PlayerStart,
}

impl ElementType {
    pub const ALL: [ElementType; 6] = [
        ElementType::Platform,
        ElementType::Spike,
        ElementType::Trampoline,
        ElementType::Portal,
        ElementType::Goal,
        ElementType::PlayerStart,
    ];

    /// Default footprint of a freshly placed element
    pub fn default_size(self) -> (f32, f32) {
        match self {
            ElementType::Platform => (Platform::WIDTH, Platform::HEIGHT),
            ElementType::Spike => (Spike::WIDTH, Spike::HEIGHT),
            ElementType::Trampoline => (Trampoline::WIDTH, Trampoline::HEIGHT),
            ElementType::Portal => (Portal::WIDTH, Portal::HEIGHT),
            ElementType::Goal => (Goal::WIDTH, Goal::HEIGHT),
            ElementType::PlayerStart => (crate::consts::PLAYER_SIZE, crate::consts::PLAYER_SIZE),
        }
    }
}

/// Any single piece of level geometry
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Platform(Platform),
    Spike(Spike),
    Trampoline(Trampoline),
    Portal(Portal),
    Goal(Goal),
    PlayerStart(Point),
}

impl Element {
    /// Build an element of `kind` at `pos` with default dimensions.
    /// Portals get their own position as destination until one is chosen.
    pub fn with_defaults(kind: ElementType, pos: Point, color: ShadeColor) -> Self {
        match kind {
            ElementType::Platform => Element::Platform(Platform::new(pos.x, pos.y, color)),
            ElementType::Spike => Element::Spike(Spike::new(pos.x, pos.y, color)),
            ElementType::Trampoline => Element::Trampoline(Trampoline::new(pos.x, pos.y, color)),
            ElementType::Portal => Element::Portal(Portal::new(pos.x, pos.y, color, pos, 0)),
            ElementType::Goal => Element::Goal(Goal::new(pos.x, pos.y)),
            ElementType::PlayerStart => Element::PlayerStart(pos),
        }
    }

    pub fn kind(&self) -> ElementType {
        match self {
            Element::Platform(_) => ElementType::Platform,
            Element::Spike(_) => ElementType::Spike,
            Element::Trampoline(_) => ElementType::Trampoline,
            Element::Portal(_) => ElementType::Portal,
            Element::Goal(_) => ElementType::Goal,
            Element::PlayerStart(_) => ElementType::PlayerStart,
        }
    }

    /// Occupied rectangle in logical coordinates
    pub fn rect(&self) -> Rect {
        match self {
            Element::Platform(p) => p.rect(),
            Element::Spike(s) => s.rect(),
            Element::Trampoline(t) => t.rect(),
            Element::Portal(p) => p.rect(),
            Element::Goal(g) => g.rect(),
            Element::PlayerStart(p) => {
                let size = crate::consts::PLAYER_SIZE;
                Rect::new(p.x, p.y, size, size)
            }
        }
    }

    /// Color tag, `None` for kinds that ignore inversion
    pub fn color(&self) -> Option<ShadeColor> {
        match self {
            Element::Platform(p) => Some(p.color),
            Element::Spike(s) => Some(s.color),
            Element::Trampoline(t) => Some(t.color),
            Element::Portal(p) => Some(p.color),
            Element::Goal(_) | Element::PlayerStart(_) => None,
        }
    }
}

/// A complete level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    /// Spikes
    #[serde(default)]
    pub obstacles: Vec<Spike>,
    #[serde(default)]
    pub trampolines: Vec<Trampoline>,
    #[serde(default)]
    pub portals: Vec<Portal>,
    pub goal: Goal,
    pub player_start: Point,
}

impl Level {
    /// Empty level with the default goal and spawn
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platforms: Vec::new(),
            obstacles: Vec::new(),
            trampolines: Vec::new(),
            portals: Vec::new(),
            goal: Goal::default(),
            player_start: DEFAULT_PLAYER_START,
        }
    }

    /// Fill in degenerate dimensions so every element has a positive size
    pub fn normalize(&mut self) {
        for p in &mut self.platforms {
            p.width = or_default(p.width, Platform::WIDTH);
            p.height = or_default(p.height, Platform::HEIGHT);
        }
        for s in &mut self.obstacles {
            s.width = or_default(s.width, Spike::WIDTH);
            s.height = or_default(s.height, Spike::HEIGHT);
        }
        for t in &mut self.trampolines {
            t.width = or_default(t.width, Trampoline::WIDTH);
            t.height = or_default(t.height, Trampoline::HEIGHT);
        }
        for p in &mut self.portals {
            p.width = or_default(p.width, Portal::WIDTH);
            p.height = or_default(p.height, Portal::HEIGHT);
        }
        self.goal.width = or_default(self.goal.width, Goal::WIDTH);
        self.goal.height = or_default(self.goal.height, Goal::HEIGHT);
    }

    /// Builder-style `normalize`
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Append an element to the list for its kind. Singletons are moved.
    pub fn insert(&mut self, element: Element) {
        match element {
            Element::Platform(p) => self.platforms.push(p),
            Element::Spike(s) => self.obstacles.push(s),
            Element::Trampoline(t) => self.trampolines.push(t),
            Element::Portal(p) => self.portals.push(p),
            Element::Goal(g) => self.goal = g,
            Element::PlayerStart(p) => self.player_start = p,
        }
    }

    /// Largest portal id a level may carry; leaves room for one more
    pub const MAX_PORTAL_ID: u32 = u32::MAX - 1;

    /// One past the largest portal id in the level, starting at 1
    pub fn next_portal_id(&self) -> u32 {
        self.portals
            .iter()
            .map(|p| p.portal_id.saturating_add(1))
            .max()
            .unwrap_or(1)
            .max(1)
    }

    /// Total number of list elements (excludes goal and start)
    pub fn element_count(&self) -> usize {
        self.platforms.len() + self.obstacles.len() + self.trampolines.len() + self.portals.len()
    }
}
