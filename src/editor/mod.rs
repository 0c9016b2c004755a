//! Level editor interaction model
//!
//! Modes are mutually exclusive: `Place`, `Erase` and `Pan`. Placing a
//! portal takes two clicks: the first drops a pending entry portal, the
//! second picks its destination and commits it to the level. While the
//! destination is being picked, right-click or Escape cancels.
//!
//! A cancelled portal never consumes a portal id; `portal_counter` only
//! advances when a portal is committed.

pub mod view;

use glam::Vec2;

use crate::level::{
    DEFAULT_PLAYER_START, Element, ElementType, Goal, Level, LevelError, Point, Portal, codec,
};
use crate::persistence::{BlobStore, LevelLibrary, StoreError};
use crate::settings::EditorSettings;
use crate::sim::color::ShadeColor;

pub use view::ViewTransform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Place,
    Erase,
    Pan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left click / touch
    Primary,
    /// Right click
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Escape,
    Space,
}

/// Ghost of the element that a click would place
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preview {
    pub kind: ElementType,
    pub at: Point,
}

/// What a pointer press did to the level
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Nothing,
    Placed(ElementType),
    PortalPending { portal_id: u32 },
    PortalPlaced { portal_id: u32 },
    PortalCancelled,
    Erased(usize),
    PanStarted,
    ModeChanged(EditorMode),
}

/// One open editing session over a level
#[derive(Debug, Clone)]
pub struct EditorSession {
    level: Level,
    /// Storage id once saved
    level_id: Option<String>,
    mode: EditorMode,
    /// Mode to return to when pan is toggled off
    previous_mode: Option<EditorMode>,
    selected: Option<ElementType>,
    pending_portal: Option<Portal>,
    portal_counter: u32,
    placement_color: ShadeColor,
    preview: Option<Preview>,
    dirty: bool,
    erase_tolerance: f32,
    pub view: ViewTransform,
}

impl EditorSession {
    pub fn new(level: Level, level_id: Option<String>, settings: &EditorSettings) -> Self {
        let level = level.normalized();
        Self {
            portal_counter: level.next_portal_id(),
            level,
            level_id,
            mode: EditorMode::Place,
            previous_mode: None,
            selected: None,
            pending_portal: None,
            placement_color: ShadeColor::Black,
            preview: None,
            dirty: false,
            erase_tolerance: settings.erase_tolerance,
            view: ViewTransform::new(settings),
        }
    }

    /// Blank level session
    pub fn blank(name: impl Into<String>, settings: &EditorSettings) -> Self {
        Self::new(Level::new(name), None, settings)
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_id(&self) -> Option<&str> {
        self.level_id.as_deref()
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn selected(&self) -> Option<ElementType> {
        self.selected
    }

    pub fn pending_portal(&self) -> Option<&Portal> {
        self.pending_portal.as_ref()
    }

    pub fn is_selecting_portal_destination(&self) -> bool {
        self.pending_portal.is_some()
    }

    /// Id the next committed portal will get
    pub fn portal_counter(&self) -> u32 {
        self.portal_counter
    }

    pub fn preview(&self) -> Option<Preview> {
        self.preview
    }

    /// Unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn placement_color(&self) -> ShadeColor {
        self.placement_color
    }

    /// Color given to newly placed colored elements
    pub fn set_placement_color(&mut self, color: ShadeColor) {
        self.placement_color = color;
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.level.name = name.into();
        self.dirty = true;
    }

    /// Pick the element type to place. Always switches to `Place`.
    pub fn select_element(&mut self, kind: ElementType) {
        self.selected = Some(kind);
        self.mode = EditorMode::Place;
        self.previous_mode = None;
        self.pending_portal = None;
        self.view.end_pan();
    }

    /// Switch directly to a mode (toolbar buttons)
    pub fn set_mode(&mut self, mode: EditorMode) {
        if mode == EditorMode::Pan {
            if self.mode != EditorMode::Pan {
                self.toggle_pan();
            }
            return;
        }
        self.mode = mode;
        self.previous_mode = None;
        self.pending_portal = None;
        self.preview = None;
        self.view.end_pan();
    }

    /// Enter pan mode, or go back to whatever mode was active before it
    pub fn toggle_pan(&mut self) {
        if self.mode == EditorMode::Pan {
            self.mode = self.previous_mode.take().unwrap_or(EditorMode::Place);
            self.view.end_pan();
        } else {
            self.previous_mode = Some(self.mode);
            self.mode = EditorMode::Pan;
            self.preview = None;
        }
    }

    pub fn pointer_down(&mut self, button: PointerButton, client: Vec2) -> EditOutcome {
        let at = Point::from(self.view.screen_to_logical(client));
        match button {
            PointerButton::Secondary => {
                if self.is_selecting_portal_destination() {
                    self.cancel_portal();
                    EditOutcome::PortalCancelled
                } else {
                    self.toggle_pan();
                    EditOutcome::ModeChanged(self.mode)
                }
            }
            PointerButton::Primary => match self.mode {
                EditorMode::Pan => {
                    self.view.begin_pan(client);
                    EditOutcome::PanStarted
                }
                EditorMode::Erase => EditOutcome::Erased(self.erase_at(at)),
                EditorMode::Place => {
                    if self.is_selecting_portal_destination() {
                        self.finish_portal(at)
                    } else if let Some(kind) = self.selected {
                        self.place(kind, at)
                    } else {
                        EditOutcome::Nothing
                    }
                }
            },
        }
    }

    pub fn pointer_move(&mut self, client: Vec2) {
        if self.view.is_panning() {
            self.view.update_pan(client);
            return;
        }
        self.preview = match (self.mode, self.selected) {
            (EditorMode::Place, Some(kind)) => Some(Preview {
                kind,
                at: Point::from(self.view.screen_to_logical(client)),
            }),
            _ => None,
        };
    }

    pub fn pointer_up(&mut self, button: PointerButton, _client: Vec2) {
        if button == PointerButton::Primary {
            self.view.end_pan();
        }
    }

    pub fn key_down(&mut self, key: EditorKey) -> EditOutcome {
        match key {
            EditorKey::Space => {
                self.toggle_pan();
                EditOutcome::ModeChanged(self.mode)
            }
            EditorKey::Escape if self.is_selecting_portal_destination() => {
                self.cancel_portal();
                EditOutcome::PortalCancelled
            }
            EditorKey::Escape => {
                self.selected = None;
                self.preview = None;
                EditOutcome::Nothing
            }
        }
    }

    fn place(&mut self, kind: ElementType, at: Point) -> EditOutcome {
        if kind == ElementType::Portal {
            let portal_id = self.portal_counter;
            self.pending_portal =
                Some(Portal::new(at.x, at.y, self.placement_color, at, portal_id));
            log::debug!(
                "Portal {} entry at ({}, {}), awaiting destination",
                portal_id,
                at.x,
                at.y
            );
            return EditOutcome::PortalPending { portal_id };
        }
        self.level.insert(Element::with_defaults(kind, at, self.placement_color));
        self.dirty = true;
        log::debug!("Placed {:?} at ({}, {})", kind, at.x, at.y);
        EditOutcome::Placed(kind)
    }

    fn finish_portal(&mut self, destination: Point) -> EditOutcome {
        let Some(mut portal) = self.pending_portal.take() else {
            return EditOutcome::Nothing;
        };
        portal.destination = destination;
        let portal_id = portal.portal_id;
        self.level.portals.push(portal);
        self.portal_counter = self.portal_counter.max(portal_id).saturating_add(1);
        self.dirty = true;
        log::debug!(
            "Portal {} placed, destination ({}, {})",
            portal_id,
            destination.x,
            destination.y
        );
        EditOutcome::PortalPlaced { portal_id }
    }

    /// Drop the pending portal without touching the level or the counter
    pub fn cancel_portal(&mut self) {
        if self.pending_portal.take().is_some() {
            log::debug!("Portal placement cancelled");
        }
    }

    /// Remove the first element under `at` in every list. The goal and the
    /// player start are mandatory and go back to their defaults instead.
    /// Returns how many things changed.
    pub fn erase_at(&mut self, at: Point) -> usize {
        let point = Vec2::from(at);
        let zoom = self.view.zoom();
        let margin = if zoom > 0.0 {
            self.erase_tolerance / zoom
        } else {
            self.erase_tolerance
        };
        let hit = |rect: crate::sim::collision::Rect| rect.inflate(margin).contains(point);

        let mut removed = 0;
        if let Some(i) = self.level.platforms.iter().position(|p| hit(p.rect())) {
            self.level.platforms.remove(i);
            removed += 1;
        }
        // Spike rects already account for the base-anchored y
        if let Some(i) = self.level.obstacles.iter().position(|s| hit(s.rect())) {
            self.level.obstacles.remove(i);
            removed += 1;
        }
        if let Some(i) = self.level.trampolines.iter().position(|t| hit(t.rect())) {
            self.level.trampolines.remove(i);
            removed += 1;
        }
        if let Some(i) = self.level.portals.iter().position(|p| hit(p.rect())) {
            self.level.portals.remove(i);
            removed += 1;
        }
        if hit(Element::PlayerStart(self.level.player_start).rect()) {
            self.level.player_start = DEFAULT_PLAYER_START;
            removed += 1;
        }
        if hit(self.level.goal.rect()) {
            self.level.goal = Goal::default();
            removed += 1;
        }

        if removed > 0 {
            self.dirty = true;
            log::debug!("Erased {} element(s) at ({}, {})", removed, at.x, at.y);
        }
        removed
    }

    /// Shareable code for the current level
    pub fn export_code(&self) -> Result<String, LevelError> {
        codec::encode(&self.level)
    }

    /// Replace the level with a decoded code. On error nothing changes.
    pub fn import_code(&mut self, code: &str) -> Result<(), LevelError> {
        let level = match codec::decode(code) {
            Ok(level) => level,
            Err(e) => {
                log::warn!("Rejected level import: {}", e);
                return Err(e);
            }
        };
        log::info!("Imported level '{}'", level.name);
        self.portal_counter = level.next_portal_id();
        self.level = level;
        self.level_id = None;
        self.pending_portal = None;
        self.preview = None;
        self.dirty = true;
        Ok(())
    }

    /// Persist the level, reusing its id after the first save
    pub fn save<S: BlobStore>(
        &mut self,
        library: &mut LevelLibrary<S>,
    ) -> Result<String, StoreError> {
        let id = library.save_level(&self.level, self.level_id.as_deref())?;
        self.level_id = Some(id.clone());
        self.dirty = false;
        Ok(id)
    }
}
