//! Editor view transform
//!
//! Maps pointer positions (client pixels) to logical level coordinates
//! under the current zoom and pan offset:
//!
//! `logical = (client - canvas_origin - offset) / zoom`

use glam::Vec2;

use crate::consts::{FIT_MARGIN, LEVEL_HEIGHT, LEVEL_WIDTH};
use crate::settings::EditorSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
struct PanDrag {
    start: Vec2,
    initial_offset: Vec2,
}

/// Zoom and pan state of the editor canvas
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTransform {
    zoom: f32,
    /// Pan offset in screen pixels
    pub offset: Vec2,
    /// Client position of the canvas' top-left corner
    pub canvas_origin: Vec2,
    min_zoom: f32,
    max_zoom: f32,
    zoom_step: f32,
    pan: Option<PanDrag>,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(&EditorSettings::default())
    }
}

impl ViewTransform {
    pub fn new(settings: &EditorSettings) -> Self {
        Self {
            zoom: 1.0_f32.min(settings.max_zoom).max(settings.min_zoom),
            offset: Vec2::ZERO,
            canvas_origin: Vec2::ZERO,
            min_zoom: settings.min_zoom,
            max_zoom: settings.max_zoom,
            zoom_step: settings.zoom_step,
            pan: None,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom, clamped to the configured range
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.min(self.max_zoom).max(self.min_zoom);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * self.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / self.zoom_step);
    }

    pub fn screen_to_logical(&self, client: Vec2) -> Vec2 {
        (client - self.canvas_origin - self.offset) / self.zoom
    }

    pub fn logical_to_screen(&self, logical: Vec2) -> Vec2 {
        logical * self.zoom + self.offset + self.canvas_origin
    }

    /// Fit the whole level inside a `width` x `height` canvas and center it
    pub fn fit_to_viewport(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let scale = (width / LEVEL_WIDTH).min(height / LEVEL_HEIGHT) * FIT_MARGIN;
        self.set_zoom(scale);
        self.offset = Vec2::new(
            (width - LEVEL_WIDTH * self.zoom) / 2.0,
            (height - LEVEL_HEIGHT * self.zoom) / 2.0,
        );
    }

    pub fn begin_pan(&mut self, pointer: Vec2) {
        self.pan = Some(PanDrag {
            start: pointer,
            initial_offset: self.offset,
        });
    }

    pub fn update_pan(&mut self, pointer: Vec2) {
        if let Some(drag) = self.pan {
            self.offset = drag.initial_offset + (pointer - drag.start);
        }
    }

    pub fn end_pan(&mut self) {
        self.pan = None;
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }
}
