//! Frame timing

use crate::consts::MAX_FRAME_DT;

/// Converts animation-frame timestamps into simulation deltas.
///
/// Deltas are capped so a backgrounded tab does not produce one huge step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DT)
    }
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt,
        }
    }

    /// Seconds since the previous frame, capped. The first frame yields 0.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0).max(0.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt.min(self.max_dt)
    }

    /// Forget the previous frame (after pausing or switching levels)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
