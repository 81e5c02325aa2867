//! Pointer gestures on the interaction surface, classified into prompts.

use shared::domain::{InteractionMode, Prompt, PromptLabel};
use tracing::debug;

use crate::geometry::{CoordinateMapping, ScreenPoint, SemanticPoint};

/// Gestures shorter than this, measured in semantic pixels, are clicks.
pub const POINT_CLICK_RADIUS: f64 = 10.0;

/// A press that has not been released yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gesture {
    pub start: SemanticPoint,
}

/// Owns the in-progress gesture; reads the mapping and control values it is
/// handed, never stores them.
#[derive(Debug, Default)]
pub struct InteractionTranslator {
    gesture: Option<Gesture>,
}

impl InteractionTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn pointer_down(
        &mut self,
        mode: InteractionMode,
        mapping: Option<&CoordinateMapping>,
        position: ScreenPoint,
    ) {
        if mode != InteractionMode::Interactive {
            return;
        }
        let Some(start) = mapping.and_then(|mapping| mapping.to_semantic(position)) else {
            debug!("pointer down before any frame was mapped; ignoring");
            return;
        };
        self.gesture = Some(Gesture { start });
    }

    /// Completes the active gesture. Any gesture left over from interactive
    /// mode is discarded once the mode has changed.
    pub fn pointer_up(
        &mut self,
        mode: InteractionMode,
        mapping: Option<&CoordinateMapping>,
        position: ScreenPoint,
        label: PromptLabel,
    ) -> Option<Prompt> {
        let gesture = self.gesture.take()?;
        if mode != InteractionMode::Interactive {
            return None;
        }
        let mapping = mapping?;
        let end = mapping.clamp(mapping.to_semantic(position)?);
        Some(classify(gesture.start, end, label))
    }

    pub fn cancel(&mut self) {
        self.gesture = None;
    }
}

/// Point at `start` for short gestures, otherwise the box spanned by both ends.
pub fn classify(start: SemanticPoint, end: SemanticPoint, label: PromptLabel) -> Prompt {
    if start.distance_to(end) < POINT_CLICK_RADIUS {
        let (x, y) = start.rounded();
        return Prompt::Point { x, y, label };
    }
    let (sx, sy) = start.rounded();
    let (ex, ey) = end.rounded();
    Prompt::bounding(sx, sy, ex, ey, label)
}

#[cfg(test)]
#[path = "tests/interaction_tests.rs"]
mod tests;
