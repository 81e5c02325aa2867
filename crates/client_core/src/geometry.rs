//! Screen/semantic coordinate spaces and the mapping between them.
//!
//! The backend composes `[interactive RGB | overlay | mask]` side by side, so
//! the semantic panel is always the left third of the composite image at
//! full height.

/// Number of equally sized panels in a composite frame.
pub const COMPOSITE_PANEL_COUNT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned on-screen rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.left
            && point.y >= self.top
            && point.x <= self.left + self.width
            && point.y <= self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SemanticPoint {
    pub x: f64,
    pub y: f64,
}

impl SemanticPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: SemanticPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Nearest integer pixel, halves rounding away from zero.
    pub fn rounded(&self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }
}

/// Bridge between on-screen pointer positions and semantic pixels.
///
/// `display_rect` is the on-screen interaction surface: the left third of
/// the painted composite, anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapping {
    pub semantic_width: f64,
    pub semantic_height: f64,
    pub display_rect: ScreenRect,
}

impl CoordinateMapping {
    pub fn for_composite(image_width: u32, image_height: u32, surface_on_screen: ScreenRect) -> Self {
        let panels = COMPOSITE_PANEL_COUNT as f32;
        Self {
            semantic_width: f64::from(image_width) / f64::from(COMPOSITE_PANEL_COUNT),
            semantic_height: f64::from(image_height),
            display_rect: ScreenRect {
                left: surface_on_screen.left,
                top: surface_on_screen.top,
                width: surface_on_screen.width / panels,
                height: surface_on_screen.height,
            },
        }
    }

    /// Returns `None` while the interaction surface has no on-screen area.
    pub fn to_semantic(&self, point: ScreenPoint) -> Option<SemanticPoint> {
        let rect = self.display_rect;
        if rect.is_empty() {
            return None;
        }
        let x = f64::from(point.x - rect.left) / f64::from(rect.width) * self.semantic_width;
        let y = f64::from(point.y - rect.top) / f64::from(rect.height) * self.semantic_height;
        Some(SemanticPoint::new(x, y))
    }

    pub fn to_screen(&self, point: SemanticPoint) -> Option<ScreenPoint> {
        if self.semantic_width <= 0.0 || self.semantic_height <= 0.0 {
            return None;
        }
        let rect = self.display_rect;
        let x = rect.left + (point.x / self.semantic_width * f64::from(rect.width)) as f32;
        let y = rect.top + (point.y / self.semantic_height * f64::from(rect.height)) as f32;
        Some(ScreenPoint::new(x, y))
    }

    pub fn clamp(&self, point: SemanticPoint) -> SemanticPoint {
        SemanticPoint::new(
            point.x.clamp(0.0, self.semantic_width.max(0.0)),
            point.y.clamp(0.0, self.semantic_height.max(0.0)),
        )
    }
}

#[cfg(test)]
#[path = "tests/geometry_tests.rs"]
mod tests;
