//! UI layer: app shell, control bar, and the composite texture surface.

pub mod app;
pub mod surface;

pub use app::SegViewApp;
