//! Controller layer: backend events and their hand-off to the UI thread.

pub mod events;
pub mod orchestration;
