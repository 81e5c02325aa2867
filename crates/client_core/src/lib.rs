pub mod config;
pub mod connection;
pub mod controls;
pub mod frame;
pub mod geometry;
pub mod interaction;
pub mod session;
pub mod stats;

pub use config::{load_settings, ClientSettings};
pub use connection::{ClientEvent, CommandSink, ConnectionHandle, ConnectionManager, ConnectionState};
pub use frame::{CompositeFrame, DecodedFrame, FrameDecoder, FrameRenderer, PaintSurface};
pub use geometry::{CoordinateMapping, ScreenPoint, ScreenRect};
pub use session::{Session, SessionEvent};

#[cfg(test)]
#[path = "tests/test_support.rs"]
pub(crate) mod test_support;
