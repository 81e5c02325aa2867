//! Events delivered from the backend worker to the UI thread.

use client_core::{ConnectionState, DecodedFrame, SessionEvent};
use shared::protocol::FrameStats;

#[derive(Debug)]
pub enum UiEvent {
    Connection(ConnectionState),
    FrameDecoded(DecodedFrame),
    Stats(FrameStats),
    BackendFailed(String),
}

impl UiEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::FrameDecoded(_) => "frame_decoded",
            Self::Stats(_) => "stats",
            Self::BackendFailed(_) => "backend_failed",
        }
    }

    /// Session input for this event, or the status message to show when
    /// the worker itself failed.
    pub fn into_session_event(self) -> Result<SessionEvent, String> {
        match self {
            Self::Connection(state) => Ok(SessionEvent::Connection(state)),
            Self::FrameDecoded(decoded) => Ok(SessionEvent::FrameDecoded(decoded)),
            Self::Stats(stats) => Ok(SessionEvent::Stats(stats)),
            Self::BackendFailed(message) => Err(message),
        }
    }
}
