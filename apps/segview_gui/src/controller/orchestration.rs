//! Hand-off of backend events onto the bounded UI queue.

use client_core::{ConnectionHandle, PaintSurface, Session, SessionEvent};
use crossbeam_channel::{Sender, TrySendError};
use eframe::egui;

use crate::controller::events::UiEvent;

/// Queues `event` for the UI thread and wakes it. A full queue drops the
/// event; returns `false` only once the UI side has gone away.
///
/// Dropped connection transitions are recovered by [`sync_connection_state`].
pub fn forward_ui_event(ui_tx: &Sender<UiEvent>, repaint: &egui::Context, event: UiEvent) -> bool {
    let kind = event.kind();
    match ui_tx.try_send(event) {
        Ok(()) => {
            repaint.request_repaint();
            true
        }
        Err(TrySendError::Full(_)) => {
            tracing::debug!(event = kind, "ui event queue is full; dropping event");
            true
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}

/// Aligns the session's connection status with the handle's watch channel,
/// which always holds the latest state even when queued events were dropped.
pub fn sync_connection_state<S: PaintSurface>(session: &mut Session<S, ConnectionHandle>) {
    let current = session.sink().state();
    if session.connection() != current {
        session.handle(SessionEvent::Connection(current));
    }
}

#[cfg(test)]
mod tests {
    use client_core::{
        ClientSettings, CompositeFrame, ConnectionManager, ConnectionState, ScreenRect,
    };
    use crossbeam_channel::bounded;

    use super::*;

    struct BlankSurface;

    impl PaintSurface for BlankSurface {
        fn resize(&mut self, _width: u32, _height: u32) {}

        fn paint(&mut self, _frame: &CompositeFrame) {}

        fn screen_rect(&self) -> ScreenRect {
            ScreenRect::default()
        }
    }

    #[test]
    fn drops_events_when_queue_is_full() {
        let ctx = egui::Context::default();
        let (tx, rx) = bounded(1);

        assert!(forward_ui_event(&tx, &ctx, UiEvent::Connection(ConnectionState::Connecting)));
        assert!(forward_ui_event(&tx, &ctx, UiEvent::Connection(ConnectionState::Open)));

        assert!(matches!(
            rx.try_recv(),
            Ok(UiEvent::Connection(ConnectionState::Connecting))
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn reports_closed_ui() {
        let ctx = egui::Context::default();
        let (tx, rx) = bounded(4);
        drop(rx);

        assert!(!forward_ui_event(&tx, &ctx, UiEvent::Stats(Default::default())));
    }

    #[test]
    fn backend_failure_becomes_status_text() {
        let event = UiEvent::BackendFailed("runtime unavailable".into());
        assert_eq!(event.kind(), "backend_failed");
        assert_eq!(
            event.into_session_event().err().as_deref(),
            Some("runtime unavailable")
        );
    }

    #[test]
    fn status_follows_handle_when_transition_was_dropped() {
        let manager = ConnectionManager::new(&ClientSettings::default()).expect("manager");
        let mut session = Session::new(BlankSurface, manager.handle());

        // The queue carried `Open`, but the later `Closed` never made it.
        session.handle(SessionEvent::Connection(ConnectionState::Open));
        assert_eq!(session.connection(), ConnectionState::Open);

        sync_connection_state(&mut session);

        assert_eq!(session.connection(), ConnectionState::Closed);
    }
}
