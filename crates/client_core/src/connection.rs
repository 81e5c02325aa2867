//! Control channel lifecycle: connect, dispatch, reconnect, send.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use shared::protocol::{decode_server_event, ClientCommand, FrameStats, ServerEvent};
use tokio::{
    sync::{broadcast, mpsc, watch},
    task::JoinHandle,
};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ClientSettings;

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    Connecting,
    Open,
    #[default]
    Closed,
}

impl ConnectionState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    /// Transition table for the channel lifecycle. Losing a live or pending
    /// connection schedules exactly one reconnect; every other unexpected
    /// signal leaves the state untouched.
    pub fn on_signal(self, signal: ChannelSignal) -> (ConnectionState, ChannelEffect) {
        match (self, signal) {
            (Self::Closed, ChannelSignal::Dial) => (Self::Connecting, ChannelEffect::None),
            (Self::Connecting, ChannelSignal::Opened) => (Self::Open, ChannelEffect::None),
            (Self::Connecting | Self::Open, ChannelSignal::Lost) => {
                (Self::Closed, ChannelEffect::ScheduleReconnect)
            }
            (state, _) => (state, ChannelEffect::None),
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSignal {
    Dial,
    Opened,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelEffect {
    None,
    ScheduleReconnect,
}

#[derive(Debug, Clone)]
pub enum ClientEvent {
    ConnectionStateChanged(ConnectionState),
    FrameReceived { image_b64: String },
    StatsUpdated(FrameStats),
}

/// Anything that can carry outbound commands to the backend.
pub trait CommandSink {
    /// Hands `command` to the transport. Returns `false` when it was dropped
    /// because the channel is not open.
    fn send(&self, command: &ClientCommand) -> bool;
}

struct ConnectionShared {
    state: watch::Sender<ConnectionState>,
    outbound: Mutex<Option<mpsc::UnboundedSender<String>>>,
    events: broadcast::Sender<ClientEvent>,
}

impl ConnectionShared {
    fn outbound(&self) -> MutexGuard<'_, Option<mpsc::UnboundedSender<String>>> {
        self.outbound
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Cheap, cloneable view of the connection used by UI code to send commands
/// and observe the lifecycle.
#[derive(Clone)]
pub struct ConnectionHandle {
    shared: Arc<ConnectionShared>,
}

impl ConnectionHandle {
    pub fn state(&self) -> ConnectionState {
        *self.shared.state.borrow()
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.shared.state.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.shared.events.subscribe()
    }
}

impl CommandSink for ConnectionHandle {
    fn send(&self, command: &ClientCommand) -> bool {
        let kind = command.kind();
        let text = match serde_json::to_string(command) {
            Ok(text) => text,
            Err(err) => {
                warn!(command = kind, "failed to serialize command: {err}");
                return false;
            }
        };

        let outbound = self.shared.outbound();
        let Some(tx) = outbound.as_ref() else {
            debug!(command = kind, "channel not open; dropping command");
            return false;
        };
        if tx.send(text).is_err() {
            debug!(command = kind, "channel closing; dropping command");
            return false;
        }
        debug!(command = kind, "queued command on open channel");
        true
    }
}

/// Owns the control channel. [`ConnectionManager::run`] keeps one connection
/// alive for as long as it is polled, retrying after a fixed delay forever.
pub struct ConnectionManager {
    endpoint: Url,
    reconnect_delay: Duration,
    shared: Arc<ConnectionShared>,
}

impl ConnectionManager {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let endpoint = settings
            .control_endpoint()
            .context("failed to derive control channel endpoint")?;
        Ok(Self::with_endpoint(endpoint, settings.reconnect_delay()))
    }

    pub fn with_endpoint(endpoint: Url, reconnect_delay: Duration) -> Self {
        let (state, _) = watch::channel(ConnectionState::Closed);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            endpoint,
            reconnect_delay,
            shared: Arc::new(ConnectionShared {
                state,
                outbound: Mutex::new(None),
                events,
            }),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn handle(&self) -> ConnectionHandle {
        ConnectionHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.shared.events.subscribe()
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(self) {
        loop {
            self.signal(ChannelSignal::Dial);
            if let Err(err) = self.connect_once().await {
                warn!(endpoint = %self.endpoint, "control channel failed: {err:#}");
            }
            *self.shared.outbound() = None;

            if self.signal(ChannelSignal::Lost) == ChannelEffect::ScheduleReconnect {
                warn!(
                    endpoint = %self.endpoint,
                    delay_ms = self.reconnect_delay.as_millis() as u64,
                    "control channel closed; scheduling reconnect"
                );
                tokio::time::sleep(self.reconnect_delay).await;
            }
        }
    }

    fn signal(&self, signal: ChannelSignal) -> ChannelEffect {
        let current = *self.shared.state.borrow();
        let (next, effect) = current.on_signal(signal);
        if next != current {
            info!(from = %current, to = %next, "control channel state changed");
            self.shared.state.send_replace(next);
            let _ = self
                .shared
                .events
                .send(ClientEvent::ConnectionStateChanged(next));
        }
        effect
    }

    async fn connect_once(&self) -> Result<()> {
        let (ws_stream, _) = connect_async(self.endpoint.as_str())
            .await
            .with_context(|| format!("failed to connect websocket: {}", self.endpoint))?;
        let (mut ws_writer, mut ws_reader) = ws_stream.split();

        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();
        *self.shared.outbound() = Some(outbound_tx);
        self.signal(ChannelSignal::Opened);

        loop {
            tokio::select! {
                outbound = outbound_rx.recv() => {
                    let Some(text) = outbound else { break };
                    ws_writer
                        .send(Message::Text(text))
                        .await
                        .context("websocket send failed")?;
                }
                inbound = ws_reader.next() => match inbound {
                    Some(Ok(Message::Text(text))) => self.dispatch(&text),
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        return Err(err).context("websocket receive failed");
                    }
                },
            }
        }
        Ok(())
    }

    fn dispatch(&self, text: &str) {
        match decode_server_event(text) {
            Ok(ServerEvent::Frame { image, stats }) => {
                let _ = self
                    .shared
                    .events
                    .send(ClientEvent::FrameReceived { image_b64: image });
                let _ = self.shared.events.send(ClientEvent::StatsUpdated(stats));
            }
            Err(err) => {
                warn!(kind = err.kind(), "ignoring inbound message: {err}");
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/connection_tests.rs"]
mod tests;
