//! UI-thread state for one viewer window.
//!
//! The session owns everything the screen shows and reacts to one
//! [`SessionEvent`] at a time, so no locking is needed on the UI side.

use shared::{
    domain::InteractionMode,
    protocol::{ClientCommand, FrameStats},
};
use tracing::{debug, info};

use crate::{
    connection::{CommandSink, ConnectionState},
    controls::{ControlChannel, ControlValues},
    frame::{DecodedFrame, FrameRenderer, PaintSurface},
    geometry::{CoordinateMapping, ScreenPoint},
    interaction::{Gesture, InteractionTranslator},
    stats::StatsMirror,
};

#[derive(Debug)]
pub enum SessionEvent {
    Connection(ConnectionState),
    FrameDecoded(DecodedFrame),
    Stats(FrameStats),
    SurfaceMoved,
    PointerDown(ScreenPoint),
    PointerUp(ScreenPoint),
    StartClicked,
    TextPromptEdited,
    ClearClicked,
    MaskThresholdMoved,
    ScoreThresholdMoved,
    ModeSelected(InteractionMode),
}

pub struct Session<S, K> {
    controls: ControlValues,
    stats: StatsMirror,
    connection: ConnectionState,
    renderer: FrameRenderer<S>,
    interaction: InteractionTranslator,
    sink: K,
}

impl<S: PaintSurface, K: CommandSink> Session<S, K> {
    pub fn new(surface: S, sink: K) -> Self {
        Self {
            controls: ControlValues::default(),
            stats: StatsMirror::default(),
            connection: ConnectionState::default(),
            renderer: FrameRenderer::new(surface),
            interaction: InteractionTranslator::new(),
            sink,
        }
    }

    pub fn controls(&self) -> &ControlValues {
        &self.controls
    }

    /// Widgets edit values in place and then report the change as an event.
    pub fn controls_mut(&mut self) -> &mut ControlValues {
        &mut self.controls
    }

    pub fn stats(&self) -> &StatsMirror {
        &self.stats
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn mapping(&self) -> Option<&CoordinateMapping> {
        self.renderer.mapping()
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.interaction.gesture()
    }

    pub fn renderer(&self) -> &FrameRenderer<S> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut FrameRenderer<S> {
        &mut self.renderer
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Connection(state) => {
                if self.connection != state {
                    info!(state = %state, "connection status");
                }
                self.connection = state;
            }
            SessionEvent::FrameDecoded(decoded) => {
                self.renderer.present(decoded);
            }
            SessionEvent::Stats(stats) => {
                self.stats = StatsMirror::from(&stats);
            }
            SessionEvent::SurfaceMoved => {
                self.renderer.relayout();
            }
            SessionEvent::PointerDown(position) => {
                self.interaction
                    .pointer_down(self.controls.mode, self.renderer.mapping(), position);
            }
            SessionEvent::PointerUp(position) => {
                let prompt = self.interaction.pointer_up(
                    self.controls.mode,
                    self.renderer.mapping(),
                    position,
                    self.controls.label,
                );
                if let Some(prompt) = prompt {
                    debug!(?prompt, "gesture classified");
                    self.sink.send(&ClientCommand::from(prompt));
                }
            }
            SessionEvent::StartClicked => {
                ControlChannel::new(&self.sink).start(&self.controls);
            }
            SessionEvent::TextPromptEdited => {
                ControlChannel::new(&self.sink).text_changed(&self.controls);
            }
            SessionEvent::ClearClicked => {
                ControlChannel::new(&self.sink).clear(&mut self.controls);
            }
            SessionEvent::MaskThresholdMoved => {
                ControlChannel::new(&self.sink).mask_threshold_changed(&mut self.controls);
            }
            SessionEvent::ScoreThresholdMoved => {
                ControlChannel::new(&self.sink).score_threshold_changed(&mut self.controls);
            }
            SessionEvent::ModeSelected(mode) => {
                self.controls.mode = mode;
                if mode != InteractionMode::Interactive {
                    self.interaction.cancel();
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
