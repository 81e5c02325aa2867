//! Translation of simple UI control changes into outbound commands.

use shared::{
    domain::{InteractionMode, PromptLabel},
    protocol::ClientCommand,
};

use crate::connection::CommandSink;

pub const DEFAULT_SOURCE: &str = "webcam";
pub const DEFAULT_THRESHOLD: f64 = 0.5;
/// Resolution of the threshold sliders.
pub const THRESHOLD_STEP: f64 = 0.05;

/// Current values of the user-facing controls.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlValues {
    pub source: String,
    pub mode: InteractionMode,
    pub label: PromptLabel,
    pub text_prompt: String,
    pub mask_threshold: f64,
    pub mask_threshold_readout: String,
    /// `None` until the user moves the score slider.
    pub score_threshold: Option<f64>,
}

impl Default for ControlValues {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            mode: InteractionMode::default(),
            label: PromptLabel::default(),
            text_prompt: String::new(),
            mask_threshold: DEFAULT_THRESHOLD,
            mask_threshold_readout: format_threshold(DEFAULT_THRESHOLD),
            score_threshold: None,
        }
    }
}

/// Nearest slider step, computed as `steps / steps_per_unit` so the result is
/// the closest `f64` to the decimal the user sees.
pub fn snap_threshold(value: f64) -> f64 {
    let steps_per_unit = (1.0 / THRESHOLD_STEP).round();
    (value * steps_per_unit).round() / steps_per_unit
}

pub fn format_threshold(value: f64) -> String {
    format!("{}", snap_threshold(value))
}

/// Stateless request translators. Each returns whether the command reached an
/// open channel; local side effects happen either way.
pub struct ControlChannel<'a, K: ?Sized> {
    sink: &'a K,
}

impl<'a, K: CommandSink + ?Sized> ControlChannel<'a, K> {
    pub fn new(sink: &'a K) -> Self {
        Self { sink }
    }

    pub fn start(&self, controls: &ControlValues) -> bool {
        self.sink.send(&ClientCommand::Start {
            source: controls.source.clone(),
        })
    }

    pub fn text_changed(&self, controls: &ControlValues) -> bool {
        self.sink.send(&ClientCommand::SetText {
            text: controls.text_prompt.clone(),
        })
    }

    pub fn clear(&self, controls: &mut ControlValues) -> bool {
        let sent = self.sink.send(&ClientCommand::ClearPrompts);
        controls.text_prompt.clear();
        sent
    }

    pub fn mask_threshold_changed(&self, controls: &mut ControlValues) -> bool {
        controls.mask_threshold = snap_threshold(controls.mask_threshold);
        controls.mask_threshold_readout = format_threshold(controls.mask_threshold);
        self.send_thresholds(controls)
    }

    pub fn score_threshold_changed(&self, controls: &mut ControlValues) -> bool {
        controls.score_threshold = controls.score_threshold.map(snap_threshold);
        self.send_thresholds(controls)
    }

    fn send_thresholds(&self, controls: &ControlValues) -> bool {
        self.sink.send(&ClientCommand::SetThresholds {
            mask_threshold: controls.mask_threshold,
            score_threshold: controls.score_threshold,
        })
    }
}

#[cfg(test)]
#[path = "tests/controls_tests.rs"]
mod tests;
