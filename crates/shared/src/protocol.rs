use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{Prompt, PromptLabel},
    error::ProtocolError,
};

/// Commands sent from the client to the segmentation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientCommand {
    Start {
        source: String,
    },
    SetText {
        text: String,
    },
    ClearPrompts,
    SetThresholds {
        mask_threshold: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        score_threshold: Option<f64>,
    },
    AddPoint {
        x: i64,
        y: i64,
        label: PromptLabel,
    },
    AddBox {
        x1: i64,
        y1: i64,
        x2: i64,
        y2: i64,
        label: PromptLabel,
    },
}

impl ClientCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::SetText { .. } => "set_text",
            Self::ClearPrompts => "clear_prompts",
            Self::SetThresholds { .. } => "set_thresholds",
            Self::AddPoint { .. } => "add_point",
            Self::AddBox { .. } => "add_box",
        }
    }
}

impl From<Prompt> for ClientCommand {
    fn from(prompt: Prompt) -> Self {
        match prompt {
            Prompt::Point { x, y, label } => Self::AddPoint { x, y, label },
            Prompt::Box {
                x1,
                y1,
                x2,
                y2,
                label,
            } => Self::AddBox {
                x1,
                y1,
                x2,
                y2,
                label,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptSummary {
    #[serde(default)]
    pub text: Option<String>,
    pub points: u32,
    pub boxes: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameStats {
    pub rgb_fps: f64,
    pub seg_fps: f64,
    pub mode: String,
    pub prompt_summary: PromptSummary,
}

/// Messages pushed by the backend. Unlike commands these carry their fields
/// inline next to `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Frame { image: String, stats: FrameStats },
}

impl ServerEvent {
    pub const KNOWN_TYPES: &'static [&'static str] = &["frame"];
}

/// Parses one inbound text message, separating envelopes without a usable
/// `type` and envelopes of a type this client does not understand from
/// plain shape errors.
pub fn decode_server_event(text: &str) -> Result<ServerEvent, ProtocolError> {
    let envelope: Value = serde_json::from_str(text)?;
    let kind = envelope
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingType)?;
    if !ServerEvent::KNOWN_TYPES.contains(&kind) {
        return Err(ProtocolError::UnknownType(kind.to_string()));
    }
    Ok(serde_json::from_value(envelope)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn clear_prompts_has_no_payload() {
        let value = serde_json::to_value(ClientCommand::ClearPrompts).expect("serialize");
        assert_eq!(value, json!({ "type": "clear_prompts" }));
    }

    #[test]
    fn box_prompt_uses_integer_label() {
        let command = ClientCommand::from(Prompt::bounding(80, 80, 20, 40, PromptLabel::Foreground));
        let value = serde_json::to_value(command).expect("serialize");
        assert_eq!(
            value,
            json!({
                "type": "add_box",
                "payload": { "x1": 20, "y1": 40, "x2": 80, "y2": 80, "label": 1 }
            })
        );
    }

    #[test]
    fn thresholds_omit_untouched_score() {
        let value = serde_json::to_value(ClientCommand::SetThresholds {
            mask_threshold: 0.25,
            score_threshold: None,
        })
        .expect("serialize");
        assert_eq!(
            value,
            json!({ "type": "set_thresholds", "payload": { "mask_threshold": 0.25 } })
        );
    }

    #[test]
    fn decodes_frame_with_null_prompt_text() {
        let text = json!({
            "type": "frame",
            "image": "aGVsbG8=",
            "stats": {
                "rgb_fps": 29.7,
                "seg_fps": 11.0,
                "mode": "text",
                "prompt_summary": { "text": null, "points": 0, "boxes": 2 }
            }
        })
        .to_string();

        let ServerEvent::Frame { image, stats } = decode_server_event(&text).expect("decode");
        assert_eq!(image, "aGVsbG8=");
        assert_eq!(stats.mode, "text");
        assert_eq!(stats.prompt_summary.text, None);
        assert_eq!(stats.prompt_summary.boxes, 2);
    }

    #[test]
    fn rejects_envelope_without_type() {
        let err = decode_server_event(r#"{"image":"abc"}"#).expect_err("must fail");
        assert!(matches!(err, ProtocolError::MissingType));
    }

    #[test]
    fn rejects_unknown_envelope_type() {
        let err = decode_server_event(r#"{"type":"telemetry"}"#).expect_err("must fail");
        assert!(matches!(err, ProtocolError::UnknownType(kind) if kind == "telemetry"));
    }

    #[test]
    fn rejects_frame_missing_stats() {
        let err = decode_server_event(r#"{"type":"frame","image":"abc"}"#).expect_err("must fail");
        assert_eq!(err.kind(), "json");
    }

    #[test]
    fn rejects_out_of_range_label() {
        let err = serde_json::from_value::<ClientCommand>(json!({
            "type": "add_point",
            "payload": { "x": 1, "y": 2, "label": 2 }
        }))
        .expect_err("label 2 is invalid");
        assert!(err.to_string().contains("invalid prompt label"));
    }
}
