use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Foreground/background tag attached to every spatial prompt.
///
/// Serialized as the bare integers `0` and `1` the backend expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PromptLabel {
    Background,
    #[default]
    Foreground,
}

impl PromptLabel {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Background => 0,
            Self::Foreground => 1,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Background => "Background (0)",
            Self::Foreground => "Foreground (1)",
        }
    }
}

impl From<PromptLabel> for u8 {
    fn from(value: PromptLabel) -> Self {
        value.as_u8()
    }
}

impl TryFrom<u8> for PromptLabel {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Background),
            1 => Ok(Self::Foreground),
            other => Err(ProtocolError::InvalidLabel(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    #[default]
    Text,
    Interactive,
}

impl InteractionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Interactive => "interactive",
        }
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionMode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "text" => Ok(Self::Text),
            "interactive" => Ok(Self::Interactive),
            other => Err(ProtocolError::UnknownMode(other.to_string())),
        }
    }
}

/// A spatial prompt in semantic (RGB panel) pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Point {
        x: i64,
        y: i64,
        label: PromptLabel,
    },
    Box {
        x1: i64,
        y1: i64,
        x2: i64,
        y2: i64,
        label: PromptLabel,
    },
}

impl Prompt {
    /// Builds a box from two arbitrary corners, ordering each axis so that
    /// `x1 <= x2` and `y1 <= y2`.
    pub fn bounding(ax: i64, ay: i64, bx: i64, by: i64, label: PromptLabel) -> Self {
        Self::Box {
            x1: ax.min(bx),
            y1: ay.min(by),
            x2: ax.max(bx),
            y2: ay.max(by),
            label,
        }
    }

    pub fn label(&self) -> PromptLabel {
        match self {
            Self::Point { label, .. } | Self::Box { label, .. } => *label,
        }
    }
}
