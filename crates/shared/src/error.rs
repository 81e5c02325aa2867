use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed envelope: {0}")]
    Json(#[from] serde_json::Error),
    #[error("envelope is missing a string `type` field")]
    MissingType,
    #[error("unknown envelope type `{0}`")]
    UnknownType(String),
    #[error("invalid prompt label {0}; expected 0 or 1")]
    InvalidLabel(u8),
    #[error("unknown interaction mode `{0}`")]
    UnknownMode(String),
}

impl ProtocolError {
    /// Short machine-friendly tag for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Json(_) => "json",
            Self::MissingType => "missing_type",
            Self::UnknownType(_) => "unknown_type",
            Self::InvalidLabel(_) => "invalid_label",
            Self::UnknownMode(_) => "unknown_mode",
        }
    }
}
