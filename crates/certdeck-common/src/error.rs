use serde::{Deserialize, Serialize};

/// Machine-readable error codes for JSON output.
/// Shared by every crate that reports failures to the front end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidPayload,
    NotFound,
    AmbiguousId,
    ParseError,
    IoError,
    Internal,
}

impl ErrorCode {
    /// Process exit code for this error.
    /// Kept distinct per class so scripts can branch on it.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidPayload | Self::ParseError => 2,
            Self::NotFound => 3,
            Self::AmbiguousId => 4,
            Self::IoError => 5,
            Self::Internal => 1,
        }
    }

    /// Short uppercase tag used in human-readable error lines.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::InvalidPayload => "INPUT",
            Self::NotFound => "NOT_FOUND",
            Self::AmbiguousId => "AMBIGUOUS",
            Self::ParseError => "PARSE",
            Self::IoError => "IO",
            Self::Internal => "ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
