//! Error types for dataset construction and online windowing.
//!
//! Construction-time problems (unparsable ordinals, unknown phases, bad
//! configuration) fail the whole build loudly; per-window rejections by the
//! chronology validator are normal filtering and never surface here.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors produced by dataset construction and the online windowing adapter.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No run of digits could be extracted from a frame identifier.
    ///
    /// The ordinal is the sole sort key within a video, so an identifier
    /// that yields none is a malformed input, not something to coerce.
    #[error("cannot extract ordinal from identifier '{identifier}'")]
    UnparsableOrdinal {
        /// The identifier that failed to parse.
        identifier: String,
    },

    /// A phase value is not part of the canonical chronology.
    #[error("phase '{phase}' is not in the canonical phase chronology")]
    UnknownPhase {
        /// The offending phase label.
        phase: String,
    },

    /// The input records contain no canonical phase at all.
    #[error("no canonical phases present in the input records")]
    EmptyVocabulary,

    /// The online adapter was given fewer frames than one window needs.
    #[error("inference requires at least {required} frames, got {supplied}")]
    InsufficientFrames {
        /// Window size the model expects.
        required: usize,
        /// Number of frames actually supplied.
        supplied: usize,
    },

    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Config file I/O failed.
    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Config could not be serialized to TOML.
    #[error("config TOML serialization failed: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Config could not be parsed from TOML.
    #[error("config TOML parsing failed: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Config JSON conversion failed.
    #[error("config JSON conversion failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_offender() {
        let err = CoreError::UnparsableOrdinal {
            identifier: "WELL_D5_RUNabc".to_string(),
        };
        assert!(err.to_string().contains("WELL_D5_RUNabc"));

        let err = CoreError::InsufficientFrames {
            required: 8,
            supplied: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains('8'));
        assert!(msg.contains('5'));
    }
}
