//! Error type for the clusterboss library.
//!
//! Library code returns [`ClusterError`]; the command-line wrapper wraps it
//! in `anyhow` with extra context.

use std::path::PathBuf;

/// Every failure the library can report.
#[derive(thiserror::Error, Debug)]
pub enum ClusterError {
    /// A run parameter is outside its allowed domain.
    #[error("invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    /// A record with an empty sequence was offered to the catalog.
    #[error("empty sequence at record {position}")]
    EmptySequence { position: usize },

    /// A sequence holds a non-ASCII symbol. Lengths and edit distances are
    /// counted per byte, so only single-byte symbols are accepted.
    #[error("sequence '{sequence}' at record {position} contains non-ASCII symbols")]
    NonAsciiSequence { position: usize, sequence: String },

    /// The same sequence was offered to the catalog twice.
    #[error("duplicate sequence '{sequence}'")]
    DuplicateSequence { sequence: String },

    /// A count-file line could not be interpreted.
    #[error("parse error on line {line}: {detail}")]
    Parse { line: usize, detail: String },

    /// The count file ended before its header was complete.
    #[error("count file has only {lines} line(s), expected a 3-line header")]
    MissingHeader { lines: usize },

    /// I/O failure with path context.
    #[error("I/O error during {operation} on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for library results.
pub type Result<T> = std::result::Result<T, ClusterError>;

impl ClusterError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, operation: &'static str, source: std::io::Error) -> Self {
        ClusterError::Io {
            path: path.into(),
            operation,
            source,
        }
    }

    pub fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: &'static str,
    ) -> Self {
        ClusterError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    pub fn parse(line: usize, detail: impl Into<String>) -> Self {
        ClusterError::Parse {
            line,
            detail: detail.into(),
        }
    }
}
