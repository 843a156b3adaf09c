// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

/// Errors raised while parsing, expanding, rendering or persisting settings.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A settings string cannot be parsed.
    #[error("malformed settings {input:?}: {reason}")]
    MalformedSettings { input: String, reason: String },
    /// No axis string was given to the combination expander.
    #[error("at least one set of sample settings is required")]
    EmptyAxis,
    /// A key contains characters that would need escaping.
    #[error("key {key:?} contains the delimiter or '=' and cannot be escaped")]
    EscapeConflict { key: String },
    /// A line of the estimates table cannot be parsed.
    #[error("corrupt estimates line {line:?}: {reason}")]
    CorruptEstimates { line: String, reason: String },
    /// A measure cannot be turned into an estimate.
    #[error("invalid measure: {reason}")]
    InvalidMeasure { reason: String },
    /// No consecutive B-frames statistics were found in an encoder log.
    #[error("unable to find consecutive B-frames in {path:?}")]
    MissingBframes { path: std::path::PathBuf },
    /// The estimates table cannot be read or written.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn malformed(input: &str, reason: &str) -> Self {
        Self::MalformedSettings {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_measure(reason: &str) -> Self {
        Self::InvalidMeasure {
            reason: reason.to_string(),
        }
    }

    pub(crate) fn corrupt(line: &str, reason: &str) -> Self {
        Self::CorruptEstimates {
            line: line.to_string(),
            reason: reason.to_string(),
        }
    }
}
