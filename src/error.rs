use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProsodyError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("input file not found: {}", path.display())]
    MissingInputFile { path: PathBuf },
    #[error("annotation has no interval tier named \"words\" with a declared interval count")]
    NoWordsTier,
    #[error("annotation \"words\" tier contains no non-silence intervals")]
    NoWords,
    #[error("line {line}: invalid number '{value}'")]
    InvalidNumber { line: usize, value: String },
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("word interval {index} starts before the previous interval ends")]
    OverlappingInterval { index: usize },
    #[error("engine call for feature set '{feature_set}' failed: {message}")]
    EngineCallFailure {
        feature_set: String,
        message: String,
    },
    #[error("{category}: engine returned {actual} rows for {expected} words")]
    AlignmentMismatch {
        category: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl ProsodyError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn engine_call(feature_set: &str, err: impl std::fmt::Display) -> Self {
        Self::EngineCallFailure {
            feature_set: feature_set.to_string(),
            message: err.to_string(),
        }
    }
}
