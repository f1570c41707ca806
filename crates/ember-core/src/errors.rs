//! Structured error types shared across Ember crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`EmberError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (identifiers, extents, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the Ember move engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum EmberError {
    /// A requested move identifier is not in the supported set.
    #[error("unsupported move kind: {0}")]
    UnsupportedMoveKind(ErrorInfo),
    /// A move kind was requested against a lattice it cannot operate on.
    #[error("lattice mismatch: {0}")]
    LatticeMismatch(ErrorInfo),
    /// The propose/accept lifecycle was not respected.
    #[error("protocol violation: {0}")]
    ProtocolViolation(ErrorInfo),
    /// Box extents or energy ledger dimensions are inconsistent.
    #[error("invalid hamiltonian shape: {0}")]
    InvalidHamiltonianShape(ErrorInfo),
    /// Configuration validation and parse errors.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Filesystem errors encountered while loading or writing artefacts.
    #[error("io error: {0}")]
    Io(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl EmberError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            EmberError::UnsupportedMoveKind(info)
            | EmberError::LatticeMismatch(info)
            | EmberError::ProtocolViolation(info)
            | EmberError::InvalidHamiltonianShape(info)
            | EmberError::Config(info)
            | EmberError::Io(info) => info,
        }
    }
}
