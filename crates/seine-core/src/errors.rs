//! Structured error types shared across seine crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::Value;

/// Diagnostic payload attached to every [`SeineError`] variant.
///
/// Besides a stable code and a message, the payload names the pieces of an
/// inference run that errors here actually involve: the strategy occupying
/// the coroutine slot, the distribution whose operation failed, and the
/// offending [`Value`] itself (kept as a value, not a rendering, so callers
/// can match on it or take its canonical key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Strategy that was driving the run when it aborted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    /// Distribution whose operation surfaced the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,
    /// The value that violated the operation's contract.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offender: Option<Value>,
    /// Remaining diagnostic details (indices, bounds, counts).
    #[serde(default)]
    pub details: BTreeMap<String, String>,
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
            strategy: None,
            distribution: None,
            offender: None,
            details: BTreeMap::new(),
            hint: None,
        }
    }

    /// Names the strategy that was installed when the error surfaced.
    pub fn in_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    /// Names the distribution involved in the failed operation.
    pub fn in_distribution(mut self, distribution: impl Into<String>) -> Self {
        self.distribution = Some(distribution.into());
        self
    }

    /// Records the value that violated the contract.
    pub fn with_offender(mut self, offender: Value) -> Self {
        self.offender = Some(offender);
        self
    }

    /// Adds one diagnostic detail, rendered through `Display`.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.details.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the seine engine.
///
/// Every inference failure aborts the run: no partial marginal is produced
/// and the coroutine slot is restored to its predecessor before the error
/// reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", content = "detail")]
pub enum SeineError {
    /// A factor statement reached the default or forward strategy.
    #[error("factor outside inference: {0}")]
    FactorOutsideInference(ErrorInfo),
    /// Enumeration sampled from a distribution without a finite support.
    #[error("enumeration unsupported: {0}")]
    EnumerationUnsupported(ErrorInfo),
    /// Every execution path scored minus infinity.
    #[error("empty posterior: {0}")]
    EmptyPosterior(ErrorInfo),
    /// A distribution or strategy was constructed with invalid parameters.
    #[error("degenerate parameters: {0}")]
    DegenerateParameters(ErrorInfo),
    /// An engine invariant was violated at runtime.
    #[error("engine error: {0}")]
    Engine(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.code)?;
        if let Some(strategy) = &self.strategy {
            write!(f, "; strategy {strategy}")?;
        }
        if let Some(distribution) = &self.distribution {
            write!(f, "; distribution {distribution}")?;
        }
        if let Some(offender) = &self.offender {
            write!(f, "; offending value {offender}")?;
        }
        for (key, value) in &self.details {
            write!(f, "; {key} {value}")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}

impl SeineError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            SeineError::FactorOutsideInference(info)
            | SeineError::EnumerationUnsupported(info)
            | SeineError::EmptyPosterior(info)
            | SeineError::DegenerateParameters(info)
            | SeineError::Engine(info) => info,
        }
    }
}
