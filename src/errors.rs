//! Error and warning types for estimation operations.
//!
//! Two fatal categories exist:
//!
//! - `Configuration`: a table entry is missing or invalid (rate not found,
//!   catalog tier missing, weights that do not sum to one). Always carries the
//!   offending key so the caller can fix the workbook.
//! - `Validation`: caller-supplied inputs violate an invariant (mixes not
//!   summing to one, factors out of range). Carries the field and the
//!   invariant that was broken.
//!
//! Non-fatal findings are [`EstimationWarning`]s. They are accumulated across
//! the whole pipeline and returned on a successful result.
//!
//! # Example
//!
//! ```rust
//! use n2s_estimator::errors::EstimationError;
//!
//! let err = EstimationError::configuration("rates[QA Engineer/UK]", "no rate card row");
//! assert!(err.is_configuration());
//! assert_eq!(err.key(), "rates[QA Engineer/UK]");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Fatal error raised by the estimation pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimationError {
    /// Missing or invalid configuration table entry
    #[error("Configuration error at {key}: {message}")]
    Configuration { key: String, message: String },

    /// Caller input violates an invariant
    #[error("Validation error on {field}: {invariant}")]
    Validation { field: String, invariant: String },
}

impl EstimationError {
    /// Create a configuration error naming the offending table key
    pub fn configuration(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a validation error naming the field and the required invariant
    pub fn validation(field: impl Into<String>, invariant: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            invariant: invariant.into(),
        }
    }

    /// The table key or input field the error refers to.
    pub fn key(&self) -> &str {
        match self {
            Self::Configuration { key, .. } => key,
            Self::Validation { field, .. } => field,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Result type alias using the estimation error
pub type Result<T> = std::result::Result<T, EstimationError>;

/// Category of a non-fatal finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A configured value deviates from the documented baseline
    MethodologyDrift,
    /// A compiled-in default was used because the table had no entry
    DefaultApplied,
    /// An input is legal but unusually large
    InputAdvisory,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::MethodologyDrift => "drift",
            Self::DefaultApplied => "default",
            Self::InputAdvisory => "input",
        };
        write!(f, "{}", label)
    }
}

/// Non-fatal finding attached to a successful estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationWarning {
    pub kind: WarningKind,
    /// Table key or input field the warning is about
    pub subject: String,
    pub message: String,
}

impl EstimationWarning {
    pub fn drift(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::MethodologyDrift,
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn default_applied(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::DefaultApplied,
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn advisory(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::InputAdvisory,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for EstimationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.subject, self.message)
    }
}
