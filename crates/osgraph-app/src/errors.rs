//! Categorized controller errors
//!
//! Provides structured error types that enable:
//! - Categorized error handling (network vs input vs service rejection)
//! - Appropriate toast severity routing for host notifications
//! - A hard failure for input-contract violations at the resolver boundary

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Notifications
// ============================================================================

/// Severity of a transient notification surfaced to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToastLevel {
    /// Informational message
    Info,
    /// Something degraded but the user can continue
    Warning,
    /// The requested operation failed
    Error,
}

/// A transient notification the host should display (e.g. a toast).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity
    pub level: ToastLevel,
    /// Text to display, verbatim from the service when one was supplied
    pub message: String,
}

impl Notice {
    /// Notice for a failure of `category`, at that category's toast severity.
    pub fn for_category(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            level: category.toast_severity(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Categories
// ============================================================================

/// High-level error categories for host error handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Caller passed malformed input (programmer error)
    Input,
    /// Resource not found on the analytics service
    NotFound,
    /// Network connectivity errors (often transient)
    Network,
    /// The service answered but refused the operation
    Operation,
}

impl ErrorCategory {
    /// Check if this error category is likely transient.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network | Self::NotFound)
    }

    /// Get the appropriate toast severity for this category.
    #[must_use]
    pub fn toast_severity(&self) -> ToastLevel {
        match self {
            Self::Input => ToastLevel::Error,
            Self::NotFound => ToastLevel::Warning,
            Self::Network => ToastLevel::Warning,
            Self::Operation => ToastLevel::Error,
        }
    }

    /// Get a short label for this category.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::NotFound => "Not Found",
            Self::Network => "Network",
            Self::Operation => "Operation",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Input-contract violations at the parameter resolver boundary.
///
/// These are programmer errors: they fail fast and are never turned into
/// user-facing notifications.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A parameter list was expected but something else was supplied.
    #[error("type error: expected a parameter list, found {found}")]
    NotASequence {
        /// JSON kind that was supplied instead
        found: &'static str,
    },

    /// An entry of the parameter list could not be read.
    #[error("type error: parameter #{index} is malformed: {reason}")]
    MalformedParameter {
        /// Position in the list
        index: usize,
        /// Decoder message
        reason: String,
    },
}

/// Failures raised by collaborator services (catalog, search, execution).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The request never produced a response.
    #[error("transport error: {reason}")]
    Transport {
        /// Underlying transport message
        reason: String,
        /// Whether the failure was a timeout
        timed_out: bool,
    },

    /// The service replied with a non-success HTTP status.
    #[error("service returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode {what}: {reason}")]
    Decode {
        /// What was being decoded
        what: &'static str,
        /// Decoder message
        reason: String,
    },

    /// The service answered with `success = false`.
    #[error("service rejected request: {message}")]
    Rejected {
        /// Service-supplied message
        message: String,
    },
}

impl BridgeError {
    /// Create a transport error.
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
            timed_out: false,
        }
    }

    /// Create a decode error.
    pub fn decode(what: &'static str, reason: impl fmt::Display) -> Self {
        Self::Decode {
            what,
            reason: reason.to_string(),
        }
    }

    /// Classify this error for host treatment.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport { .. } => ErrorCategory::Network,
            Self::Status { status: 404, .. } => ErrorCategory::NotFound,
            Self::Status { status, .. } if *status >= 500 => ErrorCategory::Network,
            Self::Status { .. } => ErrorCategory::Operation,
            Self::Decode { .. } => ErrorCategory::Operation,
            Self::Rejected { .. } => ErrorCategory::Operation,
        }
    }

    /// Get a short error code string.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport { timed_out: true, .. } => "NET_TIMEOUT",
            Self::Transport { .. } => "NET_ERROR",
            Self::Status { .. } => "HTTP_STATUS",
            Self::Decode { .. } => "DECODE",
            Self::Rejected { .. } => "REJECTED",
        }
    }
}

/// Top-level error returned by controller operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// A collaborator call failed.
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// Parameter input violated its contract.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The family is not present in the loaded catalog.
    #[error("unknown query family '{family_id}'")]
    UnknownFamily {
        /// Requested family identifier
        family_id: String,
    },
}

impl ControllerError {
    /// Classify this error for host treatment.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Bridge(e) => e.category(),
            Self::Resolve(_) => ErrorCategory::Input,
            Self::UnknownFamily { .. } => ErrorCategory::Input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_a_sequence_display() {
        let err = ResolveError::NotASequence { found: "object" };
        assert_eq!(
            err.to_string(),
            "type error: expected a parameter list, found object"
        );
        assert_eq!(
            ControllerError::from(err).category(),
            ErrorCategory::Input
        );
    }

    #[test]
    fn test_bridge_error_categories() {
        assert_eq!(
            BridgeError::transport("connection refused").category(),
            ErrorCategory::Network
        );
        assert_eq!(
            BridgeError::Status {
                status: 404,
                body: String::new()
            }
            .category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            BridgeError::Status {
                status: 503,
                body: String::new()
            }
            .category(),
            ErrorCategory::Network
        );
        assert_eq!(
            BridgeError::Rejected {
                message: "bad template".into()
            }
            .category(),
            ErrorCategory::Operation
        );
    }

    #[test]
    fn test_bridge_error_codes() {
        let timeout = BridgeError::Transport {
            reason: "deadline".into(),
            timed_out: true,
        };
        assert_eq!(timeout.code(), "NET_TIMEOUT");
        assert_eq!(BridgeError::transport("reset").code(), "NET_ERROR");
        assert_eq!(BridgeError::decode("graph", "eof").code(), "DECODE");
    }

    #[test]
    fn test_error_category_toast_severity() {
        assert_eq!(ErrorCategory::Input.toast_severity(), ToastLevel::Error);
        assert_eq!(
            ErrorCategory::NotFound.toast_severity(),
            ToastLevel::Warning
        );
        assert_eq!(ErrorCategory::Network.toast_severity(), ToastLevel::Warning);
        assert_eq!(
            ErrorCategory::Operation.toast_severity(),
            ToastLevel::Error
        );
        assert!(ErrorCategory::Network.is_transient());
        assert!(!ErrorCategory::Input.is_transient());
    }

    #[test]
    fn test_notice_level_follows_category() {
        let refused = Notice::for_category(ErrorCategory::Operation, "not found");
        assert_eq!(refused.level, ToastLevel::Error);
        assert_eq!(refused.message, "not found");
        assert_eq!(
            Notice::for_category(ErrorCategory::Network, "offline").level,
            ToastLevel::Warning
        );
    }

    #[test]
    fn test_unknown_family_display() {
        let err = ControllerError::UnknownFamily {
            family_id: "NOPE".into(),
        };
        assert_eq!(err.to_string(), "unknown query family 'NOPE'");
    }
}
