//! Generic error handling utilities
//!
//! Lets the binary report broker and configuration errors uniformly while
//! each error type decides how much of itself a user should see.

use crate::core::config::ConfigError;

/// Errors that distinguish user-actionable failures from system failures
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)` with a short actionable hint. Otherwise it returns `None`
/// and callers fall back to a generic operation context.
pub trait ContextualError: std::error::Error {
    /// True if the user can fix this by changing input or configuration
    fn is_user_actionable(&self) -> bool;

    /// Actionable hint for the user, if any
    fn user_message(&self) -> Option<&str>;
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        !matches!(self, ConfigError::Io { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::NotFound { .. } => Some("Check the --config-file path"),
            ConfigError::Parse { .. } => Some("Configuration file is not valid TOML for this program"),
            ConfigError::Invalid { message, .. } => Some(message),
            ConfigError::Io { .. } => None,
        }
    }
}

/// Log an error with a detail level based on whether the user can act on it
///
/// The primary line is always logged at error level; the full error and its
/// debug representation only at debug level.
///
/// ```rust
/// # use relaymq::core::error_handling::log_error_with_context;
/// # use relaymq::queue::MqError;
/// let err = MqError::UnknownTopic { topic: "orders".to_string() };
/// log_error_with_context(&err, "Publishing");
/// // Logs: "FATAL: Relate the topic to a queue before using it"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message().filter(|_| error.is_user_actionable()) {
        Some(user_msg) => log::error!("FATAL: {}: {}", user_msg, error),
        None => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
