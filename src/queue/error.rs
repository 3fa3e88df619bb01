//! Queue Error Types

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MqError {
    #[error("Topic '{topic}' is not related to any queue")]
    UnknownTopic { topic: String },

    #[error("Queue '{queue}' is already related to topic '{topic}'")]
    DuplicateRelation { topic: String, queue: String },

    #[error("Queue '{queue}' is not related to topic '{topic}'")]
    UnknownRelation { topic: String, queue: String },

    #[error("Queue '{queue}' did not drain within {timeout_ms}ms (relation to '{topic}' kept)")]
    DrainTimeout {
        topic: String,
        queue: String,
        timeout_ms: u32,
    },

    #[error("Queue '{queue}' fetch timed out after {timeout_ms}ms")]
    QueueTimeout { queue: String, timeout_ms: u32 },

    #[error("Topic '{topic}' is already subscribed by '{subscriber}'")]
    AlreadySubscribed { topic: String, subscriber: String },

    #[error("Topic '{topic}' is not subscribed by '{subscriber}'")]
    NotSubscribed { topic: String, subscriber: String },

    #[error("'{subscriber}' has no subscribed topics")]
    NoSubscriptions { subscriber: String },

    #[error("Payload type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl MqError {
    /// True for the two timeout kinds; callers may retry these.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            MqError::QueueTimeout { .. } | MqError::DrainTimeout { .. }
        )
    }
}

impl crate::core::error_handling::ContextualError for MqError {
    fn is_user_actionable(&self) -> bool {
        !self.is_timeout()
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            MqError::UnknownTopic { .. } => Some("Relate the topic to a queue before using it"),
            MqError::DuplicateRelation { .. } => Some("The queue is already related to this topic"),
            MqError::UnknownRelation { .. } => Some("The queue was never related to this topic"),
            MqError::AlreadySubscribed { .. } => Some("The topic is already subscribed"),
            MqError::NotSubscribed { .. } => Some("Subscribe to the topic first"),
            MqError::NoSubscriptions { .. } => Some("Subscribe to at least one topic first"),
            MqError::TypeMismatch { .. } => Some("Requested payload type does not match"),
            MqError::QueueTimeout { .. } | MqError::DrainTimeout { .. } => None,
        }
    }
}

/// Result type for queue operations
pub type MqResult<T> = Result<T, MqError>;
