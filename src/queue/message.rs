//! Message Types for the topic/queue broker
//!
//! Every queue payload implements [`Message`], which exposes get/set access to
//! its content. Queues and the registry never look at the content itself.
//!
//! Homogeneous traffic uses one of the concrete message types (or any user
//! type implementing the trait). Heterogeneous traffic on a single queue uses
//! [`Envelope`], whose [`Payload`] is a closed set of kinds with checked
//! accessors.

use crate::queue::error::{MqError, MqResult};
use chrono::{DateTime, Utc};

/// Content capability required of anything carried by a queue
///
/// # Example
///
/// ```rust
/// use relaymq::queue::Message;
///
/// struct Tick(u64);
///
/// impl Message for Tick {
///     type Content = u64;
///
///     fn content(&self) -> u64 {
///         self.0
///     }
///
///     fn set_content(&mut self, content: u64) {
///         self.0 = content;
///     }
/// }
/// ```
pub trait Message: Send + Sync + 'static {
    type Content;

    fn content(&self) -> Self::Content;

    fn set_content(&mut self, content: Self::Content);
}

/// Message carrying a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringMessage {
    content: String,
}

impl StringMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl Message for StringMessage {
    type Content = String;

    fn content(&self) -> String {
        self.content.clone()
    }

    fn set_content(&mut self, content: String) {
        self.content = content;
    }
}

/// Message carrying a signed integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntMessage {
    content: i64,
}

impl IntMessage {
    pub fn new(content: i64) -> Self {
        Self { content }
    }
}

impl Message for IntMessage {
    type Content = i64;

    fn content(&self) -> i64 {
        self.content
    }

    fn set_content(&mut self, content: i64) {
        self.content = content;
    }
}

/// Message carrying a double
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleMessage {
    content: f64,
}

impl DoubleMessage {
    pub fn new(content: f64) -> Self {
        Self { content }
    }
}

impl Message for DoubleMessage {
    type Content = f64;

    fn content(&self) -> f64 {
        self.content
    }

    fn set_content(&mut self, content: f64) {
        self.content = content;
    }
}

/// Closed set of payload kinds an [`Envelope`] may carry
#[derive(Debug, Clone, PartialEq, strum_macros::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Payload {
    Text(String),
    Int(i64),
    Float(f64),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
}

impl Payload {
    /// Static name of the stored kind, as used in `TypeMismatch` errors
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    pub fn as_text(&self) -> MqResult<&str> {
        match self {
            Payload::Text(text) => Ok(text),
            other => Err(other.mismatch("text")),
        }
    }

    pub fn as_int(&self) -> MqResult<i64> {
        match self {
            Payload::Int(value) => Ok(*value),
            other => Err(other.mismatch("int")),
        }
    }

    pub fn as_float(&self) -> MqResult<f64> {
        match self {
            Payload::Float(value) => Ok(*value),
            other => Err(other.mismatch("float")),
        }
    }

    pub fn as_bytes(&self) -> MqResult<&[u8]> {
        match self {
            Payload::Bytes(bytes) => Ok(bytes),
            other => Err(other.mismatch("bytes")),
        }
    }

    pub fn as_json(&self) -> MqResult<&serde_json::Value> {
        match self {
            Payload::Json(value) => Ok(value),
            other => Err(other.mismatch("json")),
        }
    }

    fn mismatch(&self, expected: &'static str) -> MqError {
        MqError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::Text(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Text(value.to_string())
    }
}

impl From<i64> for Payload {
    fn from(value: i64) -> Self {
        Payload::Int(value)
    }
}

impl From<f64> for Payload {
    fn from(value: f64) -> Self {
        Payload::Float(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Payload::Bytes(value)
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::Json(value)
    }
}

/// Heterogeneous message: a tagged payload plus creation metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    payload: Payload,
    created_at: DateTime<Utc>,
    producer: Option<String>,
}

impl Envelope {
    pub fn new(payload: impl Into<Payload>) -> Self {
        Self {
            payload: payload.into(),
            created_at: Utc::now(),
            producer: None,
        }
    }

    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = Some(producer.into());
        self
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn producer(&self) -> Option<&str> {
        self.producer.as_deref()
    }
}

impl Message for Envelope {
    type Content = Payload;

    fn content(&self) -> Payload {
        self.payload.clone()
    }

    fn set_content(&mut self, content: Payload) {
        self.payload = content;
    }
}
