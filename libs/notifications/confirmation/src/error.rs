//! Error types for the confirmation pipeline.
//!
//! Each pipeline stage has its own error so callers can tell a poison
//! message apart from an infrastructure hiccup:
//! - [`DecodeError`]: the payload will never parse, retrying is pointless
//! - [`SecretError`]: the sender address could not be obtained
//! - [`SendError`]: the email provider rejected or failed the send

use thiserror::Error;

/// Result type for confirmation processing.
pub type ConfirmationResult<T> = Result<T, ConfirmationError>;

/// Boxed provider failure carried inside [`SendError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The message body is not a well-formed confirmation event.
#[derive(Debug, Error)]
#[error("failed to deserialize confirmation json: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

impl DecodeError {
    /// Line of the offending input, 1-based
    pub fn line(&self) -> usize {
        self.0.line()
    }

    /// Column of the offending input, 1-based
    pub fn column(&self) -> usize {
        self.0.column()
    }
}

/// The sender address could not be obtained from the secret store.
#[derive(Debug, Error)]
pub enum SecretError {
    /// The store call itself failed (network, permissions, unknown secret).
    #[error("failed to retrieve secret '{name}': {message}")]
    Unavailable {
        name: String,
        /// Rendered store error, including its context
        message: String,
        #[source]
        source: BoxError,
    },

    /// The secret exists but has no string payload (binary secret).
    #[error("secret '{0}' has no string payload")]
    NoStringPayload(String),

    /// The payload is not a JSON object of string values.
    #[error("failed to parse secret string: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The payload parsed but has no `noreply` entry.
    #[error("key '{0}' not found in secret")]
    MissingKey(String),
}

/// The email provider rejected or failed the send.
#[derive(Debug, Error)]
#[error("failed to send {template} email: {source}")]
pub struct SendError {
    /// Template identifier the send was attempted with
    pub template: String,
    #[source]
    pub source: BoxError,
}

/// Any failure while processing one confirmation message.
#[derive(Debug, Error)]
pub enum ConfirmationError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("failed to get secret email from address: {0}")]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Send(#[from] SendError),

    /// The invocation deadline passed while a step was in flight.
    #[error("deadline exceeded during {stage}")]
    DeadlineExceeded { stage: &'static str },
}

impl ConfirmationError {
    /// Whether redelivering the same message could succeed.
    ///
    /// Decode failures are permanent. Everything else depends on external
    /// systems and may clear up on its own.
    pub fn is_transient(&self) -> bool {
        !matches!(self, ConfirmationError::Decode(_))
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            ConfirmationError::Decode(_) => "decode",
            ConfirmationError::Secret(_) => "secret",
            ConfirmationError::Send(_) => "send",
            ConfirmationError::DeadlineExceeded { .. } => "deadline",
        }
    }
}
