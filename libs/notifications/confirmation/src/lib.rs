//! Account confirmation emails
//!
//! Consumes confirmation events (new-account verification, password reset)
//! delivered by a queue and turns each into a templated SES email.
//!
//! ## Pipeline
//!
//! ```text
//! queue message body
//!   ↓ UserConfirmation::from_json
//! UserConfirmation
//!   ↓ SenderSource (Secrets Manager "noreply/Email")
//!   ↓ template_name(kind, lang) + confirm_url()
//! EmailDispatcher
//!   ↓
//! EmailProvider (SES / log / mock)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use confirmation::{ConfirmationProcessor, NoReplySecret, SecretsManagerStore, SesProvider};
//!
//! let sender = NoReplySecret::new(SecretsManagerStore::from_env().await, "noreply/Email");
//! let processor = ConfirmationProcessor::new(SesProvider::from_env(None).await, sender);
//! processor.process_batch(bodies, None).await?;
//! ```

pub mod dispatcher;
pub mod error;
pub mod models;
pub mod processor;
pub mod provider;
pub mod secrets;
pub mod templates;

// Re-export main types
pub use dispatcher::EmailDispatcher;
pub use error::{
    ConfirmationError, ConfirmationResult, DecodeError, SecretError, SendError,
};
pub use models::{ConfirmationType, EmailTag, TemplatedEmail, UserConfirmation};
pub use processor::{BatchReport, ConfirmationProcessor, MessageOutcome};
pub use provider::{EmailProvider, LogProvider, MockProvider, SendResult, SesProvider};
pub use secrets::{
    NoReplySecret, SecretStore, SecretsManagerStore, SenderSource, StaticSender,
    DEFAULT_SECRET_NAME,
};
pub use templates::template_name;
