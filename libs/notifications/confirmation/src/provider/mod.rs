//! Email provider implementations

pub mod log;
pub mod mock;
pub mod ses;

pub use log::LogProvider;
pub use mock::MockProvider;
pub use ses::SesProvider;

use crate::models::TemplatedEmail;
use async_trait::async_trait;
use eyre::Result;

/// Result of sending an email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResult {
    /// Provider-specific message ID
    pub message_id: String,
}

/// Sends emails rendered from provider-side templates.
///
/// Implementations make exactly one delivery attempt per call; errors are
/// passed through to the caller uninterpreted.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send a templated email
    async fn send(&self, email: &TemplatedEmail) -> Result<SendResult>;

    /// Get provider name
    fn name(&self) -> &'static str;
}

#[async_trait]
impl<T: EmailProvider + ?Sized> EmailProvider for Box<T> {
    async fn send(&self, email: &TemplatedEmail) -> Result<SendResult> {
        (**self).send(email).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
