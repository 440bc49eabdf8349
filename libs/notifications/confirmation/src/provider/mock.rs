//! Mock email provider for testing

use super::{EmailProvider, SendResult};
use crate::models::TemplatedEmail;
use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mock email provider that captures sent emails
#[derive(Clone, Default)]
pub struct MockProvider {
    sent_emails: Arc<Mutex<Vec<TemplatedEmail>>>,
    failure: Option<Failure>,
}

#[derive(Clone)]
enum Failure {
    Always(String),
    Recipient { to: String, message: String },
}

impl MockProvider {
    /// Create a new mock provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock provider that always fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(Failure::Always(message.into())),
            ..Self::default()
        }
    }

    /// Create a mock provider that fails only for one recipient
    pub fn failing_for(to: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            failure: Some(Failure::Recipient {
                to: to.into(),
                message: message.into(),
            }),
            ..Self::default()
        }
    }

    /// Get all sent emails, in send order
    pub async fn sent_emails(&self) -> Vec<TemplatedEmail> {
        self.sent_emails.lock().await.clone()
    }

    /// Get the count of sent emails
    pub async fn sent_count(&self) -> usize {
        self.sent_emails.lock().await.len()
    }

    /// Check if an email was sent to a specific address
    pub async fn was_sent_to(&self, email: &str) -> bool {
        self.sent_emails.lock().await.iter().any(|e| e.to == email)
    }
}

#[async_trait]
impl EmailProvider for MockProvider {
    async fn send(&self, email: &TemplatedEmail) -> Result<SendResult> {
        match &self.failure {
            Some(Failure::Always(message)) => return Err(eyre::eyre!(message.clone())),
            Some(Failure::Recipient { to, message }) if *to == email.to => {
                return Err(eyre::eyre!(message.clone()));
            }
            _ => {}
        }

        let mut sent = self.sent_emails.lock().await;
        sent.push(email.clone());

        Ok(SendResult {
            message_id: format!("mock-{}", sent.len()),
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
