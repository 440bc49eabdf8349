//! Log-only provider for local runs. Nothing leaves the process.

use super::{EmailProvider, SendResult};
use crate::models::TemplatedEmail;
use async_trait::async_trait;
use eyre::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Provider that logs each email instead of sending it
#[derive(Debug, Default)]
pub struct LogProvider {
    sent: AtomicU64,
}

impl LogProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmailProvider for LogProvider {
    async fn send(&self, email: &TemplatedEmail) -> Result<SendResult> {
        let sequence = self.sent.fetch_add(1, Ordering::Relaxed) + 1;

        info!(
            to = %email.to,
            from = %email.from,
            template = %email.template_name,
            data = %email.template_data,
            "Log provider: skipping email delivery"
        );

        Ok(SendResult {
            message_id: format!("log-{sequence}"),
        })
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
