//! Builds the templated send request for a confirmation and hands it to the
//! provider.

use crate::error::SendError;
use crate::models::{EmailTag, TemplatedEmail, UserConfirmation};
use crate::provider::{EmailProvider, SendResult};
use serde_json::json;
use tracing::info;

/// Tags attached to every confirmation email
pub fn confirmation_tags() -> Vec<EmailTag> {
    vec![EmailTag::new("email_type", "confirmation")]
}

/// Assemble the send request without sending it.
pub fn build_email(confirmation: &UserConfirmation, template: &str, from: &str) -> TemplatedEmail {
    let template_data = json!({ "url": confirmation.confirm_url() }).to_string();

    TemplatedEmail {
        to: confirmation.email.clone(),
        from: from.to_string(),
        template_name: template.to_string(),
        template_data,
        tags: confirmation_tags(),
    }
}

/// Sends confirmation emails through an [`EmailProvider`]
pub struct EmailDispatcher<P: EmailProvider> {
    provider: P,
}

impl<P: EmailProvider> EmailDispatcher<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Send one confirmation email. Makes a single provider call, no retry.
    pub async fn dispatch(
        &self,
        confirmation: &UserConfirmation,
        template: &str,
        from: &str,
    ) -> Result<SendResult, SendError> {
        let email = build_email(confirmation, template, from);

        let result = self.provider.send(&email).await.map_err(|e| SendError {
            template: template.to_string(),
            source: e.into(),
        })?;

        info!(
            to = %email.to,
            template = %template,
            message_id = %result.message_id,
            provider = self.provider.name(),
            "Email successfully sent"
        );

        Ok(result)
    }
}
