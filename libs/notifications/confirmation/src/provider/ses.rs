//! AWS SES (Simple Email Service) provider
//!
//! Sends emails through SES v2 using stored templates (`SendEmail` with
//! `Content.Template`). The templates themselves are managed outside this
//! crate.
//!
//! Credentials come from the standard AWS SDK chain (Lambda execution role,
//! environment variables, shared credentials file).

use crate::models::TemplatedEmail;
use crate::provider::{EmailProvider, SendResult};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sesv2::error::DisplayErrorContext;
use aws_sdk_sesv2::types::{Destination, EmailContent, MessageTag, Template};
use aws_sdk_sesv2::Client;
use eyre::{eyre, Result, WrapErr};
use tracing::{debug, error};

/// AWS SES email provider
#[derive(Clone)]
pub struct SesProvider {
    client: Client,
}

impl SesProvider {
    /// Create a new SesProvider with an existing AWS SES client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create from the default AWS SDK config.
    ///
    /// `region` overrides the region resolved by the SDK when given.
    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }

        let config = loader.load().await;
        Self::new(Client::new(&config))
    }

    fn build_tags(email: &TemplatedEmail) -> Result<Vec<MessageTag>> {
        email
            .tags
            .iter()
            .map(|tag| {
                MessageTag::builder()
                    .name(&tag.name)
                    .value(&tag.value)
                    .build()
                    .wrap_err_with(|| format!("invalid email tag '{}'", tag.name))
            })
            .collect()
    }
}

#[async_trait]
impl EmailProvider for SesProvider {
    async fn send(&self, email: &TemplatedEmail) -> Result<SendResult> {
        let destination = Destination::builder().to_addresses(&email.to).build();

        let content = EmailContent::builder()
            .template(
                Template::builder()
                    .template_name(&email.template_name)
                    .template_data(&email.template_data)
                    .build(),
            )
            .build();

        debug!(
            to = %email.to,
            from = %email.from,
            template = %email.template_name,
            "Sending templated email via AWS SES"
        );

        let response = self
            .client
            .send_email()
            .from_email_address(&email.from)
            .destination(destination)
            .content(content)
            .set_email_tags(Some(Self::build_tags(email)?))
            .send()
            .await
            .map_err(|e| {
                let detail = DisplayErrorContext(&e).to_string();
                error!(error = %detail, template = %email.template_name, "AWS SES send failed");
                eyre!("SES error: {}", detail)
            })?;

        let message_id = response.message_id().unwrap_or_default().to_string();

        debug!(message_id = %message_id, "Email accepted by AWS SES");

        Ok(SendResult { message_id })
    }

    fn name(&self) -> &'static str {
        "aws-ses"
    }
}
