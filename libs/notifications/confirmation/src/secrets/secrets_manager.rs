//! AWS Secrets Manager backed [`SecretStore`]

use super::SecretStore;
use crate::error::SecretError;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::Client;
use tracing::error;

const VERSION_STAGE: &str = "AWSCURRENT";

/// Reads the current version of a secret from AWS Secrets Manager
#[derive(Clone)]
pub struct SecretsManagerStore {
    client: Client,
}

impl SecretsManagerStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create from the default AWS SDK config
    pub async fn from_env() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
    async fn secret_string(&self, name: &str) -> Result<Option<String>, SecretError> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(name)
            .version_stage(VERSION_STAGE)
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                error!(secret = %name, error = %message, "GetSecretValue failed");
                SecretError::Unavailable {
                    name: name.to_string(),
                    message,
                    source: e.into(),
                }
            })?;

        Ok(output.secret_string().map(str::to_string))
    }
}
