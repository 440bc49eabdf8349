//! Worker configuration, read from environment variables

use confirmation::DEFAULT_SECRET_NAME;
use core_config::{env_optional, env_or_default, env_parse, ConfigError, Environment, FromEnv};
use strum::{Display, EnumString};

/// Which email provider delivers the messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ProviderKind {
    /// AWS SES v2
    Ses,
    /// Log the email and report success
    Log,
}

/// How a failing message affects the rest of its batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BatchMode {
    /// Stop at the first failure and fail the whole invocation
    #[default]
    FailFast,
    /// Process every message and report the failed ones individually
    PerItem,
}

/// Where the sender address comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SenderConfig {
    /// Fixed address (`NOREPLY_EMAIL`)
    Static(String),
    /// `noreply` key of a Secrets Manager secret
    Secret(String),
}

/// Configuration for the confirmation worker
///
/// Environment variables:
/// - `APP_ENV` - `production` or `development` (default)
/// - `EMAIL_PROVIDER` - `ses` or `log` (default: `ses` in production, `log` otherwise)
/// - `BATCH_MODE` - `fail_fast` (default) or `per_item`
/// - `NOREPLY_EMAIL` - fixed sender address, skips Secrets Manager when set
/// - `NOREPLY_SECRET_NAME` - secret holding the sender (default: `noreply/Email`)
/// - `AWS_SES_REGION` - region override for SES
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub environment: Environment,
    pub provider: ProviderKind,
    pub batch_mode: BatchMode,
    pub sender: SenderConfig,
    pub ses_region: Option<String>,
}

impl FromEnv for WorkerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();

        let default_provider = if environment.is_production() {
            ProviderKind::Ses
        } else {
            ProviderKind::Log
        };

        let sender = match env_optional("NOREPLY_EMAIL") {
            Some(address) => SenderConfig::Static(address),
            None => SenderConfig::Secret(env_or_default("NOREPLY_SECRET_NAME", DEFAULT_SECRET_NAME)),
        };

        Ok(Self {
            environment,
            provider: env_parse("EMAIL_PROVIDER", default_provider)?,
            batch_mode: env_parse("BATCH_MODE", BatchMode::default())?,
            sender,
            ses_region: env_optional("AWS_SES_REGION"),
        })
    }
}
