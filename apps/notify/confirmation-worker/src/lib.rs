//! Confirmation Worker
//!
//! AWS Lambda function that sends account confirmation emails for events
//! delivered by SQS.
//!
//! ## Architecture
//!
//! ```text
//! SQS queue (UserConfirmation JSON bodies)
//!   ↓ (Lambda event source mapping)
//! handle_sqs_event
//!   ↓
//! ConfirmationProcessor
//!   ↓ sender: NOREPLY_EMAIL or Secrets Manager
//!   ↓ provider: SES or log
//! SES templated email
//! ```

pub mod config;
pub mod handler;

use aws_lambda_events::event::sqs::SqsEvent;
use config::{ProviderKind, SenderConfig, WorkerConfig};
use confirmation::{
    ConfirmationProcessor, EmailProvider, LogProvider, NoReplySecret, SecretsManagerStore,
    SenderSource, SesProvider, StaticSender,
};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use eyre::{Result, WrapErr};
use handler::handle_sqs_event;
use lambda_runtime::{service_fn, LambdaEvent};
use std::sync::Arc;
use tracing::info;

async fn build_provider(config: &WorkerConfig) -> Box<dyn EmailProvider> {
    match config.provider {
        ProviderKind::Ses => Box::new(SesProvider::from_env(config.ses_region.clone()).await),
        ProviderKind::Log => Box::new(LogProvider::new()),
    }
}

async fn build_sender(config: &WorkerConfig) -> Box<dyn SenderSource> {
    match &config.sender {
        SenderConfig::Static(address) => Box::new(StaticSender::new(address.clone())),
        SenderConfig::Secret(name) => {
            Box::new(NoReplySecret::new(SecretsManagerStore::from_env().await, name.clone()))
        }
    }
}

/// Run the confirmation worker
///
/// Sets up logging, reads [`WorkerConfig`], builds the AWS clients once and
/// then serves Lambda invocations until the runtime shuts down.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the Lambda runtime
/// fails.
pub async fn run() -> Result<()> {
    let environment = Environment::from_env();
    if environment.is_development() {
        install_color_eyre();
    }
    init_tracing(&environment);

    let config = WorkerConfig::from_env().wrap_err("Failed to load worker configuration")?;
    let provider = build_provider(&config).await;
    let sender = build_sender(&config).await;
    info!(
        provider = provider.name(),
        batch_mode = %config.batch_mode,
        sender = ?config.sender,
        "Starting confirmation worker"
    );

    let processor = Arc::new(ConfirmationProcessor::new(provider, sender));
    let mode = config.batch_mode;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<SqsEvent>| {
        let processor = Arc::clone(&processor);
        async move { handle_sqs_event(&*processor, mode, event).await }
    }))
    .await
    .map_err(|e| eyre::eyre!("{}", e))?;

    info!("Confirmation worker stopped");
    Ok(())
}
