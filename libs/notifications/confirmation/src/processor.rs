//! ConfirmationProcessor - runs a batch of queue messages through the pipeline
//!
//! Every message goes through the same steps, strictly one after another:
//! decode, look up the sender, resolve the template, send. Nothing runs
//! concurrently and no state survives between messages.
//!
//! Two batch contracts are offered:
//! - [`ConfirmationProcessor::process_batch`] stops at the first failure and
//!   returns that error for the whole batch.
//! - [`ConfirmationProcessor::process_each`] keeps going and reports an
//!   outcome per message, so the caller can redeliver only what failed.

use crate::dispatcher::EmailDispatcher;
use crate::error::{ConfirmationError, ConfirmationResult};
use crate::models::UserConfirmation;
use crate::provider::{EmailProvider, SendResult};
use crate::secrets::SenderSource;
use crate::templates::template_name;
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, error, field, instrument, warn, Span};

/// Outcome of one message in a [`BatchReport`]
#[derive(Debug)]
pub struct MessageOutcome {
    /// Queue-assigned message identifier
    pub message_id: String,
    pub result: ConfirmationResult<SendResult>,
}

impl MessageOutcome {
    pub fn is_sent(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-message results of [`ConfirmationProcessor::process_each`], in
/// delivery order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<MessageOutcome>,
}

impl BatchReport {
    pub fn sent_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_sent()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.sent_count()
    }

    /// Identifiers of the messages that were not sent
    pub fn failed_ids(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_sent())
            .map(|o| o.message_id.as_str())
            .collect()
    }

    pub fn all_sent(&self) -> bool {
        self.outcomes.iter().all(MessageOutcome::is_sent)
    }
}

/// Turns confirmation messages into sent emails
pub struct ConfirmationProcessor<P: EmailProvider, S: SenderSource> {
    dispatcher: EmailDispatcher<P>,
    sender: Arc<S>,
}

impl<P: EmailProvider, S: SenderSource> ConfirmationProcessor<P, S> {
    /// Create a new ConfirmationProcessor
    pub fn new(provider: P, sender: S) -> Self {
        Self {
            dispatcher: EmailDispatcher::new(provider),
            sender: Arc::new(sender),
        }
    }

    pub fn provider(&self) -> &P {
        self.dispatcher.provider()
    }

    /// Process one raw message body.
    ///
    /// `deadline` bounds every network call; once it has passed the step
    /// fails with [`ConfirmationError::DeadlineExceeded`].
    #[instrument(
        name = "confirmation",
        skip_all,
        fields(user_login_id = field::Empty, confirmation_type = field::Empty, template = field::Empty)
    )]
    pub async fn process_message(
        &self,
        body: &str,
        deadline: Option<Instant>,
    ) -> ConfirmationResult<SendResult> {
        let confirmation = UserConfirmation::from_json(body).inspect_err(|e| {
            warn!(
                line = e.line(),
                column = e.column(),
                body_len = body.len(),
                "Message body is not a confirmation event"
            );
        })?;

        let span = Span::current();
        span.record("user_login_id", confirmation.user_login_id);
        span.record("confirmation_type", field::display(confirmation.confirmation_type));

        if confirmation.is_expired_at(Utc::now()) {
            warn!(
                expires_at_millis = confirmation.expires_at_millis,
                "Confirmation token already expired, sending anyway"
            );
        }

        let from = within_deadline(deadline, "secret lookup", self.sender.sender_address()).await?;
        debug!(from = %from, "Using from address");

        let template = template_name(confirmation.confirmation_type, &confirmation.lang);
        span.record("template", template.as_str());

        within_deadline(
            deadline,
            "send",
            self.dispatcher.dispatch(&confirmation, &template, &from),
        )
        .await
    }

    /// Process a batch, stopping at the first failure.
    ///
    /// Messages after the failing one are not attempted. Returns the number
    /// of emails sent when every message succeeded.
    pub async fn process_batch<I, B>(
        &self,
        bodies: I,
        deadline: Option<Instant>,
    ) -> ConfirmationResult<usize>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<str>,
    {
        let mut sent = 0;

        for (index, body) in bodies.into_iter().enumerate() {
            debug!(index, "Processing message");

            if let Err(e) = self.process_message(body.as_ref(), deadline).await {
                error!(index, sent, error = %e, kind = e.kind(), "Aborting batch");
                return Err(e);
            }

            sent += 1;
        }

        Ok(sent)
    }

    /// Process every message of a batch and report each outcome.
    pub async fn process_each<I, Id, B>(&self, messages: I, deadline: Option<Instant>) -> BatchReport
    where
        I: IntoIterator<Item = (Id, B)>,
        Id: Into<String>,
        B: AsRef<str>,
    {
        let mut report = BatchReport::default();

        for (message_id, body) in messages {
            let message_id = message_id.into();
            let result = self.process_message(body.as_ref(), deadline).await;

            if let Err(e) = &result {
                error!(
                    message_id = %message_id,
                    error = %e,
                    kind = e.kind(),
                    transient = e.is_transient(),
                    "Message failed"
                );
            }

            report.outcomes.push(MessageOutcome { message_id, result });
        }

        report
    }
}

async fn within_deadline<T, E, F>(
    deadline: Option<Instant>,
    stage: &'static str,
    step: F,
) -> ConfirmationResult<T>
where
    F: Future<Output = Result<T, E>>,
    ConfirmationError: From<E>,
{
    let Some(deadline) = deadline else {
        return Ok(step.await?);
    };

    // an already-ready future would otherwise win against an elapsed deadline
    if Instant::now() >= deadline {
        return Err(ConfirmationError::DeadlineExceeded { stage });
    }

    match timeout_at(deadline, step).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(ConfirmationError::DeadlineExceeded { stage }),
    }
}
