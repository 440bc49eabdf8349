//! SQS event handler
//!
//! Bridges a Lambda invocation to the confirmation processor. Message bodies
//! are processed in the order SQS delivered them.

use crate::config::BatchMode;
use aws_lambda_events::event::sqs::{BatchItemFailure, SqsBatchResponse, SqsEvent, SqsMessage};
use chrono::Utc;
use confirmation::{ConfirmationProcessor, EmailProvider, SenderSource};
use lambda_runtime::{Context, Error, LambdaEvent};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, instrument, warn};

/// Time kept back from the invocation deadline so the handler can still
/// report before Lambda kills it
pub const DEADLINE_MARGIN: Duration = Duration::from_millis(500);

/// Time left until `deadline_ms` (epoch millis), minus [`DEADLINE_MARGIN`].
///
/// A deadline of 0 means the runtime did not provide one.
pub fn remaining_time(deadline_ms: u64, now_ms: i64) -> Option<Duration> {
    if deadline_ms == 0 {
        return None;
    }

    let remaining = u64::try_from(now_ms)
        .map(|now| deadline_ms.saturating_sub(now))
        .unwrap_or(deadline_ms);

    Some(Duration::from_millis(remaining).saturating_sub(DEADLINE_MARGIN))
}

fn invocation_deadline(context: &Context) -> Option<Instant> {
    remaining_time(context.deadline, Utc::now().timestamp_millis()).map(|left| Instant::now() + left)
}

fn body(record: &SqsMessage) -> &str {
    record.body.as_deref().unwrap_or_default()
}

/// Handle one SQS batch.
///
/// In [`BatchMode::FailFast`] the first failure fails the invocation, so SQS
/// redelivers the whole batch. In [`BatchMode::PerItem`] every message is
/// attempted and only the failed ones are reported back.
#[instrument(skip_all, fields(request_id = %event.context.request_id, records = event.payload.records.len(), mode = %mode))]
pub async fn handle_sqs_event<P, S>(
    processor: &ConfirmationProcessor<P, S>,
    mode: BatchMode,
    event: LambdaEvent<SqsEvent>,
) -> Result<SqsBatchResponse, Error>
where
    P: EmailProvider,
    S: SenderSource,
{
    let deadline = invocation_deadline(&event.context);
    let records = event.payload.records;

    match mode {
        BatchMode::FailFast => {
            let sent = processor
                .process_batch(records.iter().map(body), deadline)
                .await?;
            info!(sent, "Batch processed");
            Ok(SqsBatchResponse::default())
        }
        BatchMode::PerItem => {
            let messages = records.iter().map(|record| {
                let id = record.message_id.clone().unwrap_or_default();
                (id, body(record))
            });
            let report = processor.process_each(messages, deadline).await;

            if !report.all_sent() {
                warn!(
                    sent = report.sent_count(),
                    failed = report.failed_count(),
                    "Batch processed with failures"
                );
            } else {
                info!(sent = report.sent_count(), "Batch processed");
            }

            let mut response = SqsBatchResponse::default();
            response.batch_item_failures = report
                .failed_ids()
                .into_iter()
                .map(|id| {
                    let mut failure = BatchItemFailure::default();
                    failure.item_identifier = id.to_string();
                    failure
                })
                .collect();
            Ok(response)
        }
    }
}
