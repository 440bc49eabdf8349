//! Confirmation Worker - Entry Point
//!
//! Lambda function that sends confirmation emails for SQS events.

#[tokio::main]
async fn main() -> eyre::Result<()> {
    confirmation_worker::run().await
}
