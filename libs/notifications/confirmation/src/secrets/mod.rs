//! Sender address lookup
//!
//! The processor asks a [`SenderSource`] for the `From` address of every
//! email. In production that is [`NoReplySecret`] reading a JSON secret such
//! as `{"noreply": "noreply@example.com"}` from AWS Secrets Manager; locally
//! and in tests a [`StaticSender`] is enough.

mod secrets_manager;

pub use secrets_manager::SecretsManagerStore;

use crate::error::SecretError;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Secret holding the sender address, unless configured otherwise
pub const DEFAULT_SECRET_NAME: &str = "noreply/Email";

/// Key inside the secret that holds the sender address
pub const NOREPLY_KEY: &str = "noreply";

/// Yields the sender address for outgoing emails
#[async_trait]
pub trait SenderSource: Send + Sync {
    async fn sender_address(&self) -> Result<String, SecretError>;
}

#[async_trait]
impl<T: SenderSource + ?Sized> SenderSource for Box<T> {
    async fn sender_address(&self) -> Result<String, SecretError> {
        (**self).sender_address().await
    }
}

/// Raw access to a secret store.
///
/// `Ok(None)` means the secret exists but carries no string payload.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn secret_string(&self, name: &str) -> Result<Option<String>, SecretError>;
}

/// Extract the `noreply` address from a secret payload.
///
/// The payload must be a JSON object whose values are all strings.
pub fn parse_noreply(secret: &str) -> Result<String, SecretError> {
    let values: HashMap<String, String> =
        serde_json::from_str(secret).map_err(SecretError::Malformed)?;

    values
        .get(NOREPLY_KEY)
        .cloned()
        .ok_or_else(|| SecretError::MissingKey(NOREPLY_KEY.to_string()))
}

/// Sender address read from a named secret on every call
pub struct NoReplySecret<S: SecretStore> {
    store: S,
    secret_name: String,
}

impl<S: SecretStore> NoReplySecret<S> {
    pub fn new(store: S, secret_name: impl Into<String>) -> Self {
        Self {
            store,
            secret_name: secret_name.into(),
        }
    }
}

#[async_trait]
impl<S: SecretStore> SenderSource for NoReplySecret<S> {
    async fn sender_address(&self) -> Result<String, SecretError> {
        let payload = self
            .store
            .secret_string(&self.secret_name)
            .await?
            .ok_or_else(|| SecretError::NoStringPayload(self.secret_name.clone()))?;

        let address = parse_noreply(&payload)?;
        debug!(secret = %self.secret_name, from = %address, "Resolved sender address");
        Ok(address)
    }
}

/// Fixed sender address
#[derive(Debug, Clone)]
pub struct StaticSender {
    address: String,
}

impl StaticSender {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

#[async_trait]
impl SenderSource for StaticSender {
    async fn sender_address(&self) -> Result<String, SecretError> {
        Ok(self.address.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn store_returning(
        result: impl Fn() -> Result<Option<String>, SecretError> + Send + 'static,
    ) -> MockSecretStore {
        let mut store = MockSecretStore::new();
        store
            .expect_secret_string()
            .with(eq("noreply/Email"))
            .times(1)
            .returning(move |_| result());
        store
    }

    #[test]
    fn test_parse_noreply() {
        let address = parse_noreply(r#"{"noreply":"noreply@example.com","other":"x"}"#).unwrap();
        assert_eq!(address, "noreply@example.com");
    }

    #[test]
    fn test_parse_noreply_missing_key() {
        let err = parse_noreply(r#"{"support":"help@example.com"}"#).unwrap_err();
        assert!(matches!(err, SecretError::MissingKey(key) if key == "noreply"));
    }

    #[test]
    fn test_parse_noreply_malformed() {
        assert!(matches!(parse_noreply("noreply@example.com"), Err(SecretError::Malformed(_))));
        // values must be strings
        assert!(matches!(parse_noreply(r#"{"noreply":42}"#), Err(SecretError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_noreply_secret_resolves_address() {
        let store = store_returning(|| Ok(Some(r#"{"noreply":"noreply@example.com"}"#.to_string())));
        let source = NoReplySecret::new(store, DEFAULT_SECRET_NAME);

        assert_eq!(source.sender_address().await.unwrap(), "noreply@example.com");
    }

    #[tokio::test]
    async fn test_noreply_secret_without_string_payload() {
        let store = store_returning(|| Ok(None));
        let source = NoReplySecret::new(store, DEFAULT_SECRET_NAME);

        let err = source.sender_address().await.unwrap_err();
        assert!(matches!(err, SecretError::NoStringPayload(name) if name == "noreply/Email"));
    }

    #[tokio::test]
    async fn test_noreply_secret_store_unavailable() {
        let store = store_returning(|| {
            Err(SecretError::Unavailable {
                name: "noreply/Email".to_string(),
                message: "AccessDeniedException: not authorized".to_string(),
                source: "AccessDeniedException".into(),
            })
        });
        let source = NoReplySecret::new(store, DEFAULT_SECRET_NAME);

        let err = source.sender_address().await.unwrap_err();
        assert!(matches!(err, SecretError::Unavailable { .. }));
        assert!(err.to_string().contains("AccessDeniedException: not authorized"));

        let source = std::error::Error::source(&err).expect("store error kept as source");
        assert_eq!(source.to_string(), "AccessDeniedException");
    }

    #[tokio::test]
    async fn test_noreply_secret_missing_key() {
        let store = store_returning(|| Ok(Some(r#"{"admin":"admin@example.com"}"#.to_string())));
        let source = NoReplySecret::new(store, DEFAULT_SECRET_NAME);

        assert!(matches!(
            source.sender_address().await,
            Err(SecretError::MissingKey(_))
        ));
    }

    #[tokio::test]
    async fn test_static_sender() {
        let source = StaticSender::new("noreply@example.com");
        assert_eq!(source.sender_address().await.unwrap(), "noreply@example.com");
    }
}
