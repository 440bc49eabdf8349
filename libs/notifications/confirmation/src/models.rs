//! Confirmation event and outbound email models

use crate::error::DecodeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display};

/// Kind of confirmation a user has to perform.
///
/// The wire format only knows these two values; anything else is rejected
/// at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
pub enum ConfirmationType {
    /// Verify the email address of a freshly created account
    NewUser,
    /// Confirm a password reset request
    ResetPassword,
}

impl ConfirmationType {
    /// Path segment used in confirmation links (`newuser`, `resetpassword`)
    pub fn path_segment(&self) -> String {
        self.as_ref().to_lowercase()
    }
}

/// One pending confirmation, decoded from a queue message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfirmation {
    pub confirmation_type: ConfirmationType,
    pub base_url: String,
    pub user_login_id: i32,
    pub email: String,
    /// Language code, possibly empty. Absent and `null` both decode as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub lang: String,
    pub token: String,
    pub expires_at_millis: i64,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl UserConfirmation {
    /// Decode a queue message body.
    ///
    /// Unknown fields are ignored; a missing `lang` becomes the empty string.
    /// Every other field is required and must have the declared type.
    pub fn from_json(body: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Encode back to the queue wire format
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Instant the token stops being valid, `None` if out of range
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.expires_at_millis)
    }

    /// Whether the token had already expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expires_at| now >= expires_at)
    }

    /// Link embedded in the email.
    ///
    /// `base_url` and `token` are inserted verbatim and must already be
    /// URL-safe.
    pub fn confirm_url(&self) -> String {
        format!(
            "{}/confirm/{}/{}/{}",
            self.base_url,
            self.confirmation_type.path_segment(),
            self.user_login_id,
            self.token
        )
    }
}

/// Name/value pair attached to a send for delivery analytics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTag {
    pub name: String,
    pub value: String,
}

impl EmailTag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A fully resolved send request for a provider-side template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatedEmail {
    /// Single recipient
    pub to: String,
    /// Sender address
    pub from: String,
    /// Provider template identifier
    pub template_name: String,
    /// Template data, already serialized as a JSON object
    pub template_data: String,
    pub tags: Vec<EmailTag>,
}
