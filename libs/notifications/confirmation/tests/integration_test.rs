//! Integration tests for the confirmation pipeline

use confirmation::{
    ConfirmationError, ConfirmationProcessor, ConfirmationType, MockProvider, StaticSender,
    UserConfirmation,
};
use serde_json::{json, Value};

fn processor(provider: MockProvider) -> ConfirmationProcessor<MockProvider, StaticSender> {
    ConfirmationProcessor::new(provider, StaticSender::new("noreply@app.example"))
}

fn event(kind: &str, email: &str, lang: &str, user_id: i32) -> String {
    json!({
        "confirmation_type": kind,
        "base_url": "https://app.example",
        "user_login_id": user_id,
        "email": email,
        "lang": lang,
        "token": "abc",
        "expires_at_millis": 1_700_000_000_000_i64,
    })
    .to_string()
}

mod pipeline_tests {
    use super::*;

    #[tokio::test]
    async fn test_new_user_end_to_end() {
        let provider = MockProvider::new();
        let processor = processor(provider.clone());

        let sent = processor
            .process_batch([event("NewUser", "a@b.com", "en", 7)], None)
            .await
            .expect("batch should succeed");
        assert_eq!(sent, 1);

        let emails = provider.sent_emails().await;
        assert_eq!(emails.len(), 1);

        let email = &emails[0];
        assert_eq!(email.to, "a@b.com");
        assert_eq!(email.from, "noreply@app.example");
        assert_eq!(email.template_name, "EmailConfirmationEn");

        let data: Value = serde_json::from_str(&email.template_data).unwrap();
        assert_eq!(data, json!({ "url": "https://app.example/confirm/newuser/7/abc" }));

        assert_eq!(email.tags.len(), 1);
        assert_eq!(email.tags[0].name, "email_type");
        assert_eq!(email.tags[0].value, "confirmation");
    }

    #[tokio::test]
    async fn test_password_reset_without_language() {
        let provider = MockProvider::new();
        let processor = processor(provider.clone());

        processor
            .process_batch([event("ResetPassword", "r@b.com", "", 99)], None)
            .await
            .unwrap();

        let emails = provider.sent_emails().await;
        assert_eq!(emails[0].template_name, "PasswordResetConfirmation");
        assert!(emails[0]
            .template_data
            .contains("https://app.example/confirm/resetpassword/99/abc"));
    }

    #[tokio::test]
    async fn test_null_language_uses_base_template() {
        let provider = MockProvider::new();
        let processor = processor(provider.clone());

        let mut body = serde_json::from_str::<Value>(&event("NewUser", "a@b.com", "en", 3)).unwrap();
        body["lang"] = Value::Null;

        processor.process_batch([body.to_string()], None).await.unwrap();

        let emails = provider.sent_emails().await;
        assert_eq!(emails[0].template_name, "EmailConfirmation");
    }

    #[tokio::test]
    async fn test_first_message_undecodable_nothing_sent() {
        let provider = MockProvider::new();
        let processor = processor(provider.clone());

        let mut bad = serde_json::from_str::<Value>(&event("NewUser", "a@b.com", "en", 1)).unwrap();
        bad["user_login_id"] = json!("1");

        let err = processor
            .process_batch([bad.to_string(), event("NewUser", "b@b.com", "en", 2)], None)
            .await
            .unwrap_err();

        assert!(matches!(err, ConfirmationError::Decode(_)));
        assert!(!err.is_transient());
        assert_eq!(provider.sent_count().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_confirmation_type_is_rejected() {
        let provider = MockProvider::new();
        let processor = processor(provider.clone());

        let err = processor
            .process_batch([event("ChangeEmail", "a@b.com", "en", 1)], None)
            .await
            .unwrap_err();

        assert!(matches!(err, ConfirmationError::Decode(_)));
        assert_eq!(provider.sent_count().await, 0);
    }

    #[tokio::test]
    async fn test_two_events_dispatched_in_order() {
        let provider = MockProvider::new();
        let processor = processor(provider.clone());

        processor
            .process_batch(
                [
                    event("NewUser", "first@b.com", "EN", 1),
                    event("ResetPassword", "second@b.com", "pt-BR", 2),
                ],
                None,
            )
            .await
            .unwrap();

        let emails = provider.sent_emails().await;
        let templates: Vec<_> = emails.iter().map(|e| e.template_name.as_str()).collect();
        assert_eq!(
            templates,
            vec!["EmailConfirmationEn", "PasswordResetConfirmationPt-br"]
        );
        assert_eq!(emails[0].to, "first@b.com");
        assert_eq!(emails[1].to, "second@b.com");
    }

    #[tokio::test]
    async fn test_per_message_report() {
        let provider = MockProvider::failing_for("down@b.com", "Throttling");
        let processor = processor(provider.clone());

        let report = processor
            .process_each(
                [
                    ("id-1", event("NewUser", "down@b.com", "en", 1)),
                    ("id-2", event("NewUser", "up@b.com", "en", 2)),
                ],
                None,
            )
            .await;

        assert_eq!(report.failed_ids(), vec!["id-1"]);
        assert!(report.outcomes[0].result.as_ref().unwrap_err().is_transient());
        assert!(provider.was_sent_to("up@b.com").await);
    }
}

mod model_tests {
    use super::*;

    #[test]
    fn test_decode_reencode_decode() {
        let original = UserConfirmation::from_json(&event("ResetPassword", "a@b.com", "de", 42)).unwrap();
        let again = UserConfirmation::from_json(&original.to_json().unwrap()).unwrap();

        assert_eq!(again, original);
        assert_eq!(again.confirmation_type, ConfirmationType::ResetPassword);
        assert_eq!(again.user_login_id, 42);
    }

    #[test]
    fn test_empty_email_and_token_are_accepted() {
        let body = json!({
            "confirmation_type": "NewUser",
            "base_url": "https://app.example",
            "user_login_id": 1,
            "email": "",
            "token": "",
            "expires_at_millis": 0,
        })
        .to_string();

        let confirmation = UserConfirmation::from_json(&body).unwrap();
        assert_eq!(confirmation.confirm_url(), "https://app.example/confirm/newuser/1/");
    }
}
