//! SES template naming
//!
//! Templates are registered at the provider as `EmailConfirmation`,
//! `EmailConfirmation{Lang}`, `PasswordResetConfirmation` and
//! `PasswordResetConfirmation{Lang}`. `{Lang}` is the full language string with
//! its first character uppercased and the rest lowercased, so `en` becomes
//! `En` and `pt-BR` becomes `Pt-br`.

use crate::models::ConfirmationType;

/// Template used when no language suffix applies
pub fn base_template(confirmation_type: ConfirmationType) -> &'static str {
    match confirmation_type {
        ConfirmationType::NewUser => "EmailConfirmation",
        ConfirmationType::ResetPassword => "PasswordResetConfirmation",
    }
}

/// Resolve the template identifier for a confirmation kind and language.
///
/// Languages shorter than two characters fall back to the base (English)
/// template. Whether the template exists is only known at send time.
pub fn template_name(confirmation_type: ConfirmationType, lang: &str) -> String {
    let base = base_template(confirmation_type);

    if lang.chars().nth(1).is_none() {
        return base.to_string();
    }

    format!("{}{}", base, capitalize(lang))
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str().to_lowercase();
    first.to_uppercase().chain(rest.chars()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_table() {
        let cases = [
            (ConfirmationType::NewUser, "", "EmailConfirmation"),
            (ConfirmationType::NewUser, "en", "EmailConfirmationEn"),
            (ConfirmationType::NewUser, "es", "EmailConfirmationEs"),
            (ConfirmationType::ResetPassword, "de", "PasswordResetConfirmationDe"),
            (ConfirmationType::ResetPassword, "x", "PasswordResetConfirmation"),
        ];

        for (kind, lang, expected) in cases {
            assert_eq!(template_name(kind, lang), expected, "({kind:?}, {lang:?})");
        }
    }

    #[test]
    fn test_case_is_folded_after_first_char() {
        assert_eq!(
            template_name(ConfirmationType::ResetPassword, "EN"),
            "PasswordResetConfirmationEn"
        );
        assert_eq!(template_name(ConfirmationType::NewUser, "fR"), "EmailConfirmationFr");
    }

    #[test]
    fn test_long_language_is_not_truncated() {
        assert_eq!(template_name(ConfirmationType::NewUser, "pt-BR"), "EmailConfirmationPt-br");
        assert_eq!(
            template_name(ConfirmationType::ResetPassword, "ZH_hant"),
            "PasswordResetConfirmationZh_hant"
        );
    }

    #[test]
    fn test_non_ascii_language() {
        assert_eq!(template_name(ConfirmationType::NewUser, "é"), "EmailConfirmation");
        assert_eq!(template_name(ConfirmationType::NewUser, "éS"), "EmailConfirmationÉs");
    }

    #[test]
    fn test_base_template() {
        assert_eq!(base_template(ConfirmationType::NewUser), "EmailConfirmation");
        assert_eq!(
            base_template(ConfirmationType::ResetPassword),
            "PasswordResetConfirmation"
        );
    }
}
