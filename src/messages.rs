//! Localized user-facing messages.

use serde::Deserialize;

/// A language applicants can receive messages in.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// English, the default.
    #[default]
    En,

    /// Turkish.
    Tr,
}

/// An identifier for a localized message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageId {
    /// The submitted email already appears in the category's spreadsheet.
    EmailExists,

    /// The submitted code doesn't match a live code.
    InvalidCode,

    /// The application was appended to the spreadsheet.
    VerificationSuccessful,

    /// A verification code was emailed to the applicant.
    VerificationEmailSent,
}

/// Resolves a message identifier to its localized text.
pub fn localize(lang: Lang, id: MessageId) -> &'static str {
    match (lang, id) {
        (Lang::En, MessageId::EmailExists) => {
            "This email address has already been used to apply."
        }
        (Lang::Tr, MessageId::EmailExists) => {
            "Bu e-posta adresi ile daha önce başvuru yapılmış."
        }
        (Lang::En, MessageId::InvalidCode) => "Invalid or expired verification code.",
        (Lang::Tr, MessageId::InvalidCode) => "Geçersiz veya süresi dolmuş doğrulama kodu.",
        (Lang::En, MessageId::VerificationSuccessful) => {
            "Your application has been received successfully."
        }
        (Lang::Tr, MessageId::VerificationSuccessful) => "Başvurunuz başarıyla alındı.",
        (Lang::En, MessageId::VerificationEmailSent) => {
            "A verification code has been sent to your email address."
        }
        (Lang::Tr, MessageId::VerificationEmailSent) => {
            "E-posta adresinize bir doğrulama kodu gönderildi."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lang_defaults_to_english() {
        assert_eq!(Lang::default(), Lang::En, "unset language should be English");
    }

    #[test]
    fn every_message_localizes_in_both_languages() {
        for id in [
            MessageId::EmailExists,
            MessageId::InvalidCode,
            MessageId::VerificationSuccessful,
            MessageId::VerificationEmailSent,
        ] {
            assert!(
                !localize(Lang::En, id).is_empty(),
                "English message for {id:?} should exist"
            );
            assert!(
                !localize(Lang::Tr, id).is_empty(),
                "Turkish message for {id:?} should exist"
            );
        }
    }
}
