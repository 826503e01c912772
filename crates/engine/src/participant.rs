//! The module contains the `Participant` type, a person tracked within one
//! event's ledger.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Bank details used to render payment instructions (QR amount/account info).
///
/// Display-only metadata; the engine never uses it in computation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankInfo {
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
}

/// A participant in an event.
///
/// Identity is stable per event. A participant may optionally link to one
/// authenticated user account (`user_id`), e.g. when joining via an invite
/// link; participants added by hand have no link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Stable identifier for this participant.
    ///
    /// Generated once when the participant is added to the event, so the
    /// participant can be renamed without breaking expense references.
    pub id: Uuid,
    pub name: String,
    pub user_id: Option<String>,
    pub bank_info: Option<BankInfo>,
}

impl Participant {
    pub fn new(name: &str) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: normalize_name(name)?,
            user_id: None,
            bank_info: None,
        })
    }

    pub fn with_id(id: Uuid, name: &str) -> ResultEngine<Self> {
        Ok(Self {
            id,
            name: normalize_name(name)?,
            user_id: None,
            bank_info: None,
        })
    }

    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    #[must_use]
    pub fn bank_info(mut self, bank_info: BankInfo) -> Self {
        self.bank_info = Some(bank_info);
        self
    }
}

/// Trim and NFC-normalize a display name so lookups and deduplication behave
/// the same however the name was typed (Vietnamese names mix precomposed and
/// combining forms depending on the input method).
fn normalize_name(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(
            "participant name must not be empty".to_string(),
        ));
    }
    Ok(trimmed.nfc().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_names() {
        assert!(Participant::new("  ").is_err());
    }

    #[test]
    fn normalizes_combining_marks() {
        // "Hà" written with a combining grave accent.
        let combining = "Ha\u{0300}";
        let participant = Participant::new(combining).unwrap();
        assert_eq!(participant.name, "H\u{00e0}");
    }

    #[test]
    fn builder_sets_optional_links() {
        let p = Participant::new("An")
            .unwrap()
            .user_id("user-1")
            .bank_info(BankInfo {
                bank_name: "VCB".to_string(),
                account_number: "00112233".to_string(),
                account_name: "NGUYEN VAN AN".to_string(),
            });
        assert_eq!(p.user_id.as_deref(), Some("user-1"));
        assert!(p.bank_info.is_some());
    }
}
