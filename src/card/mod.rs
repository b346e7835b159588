//! Card data model exchanged with the track codecs.

mod expiry;
mod kind;

pub use expiry::{ExpiryDate, ExpiryError};
pub use kind::CardType;

use serde::{Deserialize, Serialize};

/// The fields carried by a magnetic-stripe track.
///
/// Empty strings and `None` mean "absent". `card_type` is derived from the
/// account number when a track is read and is ignored when one is written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format_code: String,
    #[serde(default)]
    pub primary_account_number: String,
    #[serde(default)]
    pub card_type: CardType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<ExpiryDate>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub discretionary_data: String,
}

impl CardRecord {
    /// Start a record for the given account number, classifying it.
    pub fn new<S: Into<String>>(pan: S) -> Self {
        let primary_account_number = pan.into();
        Self {
            card_type: CardType::classify(&primary_account_number),
            primary_account_number,
            ..Self::default()
        }
    }

    /// Account number with everything but the first six and last four digits masked.
    pub fn masked_pan(&self) -> String {
        mask_pan(&self.primary_account_number)
    }
}

/// Mask an account number for display or logging.
///
/// Numbers too short to keep both the six-digit prefix and four-digit suffix
/// are masked entirely.
pub fn mask_pan(pan: &str) -> String {
    let chars: Vec<char> = pan.chars().collect();
    if chars.len() <= 10 {
        return "*".repeat(chars.len());
    }
    let hidden = chars.len() - 10;
    let mut out = String::with_capacity(chars.len());
    out.extend(&chars[..6]);
    out.extend(std::iter::repeat_n('*', hidden));
    out.extend(&chars[chars.len() - 4..]);
    out
}
