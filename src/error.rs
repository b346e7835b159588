use thiserror::Error;

use crate::card::{CardRecord, ExpiryError};
use crate::pattern::PatternError;
use crate::track::Field;

/// Structural problem with a track string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("does not match the track grammar")]
    Grammar,
    #[error("length {len} exceeds maximum of {max}")]
    TooLong { len: usize, max: usize },
    #[error("not valid UTF-8")]
    Utf8,
}

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("unable to create valid track data: {0}")]
    Encode(Violation),

    #[error("invalid track format: {0}")]
    Decode(Violation),

    /// A sub-field matched the grammar but its value could not be parsed.
    /// The other fields were still extracted and travel with the error.
    #[error("invalid {field} {value:?}: {source}")]
    Field {
        field: Field,
        value: String,
        #[source]
        source: ExpiryError,
        card: Box<CardRecord>,
    },

    #[error(transparent)]
    Pattern(#[from] PatternError),
}

impl TrackError {
    /// The partially decoded record carried by a [`TrackError::Field`].
    pub fn partial_card(&self) -> Option<&CardRecord> {
        match self {
            TrackError::Field { card, .. } => Some(card.as_ref()),
            _ => None,
        }
    }

    pub fn into_partial_card(self) -> Option<CardRecord> {
        match self {
            TrackError::Field { card, .. } => Some(*card),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_long_display() {
        let err = TrackError::Decode(Violation::TooLong { len: 80, max: 79 });
        let s = err.to_string();
        assert!(s.contains("invalid track format"));
        assert!(s.contains("length 80 exceeds maximum of 79"));
    }

    #[test]
    fn field_error_exposes_partial_card() {
        let card = CardRecord::new("4111111111111111");
        let err = TrackError::Field {
            field: Field::ExpirationDate,
            value: "2599".into(),
            source: ExpiryError::Month(99),
            card: Box::new(card.clone()),
        };
        assert_eq!(
            err.to_string(),
            "invalid expiration date \"2599\": month 99 is out of range 1..=12"
        );
        assert_eq!(err.partial_card(), Some(&card));
        assert_eq!(err.into_partial_card(), Some(card));
        assert!(TrackError::Encode(Violation::Grammar).partial_card().is_none());
    }
}
