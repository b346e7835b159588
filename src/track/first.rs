use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::{Field, PLACEHOLDER, Track, is_absent};
use crate::card::{CardRecord, CardType, ExpiryDate, ExpiryError};
use crate::error::{Result, TrackError, Violation};
use crate::pattern::{PatternGenerator, PatternMatcher, RegexPattern};

/// ISO/IEC 7813 Track 1:
/// `%` start sentinel, format code, account number, `^`, name, `^`,
/// expiry (YYMM), service code, discretionary data, `?` end sentinel.
/// Every field position also accepts the `^` placeholder.
pub const TRACK1_GRAMMAR: &str =
    r"^%([A-Z]|\^)([0-9]{1,19}|\^)\^([^\^?]{2,26}|\^)\^([0-9]{4}|\^)([0-9]{3}|\^)([^?]*)\?$";

/// Track 1 capacity in bytes, sentinels included.
pub const TRACK1_MAX_LENGTH: usize = 79;

/// Width of the name field when fixed-length mode is on.
pub const FIXED_NAME_WIDTH: usize = 26;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track1Options {
    /// Pad or truncate a non-empty name to [`FIXED_NAME_WIDTH`] characters.
    #[serde(default)]
    pub fixed_length: bool,
}

/// Track 1 (IATA, alphanumeric) codec.
///
/// Holds the compiled grammar and its options; both are read-only after
/// construction, so one instance can serve any number of threads.
#[derive(Debug, Clone)]
pub struct Track1<P = RegexPattern> {
    engine: P,
    options: Track1Options,
}

impl Track1<RegexPattern> {
    pub fn new(options: Track1Options) -> Result<Self> {
        let engine = RegexPattern::new(TRACK1_GRAMMAR)?;
        Ok(Self::with_engine(engine, options))
    }
}

impl<P> Track1<P> {
    /// Build a codec around an already compiled Track 1 grammar engine.
    pub fn with_engine(engine: P, options: Track1Options) -> Self {
        Self { engine, options }
    }

    pub fn options(&self) -> Track1Options {
        self.options
    }

    /// Text written for `field`, before placeholder substitution.
    fn resolve(&self, card: &CardRecord, field: Field) -> String {
        match field {
            Field::FormatCode => card.format_code.clone(),
            Field::PrimaryAccountNumber => card.primary_account_number.clone(),
            Field::Name if self.options.fixed_length && !card.name.is_empty() => {
                format!("{:<width$.width$}", card.name, width = FIXED_NAME_WIDTH)
            }
            Field::Name => card.name.clone(),
            Field::ExpirationDate => card
                .expiration_date
                .map(|date| date.to_string())
                .unwrap_or_default(),
            Field::ServiceCode => card.service_code.clone(),
            Field::DiscretionaryData => card.discretionary_data.clone(),
        }
    }
}

impl<P> Track for Track1<P>
where
    P: PatternGenerator + PatternMatcher,
{
    fn name(&self) -> &'static str {
        "Track 1"
    }

    fn write(&self, card: &CardRecord) -> Result<Vec<u8>> {
        let raw = self.engine.generate(|index, _name| {
            let value = Field::from_group(index)
                .map(|field| self.resolve(card, field))
                .unwrap_or_default();
            if is_absent(&value) {
                PLACEHOLDER.to_string()
            } else {
                value
            }
        });

        // The generator substitutes values without checking them.
        if !self.engine.is_match(&raw) {
            debug!("track 1 for {} does not match grammar", card.masked_pan());
            return Err(TrackError::Encode(Violation::Grammar));
        }
        if raw.len() > TRACK1_MAX_LENGTH {
            debug!(
                "track 1 for {} is {} bytes, limit {}",
                card.masked_pan(),
                raw.len(),
                TRACK1_MAX_LENGTH
            );
            return Err(TrackError::Encode(Violation::TooLong {
                len: raw.len(),
                max: TRACK1_MAX_LENGTH,
            }));
        }

        trace!("wrote track 1 for {} ({} bytes)", card.masked_pan(), raw.len());
        Ok(raw.into_bytes())
    }

    fn read(&self, raw: &[u8]) -> Result<CardRecord> {
        if raw.len() > TRACK1_MAX_LENGTH {
            return Err(TrackError::Decode(Violation::TooLong {
                len: raw.len(),
                max: TRACK1_MAX_LENGTH,
            }));
        }
        let text = std::str::from_utf8(raw).map_err(|_| TrackError::Decode(Violation::Utf8))?;
        let groups = self
            .engine
            .captures(text)
            .ok_or(TrackError::Decode(Violation::Grammar))?;

        let mut card = CardRecord::default();
        let mut failure = None;
        for (index, group) in groups.iter().enumerate().skip(1) {
            let (Some(field), Some(value)) = (Field::from_group(index), group.as_deref()) else {
                continue;
            };
            if is_absent(value) {
                continue;
            }
            if let Err(source) = assign(&mut card, field, value.trim()) {
                failure = Some((field, value.trim().to_string(), source));
            }
        }

        if let Some((field, value, source)) = failure {
            debug!("track 1 for {}: invalid {}: {}", card.masked_pan(), field, source);
            return Err(TrackError::Field {
                field,
                value,
                source,
                card: Box::new(card),
            });
        }

        trace!("read track 1 for {} ({})", card.masked_pan(), card.card_type);
        Ok(card)
    }
}

fn assign(
    card: &mut CardRecord,
    field: Field,
    value: &str,
) -> std::result::Result<(), ExpiryError> {
    match field {
        Field::FormatCode => card.format_code = value.to_string(),
        Field::PrimaryAccountNumber => {
            card.primary_account_number = value.to_string();
            card.card_type = CardType::classify(value);
        }
        Field::Name => card.name = value.to_string(),
        Field::ExpirationDate => card.expiration_date = Some(value.parse::<ExpiryDate>()?),
        Field::ServiceCode => card.service_code = value.to_string(),
        Field::DiscretionaryData => card.discretionary_data = value.to_string(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Joins group values with `|`; matches anything with exactly six fields.
    struct FakeEngine {
        accept: bool,
    }

    impl PatternGenerator for FakeEngine {
        fn generate<F>(&self, mut resolve: F) -> String
        where
            F: FnMut(usize, Option<&str>) -> String,
        {
            (1..=6)
                .map(|index| resolve(index, None))
                .collect::<Vec<_>>()
                .join("|")
        }
    }

    impl PatternMatcher for FakeEngine {
        fn captures(&self, input: &str) -> Option<Vec<Option<String>>> {
            let parts: Vec<&str> = input.split('|').collect();
            if !self.accept || parts.len() != 6 {
                return None;
            }
            let mut groups = vec![Some(input.to_string())];
            groups.extend(parts.into_iter().map(|p| Some(p.to_string())));
            Some(groups)
        }
    }

    fn fake(accept: bool, fixed_length: bool) -> Track1<FakeEngine> {
        Track1::with_engine(FakeEngine { accept }, Track1Options { fixed_length })
    }

    fn sample() -> CardRecord {
        CardRecord {
            format_code: "B".into(),
            primary_account_number: "4111111111111111".into(),
            card_type: CardType::Unknown,
            name: "DOE/JOHN".into(),
            expiration_date: Some("2512".parse().unwrap()),
            service_code: "101".into(),
            discretionary_data: "0000".into(),
        }
    }

    #[test]
    fn resolver_fills_fields_in_group_order() {
        let raw = fake(true, false).write(&sample()).unwrap();
        assert_eq!(raw, b"B|4111111111111111|DOE/JOHN|2512|101|0000");
    }

    #[test]
    fn empty_fields_become_placeholders() {
        let card = CardRecord {
            primary_account_number: "4111111111111111".into(),
            ..CardRecord::default()
        };
        let raw = fake(true, false).write(&card).unwrap();
        assert_eq!(raw, b"^|4111111111111111|^|^|^|^");
    }

    #[test]
    fn fixed_length_pads_and_truncates_name() {
        let codec = fake(true, true);
        let raw = String::from_utf8(codec.write(&sample()).unwrap()).unwrap();
        let name = raw.split('|').nth(2).unwrap();
        assert_eq!(name, format!("{:<26}", "DOE/JOHN"));

        let mut long = sample();
        long.name = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123".into();
        let raw = String::from_utf8(codec.write(&long).unwrap()).unwrap();
        assert_eq!(raw.split('|').nth(2), Some("ABCDEFGHIJKLMNOPQRSTUVWXYZ"));

        let mut unnamed = sample();
        unnamed.name.clear();
        let raw = String::from_utf8(codec.write(&unnamed).unwrap()).unwrap();
        assert_eq!(raw.split('|').nth(2), Some("^"));
    }

    #[test]
    fn write_rechecks_generated_output() {
        let err = fake(false, false).write(&sample()).unwrap_err();
        assert!(matches!(err, TrackError::Encode(Violation::Grammar)));
    }

    #[test]
    fn read_maps_groups_and_classifies() {
        let card = fake(true, false)
            .read(b" B |4111111111111111|DOE/JOHN   |2512|^|")
            .unwrap();
        assert_eq!(card.format_code, "B");
        assert_eq!(card.card_type, CardType::Visa);
        assert_eq!(card.name, "DOE/JOHN");
        assert_eq!(card.expiration_date.map(|d| d.to_string()).as_deref(), Some("2512"));
        assert!(card.service_code.is_empty());
        assert!(card.discretionary_data.is_empty());
    }

    #[test]
    fn read_keeps_other_fields_when_expiry_is_bad() {
        let err = fake(true, false)
            .read(b"B|4111111111111111|DOE/JOHN|2599|101|0000")
            .unwrap_err();
        match &err {
            TrackError::Field { field, value, .. } => {
                assert_eq!(*field, Field::ExpirationDate);
                assert_eq!(value, "2599");
            }
            other => panic!("unexpected error: {other}"),
        }
        let card = err.into_partial_card().unwrap();
        assert_eq!(card.service_code, "101");
        assert_eq!(card.discretionary_data, "0000");
        assert_eq!(card.expiration_date, None);
    }

    #[test]
    fn read_rejects_before_matching_when_too_long() {
        let raw = vec![b'|'; TRACK1_MAX_LENGTH + 1];
        let err = fake(true, false).read(&raw).unwrap_err();
        assert!(matches!(
            err,
            TrackError::Decode(Violation::TooLong { len: 80, max: 79 })
        ));
    }

    #[test]
    fn read_rejects_invalid_utf8() {
        let err = fake(true, false).read(&[0xff, b'|']).unwrap_err();
        assert!(matches!(err, TrackError::Decode(Violation::Utf8)));
    }
}
