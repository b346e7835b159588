use std::fmt;

use serde::{Deserialize, Serialize};

/// Payment network inferred from the leading digits of an account number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    #[default]
    Unknown,
    Visa,
    MasterCard,
    AmericanExpress,
    Discover,
    DinersClub,
    Jcb,
    UnionPay,
    Maestro,
}

/// Inclusive range over the first `digits` digits of the account number.
struct IinRange {
    digits: usize,
    low: u32,
    high: u32,
    card_type: CardType,
}

macro_rules! iin {
    ($digits:expr, $low:expr, $high:expr, $card:ident) => {
        IinRange {
            digits: $digits,
            low: $low,
            high: $high,
            card_type: CardType::$card,
        }
    };
}

// First match wins, so narrower ranges sit ahead of the prefixes they overlap.
static IIN_TABLE: &[IinRange] = &[
    iin!(2, 34, 34, AmericanExpress),
    iin!(2, 37, 37, AmericanExpress),
    iin!(3, 300, 305, DinersClub),
    iin!(3, 309, 309, DinersClub),
    iin!(2, 36, 36, DinersClub),
    iin!(2, 38, 39, DinersClub),
    iin!(4, 3528, 3589, Jcb),
    iin!(1, 4, 4, Visa),
    iin!(2, 51, 55, MasterCard),
    iin!(4, 2221, 2720, MasterCard),
    iin!(4, 5018, 5018, Maestro),
    iin!(4, 5020, 5020, Maestro),
    iin!(4, 5038, 5038, Maestro),
    iin!(4, 5893, 5893, Maestro),
    iin!(4, 6304, 6304, Maestro),
    iin!(4, 6759, 6759, Maestro),
    iin!(4, 6761, 6763, Maestro),
    iin!(4, 6011, 6011, Discover),
    iin!(6, 622126, 622925, Discover),
    iin!(3, 644, 649, Discover),
    iin!(2, 65, 65, Discover),
    iin!(2, 62, 62, UnionPay),
];

impl CardType {
    /// Classify an account number by its issuer identification prefix.
    ///
    /// Anything that is not all digits, or matches no known range, is
    /// [`CardType::Unknown`]. No check digit validation is performed.
    pub fn classify(pan: &str) -> Self {
        let pan = pan.trim();
        if pan.is_empty() || !pan.bytes().all(|b| b.is_ascii_digit()) {
            return CardType::Unknown;
        }
        IIN_TABLE
            .iter()
            .find(|range| {
                pan.get(..range.digits)
                    .and_then(|prefix| prefix.parse::<u32>().ok())
                    .is_some_and(|prefix| (range.low..=range.high).contains(&prefix))
            })
            .map(|range| range.card_type)
            .unwrap_or_default()
    }

    pub fn name(&self) -> &'static str {
        match self {
            CardType::Unknown => "Unknown",
            CardType::Visa => "Visa",
            CardType::MasterCard => "MasterCard",
            CardType::AmericanExpress => "American Express",
            CardType::Discover => "Discover",
            CardType::DinersClub => "Diners Club",
            CardType::Jcb => "JCB",
            CardType::UnionPay => "UnionPay",
            CardType::Maestro => "Maestro",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_major_networks() {
        assert_eq!(CardType::classify("4111111111111111"), CardType::Visa);
        assert_eq!(CardType::classify("5500005555555559"), CardType::MasterCard);
        assert_eq!(CardType::classify("2223000048410010"), CardType::MasterCard);
        assert_eq!(CardType::classify("378282246310005"), CardType::AmericanExpress);
        assert_eq!(CardType::classify("6011111111111117"), CardType::Discover);
        assert_eq!(CardType::classify("30569309025904"), CardType::DinersClub);
        assert_eq!(CardType::classify("3530111333300000"), CardType::Jcb);
        assert_eq!(CardType::classify("6200000000000005"), CardType::UnionPay);
        assert_eq!(CardType::classify("6759649826438453"), CardType::Maestro);
    }

    #[test]
    fn discover_cobrand_range_beats_unionpay_prefix() {
        assert_eq!(CardType::classify("6221260000000000"), CardType::Discover);
        assert_eq!(CardType::classify("6229260000000000"), CardType::UnionPay);
    }

    #[test]
    fn unknown_for_garbage_and_short_input() {
        assert_eq!(CardType::classify(""), CardType::Unknown);
        assert_eq!(CardType::classify("4111-1111"), CardType::Unknown);
        assert_eq!(CardType::classify("9999999999999999"), CardType::Unknown);
        assert_eq!(CardType::classify("3"), CardType::Unknown);
    }

    #[test]
    fn display_uses_network_name() {
        assert_eq!(CardType::AmericanExpress.to_string(), "American Express");
        assert_eq!(
            serde_json::to_string(&CardType::MasterCard).unwrap(),
            "\"master_card\""
        );
    }
}
