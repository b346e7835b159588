//! Magnetic-stripe card data encoding and decoding.

pub mod card;
pub mod error;
pub mod pattern;
pub mod track;

pub use card::{CardRecord, CardType, ExpiryDate, ExpiryError, mask_pan};
pub use error::{Result, TrackError, Violation};
pub use pattern::{PatternError, PatternGenerator, PatternMatcher, RegexPattern};
pub use track::{
    FIXED_NAME_WIDTH, Field, PLACEHOLDER, TRACK1_GRAMMAR, TRACK1_MAX_LENGTH, Track, Track1,
    Track1Options, is_absent,
};

/// Encode a card as Track 1 with a freshly compiled codec.
///
/// Callers encoding many cards should build one [`Track1`] and reuse it.
pub fn encode_track1(card: &CardRecord, options: Track1Options) -> Result<Vec<u8>> {
    Track1::new(options)?.write(card)
}

/// Decode raw Track 1 data with a freshly compiled codec.
pub fn decode_track1(raw: &[u8]) -> Result<CardRecord> {
    Track1::new(Track1Options::default())?.read(raw)
}
