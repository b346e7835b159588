//! Grammar-driven string generation and matching.
//!
//! A grammar is compiled once into a [`RegexPattern`], which can both
//! synthesize a conforming string (asking a resolver for the text of every
//! capture group) and match a candidate string, returning its groups.
//!
//! The codec only depends on the two traits below, so tests can swap in a
//! deterministic fake.

mod compiled;

pub use self::compiled::{PatternError, RegexPattern};

/// Synthesizes strings that satisfy a compiled grammar.
pub trait PatternGenerator {
    /// Generate a string for the grammar.
    ///
    /// `resolve` is called for each capture group reached, in grammar order, with the
    /// group's 1-based index and optional name. Its return value is emitted
    /// verbatim in place of the group's sub-pattern.
    fn generate<F>(&self, resolve: F) -> String
    where
        F: FnMut(usize, Option<&str>) -> String;
}

/// Matches candidate strings against a compiled grammar.
pub trait PatternMatcher {
    /// Match `input` and return every group, index 0 being the whole match.
    /// Groups that did not participate in the match are `None`.
    fn captures(&self, input: &str) -> Option<Vec<Option<String>>>;

    fn is_match(&self, input: &str) -> bool {
        self.captures(input).is_some()
    }
}
