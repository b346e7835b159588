use regex::Regex;
use regex_syntax::hir::{Class, Hir, HirKind};
use thiserror::Error;

use super::{PatternGenerator, PatternMatcher};

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid grammar: {0}")]
    Syntax(#[from] regex_syntax::Error),
    #[error("invalid grammar: {0}")]
    Compile(#[from] regex::Error),
}

/// A regular grammar compiled for both matching and generation.
///
/// Generation is deterministic:
/// - literals are emitted verbatim and anchors emit nothing
/// - a class emits its first printable member
/// - a repetition emits its sub-pattern the minimum number of times
/// - an alternation emits its first branch
/// - a capture group emits whatever the resolver returns
#[derive(Debug, Clone)]
pub struct RegexPattern {
    source: String,
    regex: Regex,
    hir: Hir,
}

impl RegexPattern {
    pub fn new(grammar: &str) -> Result<Self, PatternError> {
        let hir = regex_syntax::Parser::new().parse(grammar)?;
        let regex = Regex::new(grammar)?;
        Ok(Self {
            source: grammar.to_string(),
            regex,
            hir,
        })
    }

    /// The grammar this pattern was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of capture groups, not counting the implicit whole-match group.
    pub fn group_count(&self) -> usize {
        self.regex.captures_len().saturating_sub(1)
    }
}

impl PatternGenerator for RegexPattern {
    fn generate<F>(&self, mut resolve: F) -> String
    where
        F: FnMut(usize, Option<&str>) -> String,
    {
        let mut out = String::new();
        emit(&self.hir, &mut resolve, &mut out);
        out
    }
}

impl PatternMatcher for RegexPattern {
    fn captures(&self, input: &str) -> Option<Vec<Option<String>>> {
        let caps = self.regex.captures(input)?;
        Some(
            caps.iter()
                .map(|group| group.map(|m| m.as_str().to_string()))
                .collect(),
        )
    }

    fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }
}

fn emit<F>(hir: &Hir, resolve: &mut F, out: &mut String)
where
    F: FnMut(usize, Option<&str>) -> String,
{
    match hir.kind() {
        HirKind::Empty | HirKind::Look(_) => {}
        HirKind::Literal(lit) => out.push_str(&String::from_utf8_lossy(&lit.0)),
        HirKind::Class(class) => {
            if let Some(ch) = pick_class_char(class) {
                out.push(ch);
            }
        }
        HirKind::Repetition(rep) => {
            for _ in 0..rep.min {
                emit(&rep.sub, resolve, out);
            }
        }
        HirKind::Capture(cap) => {
            let value = resolve(cap.index as usize, cap.name.as_deref());
            out.push_str(&value);
        }
        HirKind::Concat(items) => {
            for item in items {
                emit(item, resolve, out);
            }
        }
        HirKind::Alternation(branches) => {
            if let Some(first) = branches.first() {
                emit(first, resolve, out);
            }
        }
    }
}

/// First visible ASCII member of the class, falling back to the lowest member.
/// An empty class (one that can never match) yields nothing.
fn pick_class_char(class: &Class) -> Option<char> {
    const VISIBLE: (char, char) = ('!', '~');
    match class {
        Class::Unicode(cls) => {
            let visible = cls.ranges().iter().find_map(|r| {
                let lo = r.start().max(VISIBLE.0);
                (lo <= r.end() && lo <= VISIBLE.1).then_some(lo)
            });
            visible.or_else(|| cls.ranges().first().map(|r| r.start()))
        }
        Class::Bytes(cls) => {
            let visible = cls.ranges().iter().find_map(|r| {
                let lo = r.start().max(VISIBLE.0 as u8);
                (lo <= r.end() && lo <= VISIBLE.1 as u8).then_some(lo)
            });
            visible
                .or_else(|| cls.ranges().first().map(|r| r.start()))
                .map(char::from)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_minimal_string_for_plain_grammar() {
        let pattern = RegexPattern::new(r"^ab[0-9]{3}(?:x|y)[^?]$").unwrap();
        let out = pattern.generate(|_, _| unreachable!("no capture groups"));
        assert_eq!(out, "ab000x!");
        assert!(pattern.is_match(&out));
    }

    #[test]
    fn capture_groups_take_resolver_values_in_order() {
        let pattern = RegexPattern::new(r"^%([A-Z])-(?P<digits>[0-9]+)\?$").unwrap();
        let mut seen = Vec::new();
        let out = pattern.generate(|index, name| {
            seen.push((index, name.map(str::to_string)));
            match index {
                1 => "Q".to_string(),
                _ => "1234".to_string(),
            }
        });
        assert_eq!(out, "%Q-1234?");
        assert_eq!(seen, vec![(1, None), (2, Some("digits".to_string()))]);
    }

    #[test]
    fn resolver_value_is_not_checked_by_generation() {
        let pattern = RegexPattern::new(r"^([0-9]{2})$").unwrap();
        let out = pattern.generate(|_, _| "abc".to_string());
        assert_eq!(out, "abc");
        assert!(!pattern.is_match(&out));
    }

    #[test]
    fn captures_include_whole_match_and_missing_groups() {
        let pattern = RegexPattern::new(r"^(a)(b)?(c)$").unwrap();
        let groups = pattern.captures("ac").unwrap();
        assert_eq!(
            groups,
            vec![
                Some("ac".to_string()),
                Some("a".to_string()),
                None,
                Some("c".to_string())
            ]
        );
        assert_eq!(pattern.group_count(), 3);
        assert!(pattern.captures("abx").is_none());
    }

    #[test]
    fn rejects_invalid_grammar() {
        let err = RegexPattern::new(r"^(unclosed$").unwrap_err();
        assert!(err.to_string().starts_with("invalid grammar"));
    }
}
