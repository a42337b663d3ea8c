//! Byte patterns with nibble-level wildcards.
//!
//! A pattern is written as pairs of hex digits, one pair per byte. Either
//! digit of a pair may be replaced by `?`:
//!
//! - `4D` matches exactly `0x4D`
//! - `4?` matches any byte whose high nibble is `4`
//! - `?D` matches any byte whose low nibble is `D`
//! - `??` matches any byte

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Wildcard marker accepted in place of a hex digit
pub const WILDCARD: char = '?';

/// Comparison rule for a single byte position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteMatcher {
    /// Both nibbles fixed
    Exact(u8),
    /// Only the high nibble is fixed (`4?`)
    High(u8),
    /// Only the low nibble is fixed (`?D`)
    Low(u8),
    /// Any byte (`??`)
    Any,
}

impl ByteMatcher {
    fn from_nibbles(high: Option<u8>, low: Option<u8>) -> Self {
        match (high, low) {
            (Some(h), Some(l)) => Self::Exact((h << 4) | l),
            (Some(h), None) => Self::High(h),
            (None, Some(l)) => Self::Low(l),
            (None, None) => Self::Any,
        }
    }

    pub fn matches(self, byte: u8) -> bool {
        match self {
            Self::Exact(value) => byte == value,
            Self::High(nibble) => (byte >> 4) & 0x0F == nibble,
            Self::Low(nibble) => byte & 0x0F == nibble,
            Self::Any => true,
        }
    }
}

impl fmt::Display for ByteMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(value) => write!(f, "{:02X}", value),
            Self::High(nibble) => write!(f, "{:X}{}", nibble, WILDCARD),
            Self::Low(nibble) => write!(f, "{}{:X}", WILDCARD, nibble),
            Self::Any => write!(f, "{0}{0}", WILDCARD),
        }
    }
}

/// `Some(None)` for the wildcard marker, `None` for anything that is not a nibble.
fn parse_nibble(c: char) -> Option<Option<u8>> {
    if c == WILDCARD {
        return Some(None);
    }
    c.to_digit(16).map(|d| Some(d as u8))
}

/// Parse a hex-and-wildcard string into byte matchers.
pub fn parse_pattern(pattern: &str) -> Result<Vec<ByteMatcher>> {
    let chars: Vec<char> = pattern.chars().collect();

    if chars.len() % 2 != 0 {
        return Err(Error::malformed(
            pattern,
            format!("length {} is not a multiple of 2", chars.len()),
        ));
    }

    let mut nibbles = Vec::with_capacity(chars.len());
    for (index, &c) in chars.iter().enumerate() {
        let nibble = parse_nibble(c).ok_or_else(|| {
            Error::malformed(
                pattern,
                format!(
                    "invalid character '{}' at index {}, only hex digits and '{}' are allowed",
                    c, index, WILDCARD
                ),
            )
        })?;
        nibbles.push(nibble);
    }

    Ok(nibbles
        .chunks_exact(2)
        .map(|pair| ByteMatcher::from_nibbles(pair[0], pair[1]))
        .collect())
}

pub fn format_pattern(matchers: &[ByteMatcher]) -> String {
    matchers.iter().map(ByteMatcher::to_string).collect()
}

/// A parsed pattern together with the text it was parsed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BytePattern {
    source: String,
    matchers: Vec<ByteMatcher>,
}

impl BytePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            source: pattern.to_string(),
            matchers: parse_pattern(pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matchers(&self) -> &[ByteMatcher] {
        &self.matchers
    }

    /// Number of bytes the pattern covers
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Check `data` against the pattern, stopping at the first mismatch.
    pub fn matches(&self, data: &[u8]) -> bool {
        data.len() == self.matchers.len()
            && self
                .matchers
                .iter()
                .zip(data)
                .all(|(matcher, &byte)| matcher.matches(byte))
    }
}

impl FromStr for BytePattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for BytePattern {
    type Error = Error;

    fn try_from(source: String) -> Result<Self> {
        let matchers = parse_pattern(&source)?;
        Ok(Self { source, matchers })
    }
}

impl From<BytePattern> for String {
    fn from(pattern: BytePattern) -> Self {
        pattern.source
    }
}

impl fmt::Display for BytePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_pattern(&self.matchers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pattern_with_wildcards() {
        let matchers = parse_pattern("4D5A??9?").unwrap();
        assert_eq!(matchers.len(), 4);
        assert_eq!(matchers[0], ByteMatcher::Exact(0x4D));
        assert_eq!(matchers[1], ByteMatcher::Exact(0x5A));
        assert_eq!(matchers[2], ByteMatcher::Any);
        assert_eq!(matchers[3], ByteMatcher::High(0x9));
    }

    #[test]
    fn test_parse_pattern_is_case_insensitive() {
        assert_eq!(parse_pattern("ff").unwrap(), parse_pattern("FF").unwrap());
        assert_eq!(parse_pattern("?a").unwrap(), vec![ByteMatcher::Low(0xA)]);
    }

    #[test]
    fn test_parse_pattern_odd_length() {
        let err = parse_pattern("4D5").unwrap_err();
        assert!(matches!(err, Error::MalformedPattern { .. }));
    }

    #[test]
    fn test_parse_pattern_invalid_character() {
        for bad in ["4G", "4 ", "*D", "0x"] {
            let err = parse_pattern(bad).unwrap_err();
            assert!(
                matches!(err, Error::MalformedPattern { .. }),
                "expected failure for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_empty_pattern() {
        assert!(parse_pattern("").unwrap().is_empty());
    }

    #[test]
    fn test_exact_matches_single_value() {
        let matcher = parse_pattern("4D").unwrap()[0];
        for byte in 0..=u8::MAX {
            assert_eq!(matcher.matches(byte), byte == 0x4D, "byte {:#04x}", byte);
        }
    }

    #[test]
    fn test_low_nibble_constraint() {
        let matcher = parse_pattern("?D").unwrap()[0];
        for high in 0..=0xFu8 {
            assert!(matcher.matches((high << 4) | 0xD));
            assert!(!matcher.matches((high << 4) | 0xC));
        }
    }

    #[test]
    fn test_high_nibble_constraint() {
        let matcher = parse_pattern("4?").unwrap()[0];
        for low in 0..=0xFu8 {
            assert!(matcher.matches(0x40 | low));
            assert!(!matcher.matches(0x50 | low));
        }
    }

    #[test]
    fn test_full_wildcard_matches_everything() {
        let matcher = parse_pattern("??").unwrap()[0];
        assert!((0..=u8::MAX).all(|byte| matcher.matches(byte)));
    }

    #[test]
    fn test_wildcard_nibbles_are_ignored() {
        let pattern = BytePattern::new("47?9?F??").unwrap();
        for fill in [0x0u8, 0x7, 0xF] {
            let data = [0x47, (fill << 4) | 0x9, (fill << 4) | 0xF, fill * 0x11];
            assert!(pattern.matches(&data));
        }
        assert!(!pattern.matches(&[0x47, 0x98, 0x0F, 0x00]));
    }

    #[test]
    fn test_pattern_length_mismatch() {
        let pattern = BytePattern::new("0102").unwrap();
        assert!(!pattern.matches(&[0x01]));
        assert!(!pattern.matches(&[0x01, 0x02, 0x03]));
        assert!(pattern.matches(&[0x01, 0x02]));
    }

    #[test]
    fn test_format_pattern() {
        let matchers = vec![
            ByteMatcher::Exact(0x89),
            ByteMatcher::High(0x3),
            ByteMatcher::Low(0xD),
            ByteMatcher::Any,
        ];
        assert_eq!(format_pattern(&matchers), "893??D??");
    }

    #[test]
    fn test_byte_pattern_keeps_source() {
        let pattern: BytePattern = "ff?d".parse().unwrap();
        assert_eq!(pattern.as_str(), "ff?d");
        assert_eq!(pattern.to_string(), "FF?D");
        assert_eq!(pattern.len(), 2);
    }
}
