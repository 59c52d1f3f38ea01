//! Short key value type.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of symbols in every short key.
pub const KEY_LENGTH: usize = 7;

/// The 62 symbols a short key may contain.
pub const KEY_ALPHABET: &[u8; 62] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Rejection reason for a string that is not a well-formed short key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidShortKey {
    #[error("short key must be {KEY_LENGTH} characters, got {0}")]
    Length(usize),
    #[error("short key contains a character outside [a-zA-Z0-9]: {0:?}")]
    Character(char),
}

/// A validated short key.
///
/// Keys are exactly [`KEY_LENGTH`] characters drawn from [`KEY_ALPHABET`].
/// They are public identifiers, not secrets.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShortKey(String);

impl ShortKey {
    /// Parses and validates a short key.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidShortKey`] if the length is wrong or a character falls
    /// outside the alphabet.
    pub fn parse(key: impl Into<String>) -> Result<Self, InvalidShortKey> {
        let key = key.into();
        let len = key.chars().count();
        if len != KEY_LENGTH {
            return Err(InvalidShortKey::Length(len));
        }
        if let Some(bad) = key.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(InvalidShortKey::Character(bad));
        }
        Ok(Self(key))
    }

    /// Wraps a key without validation.
    ///
    /// Use this only for keys produced by trusted internal sources
    /// (the key generator, rows read back from the store).
    pub fn new_unchecked(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key, returning the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Builds the public short URL for this key under `base_url`.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }
}

impl fmt::Display for ShortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ShortKey {
    type Err = InvalidShortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_has_62_distinct_symbols() {
        let mut symbols = KEY_ALPHABET.to_vec();
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), 62);
        assert!(symbols.iter().all(|b| b.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_parse_valid_key() {
        let key = ShortKey::parse("aB3xY9z").unwrap();
        assert_eq!(key.as_str(), "aB3xY9z");
        assert_eq!(key.to_string(), "aB3xY9z");
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(ShortKey::parse("abc"), Err(InvalidShortKey::Length(3)));
        assert_eq!(ShortKey::parse("abcdefgh"), Err(InvalidShortKey::Length(8)));
        assert_eq!(ShortKey::parse(""), Err(InvalidShortKey::Length(0)));
    }

    #[test]
    fn test_parse_rejects_symbols_outside_alphabet() {
        assert_eq!(
            ShortKey::parse("abc-def"),
            Err(InvalidShortKey::Character('-'))
        );
        assert!(ShortKey::parse("abc_def").is_err());
        assert!(ShortKey::parse("abcdéfg").is_err());
    }

    #[test]
    fn test_to_url_joins_with_single_slash() {
        let key = ShortKey::new_unchecked("abc1234");
        assert_eq!(
            key.to_url("http://localhost:8080"),
            "http://localhost:8080/abc1234"
        );
        assert_eq!(key.to_url("https://s.example.com/"), "https://s.example.com/abc1234");
    }

    #[test]
    fn test_from_str() {
        let key: ShortKey = "Zz00Zz0".parse().unwrap();
        assert_eq!(key.into_inner(), "Zz00Zz0");
    }
}
