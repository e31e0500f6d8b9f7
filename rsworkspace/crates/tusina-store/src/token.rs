//! Lookup token value object.
//!
//! A token is an opaque capability reference into the record store.
//! Accepted shape: `[A-Za-z0-9_-]{12,64}`.

use std::fmt;

/// Shortest accepted token, in bytes.
pub const MIN_TOKEN_LEN: usize = 12;
/// Longest accepted token, in bytes.
pub const MAX_TOKEN_LEN: usize = 64;

/// Errors produced when constructing a [`LookupToken`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token must not be empty")]
    Empty,

    #[error("token is {0} characters, minimum is {min}", min = MIN_TOKEN_LEN)]
    TooShort(usize),

    #[error("token is {0} characters, maximum is {max}", max = MAX_TOKEN_LEN)]
    TooLong(usize),

    #[error("token contains invalid character: {0:?}")]
    InvalidCharacter(char),
}

/// A token that passed shape validation and can be handed to a
/// [`RecordStore`](crate::RecordStore).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct LookupToken(String);

impl LookupToken {
    /// Validate a raw token string. No trimming is done here.
    pub fn new(s: impl Into<String>) -> Result<Self, TokenError> {
        let s: String = s.into();

        if s.is_empty() {
            return Err(TokenError::Empty);
        }
        // Check characters first so a multi-byte char is reported as such
        // rather than skewing the length checks below.
        if let Some(ch) = s.chars().find(|c| !is_token_char(*c)) {
            return Err(TokenError::InvalidCharacter(ch));
        }
        if s.len() < MIN_TOKEN_LEN {
            return Err(TokenError::TooShort(s.len()));
        }
        if s.len() > MAX_TOKEN_LEN {
            return Err(TokenError::TooLong(s.len()));
        }

        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

// Tokens are capabilities; keep them out of debug output.
impl fmt::Debug for LookupToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LookupToken").field(&"<redacted>").finish()
    }
}

impl fmt::Display for LookupToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LookupToken {
    type Error = TokenError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for LookupToken {
    type Error = TokenError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<LookupToken> for String {
    fn from(token: LookupToken) -> Self {
        token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_minimum_length() {
        let t = LookupToken::new("abcdefghijkl").unwrap();
        assert_eq!(t.as_str(), "abcdefghijkl");
    }

    #[test]
    fn accepts_maximum_length() {
        let raw = "a".repeat(MAX_TOKEN_LEN);
        assert!(LookupToken::new(raw).is_ok());
    }

    #[test]
    fn accepts_dash_and_underscore() {
        assert!(LookupToken::new("Ab3_-xY9_-zz").is_ok());
    }

    #[test]
    fn empty_is_rejected() {
        assert_eq!(LookupToken::new("").unwrap_err(), TokenError::Empty);
    }

    #[test]
    fn eleven_chars_is_too_short() {
        assert_eq!(
            LookupToken::new("abcdefghijk").unwrap_err(),
            TokenError::TooShort(11)
        );
    }

    #[test]
    fn sixty_five_chars_is_too_long() {
        let raw = "a".repeat(MAX_TOKEN_LEN + 1);
        assert_eq!(
            LookupToken::new(raw).unwrap_err(),
            TokenError::TooLong(65)
        );
    }

    #[test]
    fn punctuation_is_rejected() {
        assert_eq!(
            LookupToken::new("abcdefghijk.l").unwrap_err(),
            TokenError::InvalidCharacter('.')
        );
    }

    #[test]
    fn inner_whitespace_is_rejected() {
        assert_eq!(
            LookupToken::new("abcdef ghijkl").unwrap_err(),
            TokenError::InvalidCharacter(' ')
        );
    }

    #[test]
    fn non_ascii_is_reported_as_character() {
        assert_eq!(
            LookupToken::new("äbcdefghijklm").unwrap_err(),
            TokenError::InvalidCharacter('ä')
        );
    }

    #[test]
    fn debug_does_not_leak_value() {
        let t = LookupToken::new("secret_token_123").unwrap();
        assert!(!format!("{t:?}").contains("secret_token_123"));
        assert_eq!(t.to_string(), "secret_token_123");
    }

    #[test]
    fn try_from_string_validates() {
        assert!(LookupToken::try_from("abcdefghijkl".to_string()).is_ok());
        assert_eq!(
            LookupToken::try_from("short").unwrap_err(),
            TokenError::TooShort(5)
        );
    }

    #[test]
    fn error_display() {
        assert_eq!(
            TokenError::TooShort(3).to_string(),
            "token is 3 characters, minimum is 12"
        );
        assert!(TokenError::TooLong(70).to_string().contains("maximum is 64"));
        assert!(TokenError::InvalidCharacter('!').to_string().contains("'!'"));
    }
}
