//! Contact email address.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// Nothing left after trimming.
    #[error("email is required")]
    Empty,
    /// Longer than [`Email::MAX_LENGTH`] characters.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// The limit that was exceeded.
        max: usize,
    },
    /// Whitespace inside the address.
    #[error("email cannot contain spaces")]
    ContainsWhitespace,
    /// No `@` at all.
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    /// More than one `@`.
    #[error("email must contain a single @ symbol")]
    MultipleAtSymbols,
    /// Nothing before the `@`.
    #[error("email is missing the part before the @")]
    EmptyLocalPart,
    /// Domain is empty or has no `.` with text on both sides.
    #[error("email domain must look like example.com")]
    InvalidDomain,
}

/// A reply address left on the contact form.
///
/// Only the `local@domain.tld` shape is checked, which is all a reply
/// needs; deliverability is the mail server's problem.
///
/// ```
/// use fenet_core::Email;
///
/// assert!(Email::parse("a@b.c").is_ok());
/// assert!(Email::parse(" selam@fenetcafe.com ").is_ok());
/// assert!(Email::parse("not-an-email").is_err());
/// assert!(Email::parse("user@localhost").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Longest accepted address (RFC 5321 path limit).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an address, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns the first failed check: empty, too long, inner whitespace,
    /// `@` count, empty local part, then domain shape.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim();

        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.chars().count() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if s.contains(char::is_whitespace) {
            return Err(EmailError::ContainsWhitespace);
        }

        let mut parts = s.split('@');
        let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
            return Err(EmailError::MissingAtSymbol);
        };
        if parts.next().is_some() {
            return Err(EmailError::MultipleAtSymbols);
        }
        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        // Any dot that is neither the first nor the last character will do.
        let dotted = domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + c.len_utf8() < domain.len());
        if !dotted {
            return Err(EmailError::InvalidDomain);
        }

        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}
