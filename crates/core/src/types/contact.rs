//! Contact form submission types.
//!
//! A [`ContactSubmission`] can only be built from input that passed every
//! field rule, so the store never sees an unvalidated message.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::email::{Email, EmailError};

/// Errors that can occur when validating a contact submission.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// Name is shorter than the minimum.
    #[error("name must be at least {min} characters")]
    NameTooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// Name is longer than the maximum.
    #[error("name must be at most {max} characters")]
    NameTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// Name contains a digit.
    #[error("name cannot contain numbers")]
    NameContainsDigit,
    /// Email failed validation.
    #[error(transparent)]
    Email(#[from] EmailError),
    /// Message is shorter than the minimum.
    #[error("message must be at least {min} characters")]
    MessageTooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// Message is longer than the maximum.
    #[error("message must be at most {max} characters")]
    MessageTooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// The sender's name on a contact message.
///
/// ## Constraints
///
/// - Trimmed length: 2-80 characters
/// - No digits
///
/// ```
/// use fenet_core::ContactName;
///
/// assert!(ContactName::parse("Abebe").is_ok());
/// assert!(ContactName::parse("A").is_err());
/// assert!(ContactName::parse("R2D2").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ContactName(String);

impl ContactName {
    /// Minimum name length in characters.
    pub const MIN_LENGTH: usize = 2;
    /// Maximum name length in characters.
    pub const MAX_LENGTH: usize = 80;

    /// Parse a name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed name is outside 2-80 characters or
    /// contains a digit.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let s = s.trim();
        let len = s.chars().count();

        if len < Self::MIN_LENGTH {
            return Err(ContactError::NameTooShort {
                min: Self::MIN_LENGTH,
            });
        }
        if len > Self::MAX_LENGTH {
            return Err(ContactError::NameTooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if s.chars().any(char::is_numeric) {
            return Err(ContactError::NameContainsDigit);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The body of a contact message (trimmed length 10-2000 characters).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct MessageBody(String);

impl MessageBody {
    /// Minimum message length in characters.
    pub const MIN_LENGTH: usize = 10;
    /// Maximum message length in characters.
    pub const MAX_LENGTH: usize = 2000;

    /// Parse a message body, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed body is outside 10-2000 characters.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let s = s.trim();
        let len = s.chars().count();

        if len < Self::MIN_LENGTH {
            return Err(ContactError::MessageTooShort {
                min: Self::MIN_LENGTH,
            });
        }
        if len > Self::MAX_LENGTH {
            return Err(ContactError::MessageTooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the message as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A validated contact form submission, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    /// Sender's name.
    pub name: ContactName,
    /// Sender's email address.
    pub email: Email,
    /// Message body.
    pub message: MessageBody,
}

impl ContactSubmission {
    /// Validate raw form fields in order: name, email, message.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn parse(name: &str, email: &str, message: &str) -> Result<Self, ContactError> {
        Ok(Self {
            name: ContactName::parse(name)?,
            email: Email::parse(email)?,
            message: MessageBody::parse(message)?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const EMAIL: &str = "guest@example.com";
    const MESSAGE: &str = "Do you take reservations for ten people?";

    #[test]
    fn test_name_length_boundaries() {
        assert_eq!(
            ContactName::parse("A"),
            Err(ContactError::NameTooShort { min: 2 })
        );
        assert!(ContactName::parse("Al").is_ok());
        assert!(ContactName::parse(&"a".repeat(80)).is_ok());
        assert_eq!(
            ContactName::parse(&"a".repeat(81)),
            Err(ContactError::NameTooLong { max: 80 })
        );
    }

    #[test]
    fn test_name_length_is_measured_after_trim() {
        assert!(ContactName::parse("  A  ").is_err());
        let name = ContactName::parse("  Selam  ").unwrap();
        assert_eq!(name.as_str(), "Selam");
    }

    #[test]
    fn test_name_length_counts_characters() {
        // 80 two-byte characters
        assert!(ContactName::parse(&"é".repeat(80)).is_ok());
        assert!(ContactName::parse("ሰላም").is_ok());
    }

    #[test]
    fn test_name_with_digit_always_rejected() {
        assert_eq!(
            ContactName::parse("Abebe 2"),
            Err(ContactError::NameContainsDigit)
        );
        assert_eq!(
            ContactSubmission::parse("Agent 007", EMAIL, MESSAGE),
            Err(ContactError::NameContainsDigit)
        );
    }

    #[test]
    fn test_message_length_boundaries() {
        assert!(MessageBody::parse("too short").is_err());
        assert!(MessageBody::parse("just right").is_ok());
        assert!(MessageBody::parse(&"m".repeat(2000)).is_ok());
        assert_eq!(
            MessageBody::parse(&"m".repeat(2001)),
            Err(ContactError::MessageTooLong { max: 2000 })
        );
    }

    #[test]
    fn test_submission_reports_email_error() {
        let err = ContactSubmission::parse("Abebe", "not-an-email", MESSAGE).unwrap_err();
        assert_eq!(err, ContactError::Email(EmailError::MissingAtSymbol));
        assert_eq!(err.to_string(), "email must contain an @ symbol");
    }

    #[test]
    fn test_submission_trims_every_field() {
        let submission =
            ContactSubmission::parse(" Abebe ", " guest@example.com ", "  Hello from Gelan!  ")
                .unwrap();
        assert_eq!(submission.name.as_str(), "Abebe");
        assert_eq!(submission.email.as_str(), "guest@example.com");
        assert_eq!(submission.message.as_str(), "Hello from Gelan!");
    }

    #[test]
    fn test_error_messages_name_the_constraint() {
        assert_eq!(
            ContactError::NameTooShort { min: 2 }.to_string(),
            "name must be at least 2 characters"
        );
        assert_eq!(
            ContactError::MessageTooShort { min: 10 }.to_string(),
            "message must be at least 10 characters"
        );
    }
}
