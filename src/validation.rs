use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

pub const MESSAGE_MIN_CHARS: usize = 5;
pub const MESSAGE_MAX_CHARS: usize = 140;

/// A message is one or more characters, none of them digits.
static MESSAGE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^0-9]+$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Message is required")]
    MissingMessage,

    #[error("Numbers are not allowed")]
    MessageContainsDigits,

    #[error("Message is too short: {actual} characters (min: {min})")]
    MessageTooShort { actual: usize, min: usize },

    #[error("Message is too long: {actual} characters (max: {max})")]
    MessageTooLong { actual: usize, max: usize },

    #[error("Hearts cannot be negative: {0}")]
    NegativeHearts(i64),
}

impl ValidationError {
    /// The Thought field the violation belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::NegativeHearts(_) => "hearts",
            _ => "message",
        }
    }
}

pub fn validate_message(message: Option<&str>) -> Result<&str, ValidationError> {
    let message = match message {
        Some(m) if !m.is_empty() => m,
        _ => return Err(ValidationError::MissingMessage),
    };

    if !MESSAGE_PATTERN.is_match(message) {
        return Err(ValidationError::MessageContainsDigits);
    }

    let length = message.chars().count();
    if length < MESSAGE_MIN_CHARS {
        return Err(ValidationError::MessageTooShort {
            actual: length,
            min: MESSAGE_MIN_CHARS,
        });
    }
    if length > MESSAGE_MAX_CHARS {
        return Err(ValidationError::MessageTooLong {
            actual: length,
            max: MESSAGE_MAX_CHARS,
        });
    }

    Ok(message)
}

pub fn validate_hearts(hearts: i64) -> Result<i64, ValidationError> {
    if hearts < 0 {
        return Err(ValidationError::NegativeHearts(hearts));
    }
    Ok(hearts)
}
