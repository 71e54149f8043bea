//! User-name validation.
//!
//! The rule is fixed: the `nombre` field must be present, must be a string,
//! and must contain at least [`MIN_NAME_LEN`] characters once surrounding
//! whitespace is ignored. The validated value itself is kept verbatim.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Minimum number of characters in a trimmed user name.
pub const MIN_NAME_LEN: usize = 3;

const FIELD: &str = "nombre";

/// A user name that has passed [`validate_name`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidName(String);

impl ValidName {
    pub fn as_str(&self) -> &str { &self.0 }
    pub fn into_inner(self) -> String { self.0 }
}

impl fmt::Display for ValidName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a candidate name was rejected. The display text is what clients see.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ValidationError {
    #[error("\"{field}\" is required")]
    Required { field: &'static str },

    #[error("\"{field}\" must be a string")]
    NotAString { field: &'static str },

    #[error("\"{field}\" is not allowed to be empty")]
    Empty { field: &'static str },

    #[error("\"{field}\" length must be at least {min} characters long")]
    TooShort { field: &'static str, min: usize },
}

/// Checks a candidate `nombre` value taken from a request body.
pub fn validate_name(candidate: Option<&Value>) -> Result<ValidName, ValidationError> {
    let name = match candidate {
        None => return Err(ValidationError::Required { field: FIELD }),
        Some(Value::String(s)) => s,
        Some(_) => return Err(ValidationError::NotAString { field: FIELD }),
    };

    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field: FIELD });
    }
    if trimmed.chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::TooShort { field: FIELD, min: MIN_NAME_LEN });
    }

    Ok(ValidName(name.clone()))
}

#[cfg(test)]
pub(crate) fn valid(name: &str) -> ValidName {
    ValidName(name.to_owned())
}
