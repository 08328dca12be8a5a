use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors that can occur when parsing a principal string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PrincipalError {
    #[error("principal must not be empty")]
    Empty,
    #[error("principal must not contain whitespace: {0:?}")]
    Whitespace(String),
}

/// Textual form of the reserved burn principal. Nothing can be paid to or
/// configured as this identity.
pub const NULL_PRINCIPAL: &str = "SP000000000000000000002Q6VF78";

/// An identity known to the environment: a caller, a producer, or the
/// authority contract that collects registration fees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

impl Principal {
    /// Parse a principal, rejecting empty and whitespace-bearing input.
    pub fn parse(value: impl Into<String>) -> Result<Self, PrincipalError> {
        let value = value.into();
        if value.is_empty() {
            return Err(PrincipalError::Empty);
        }
        if value.chars().any(char::is_whitespace) {
            return Err(PrincipalError::Whitespace(value));
        }
        Ok(Self(value))
    }

    /// The reserved burn principal.
    pub fn null() -> Self {
        Self(NULL_PRINCIPAL.to_string())
    }

    /// Whether this is the reserved burn principal.
    pub fn is_null(&self) -> bool {
        self.0 == NULL_PRINCIPAL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Principal> for String {
    fn from(value: Principal) -> Self {
        value.0
    }
}

impl TryFrom<String> for Principal {
    type Error = PrincipalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Principal::parse(value)
    }
}

impl std::str::FromStr for Principal {
    type Err = PrincipalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Principal::parse(s)
    }
}
