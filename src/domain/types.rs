//! Strongly-typed value objects used by list queries.
//!
//! These wrappers enforce basic invariants (e.g., one-based page numbers,
//! non-empty filter keys) so that once a value reaches a [`ListQuery`] it can
//! be sent to the server as-is.
//!
//! [`ListQuery`]: crate::domain::query::ListQuery
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided page number or page size is zero.
    #[error("value must be greater than zero")]
    NonPositive,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Macro to generate lightweight newtypes for positive counters.
macro_rules! positive_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(try_from = "u32", into = "u32")]
        pub struct $name(u32);

        impl $name {
            /// Creates a new value ensuring it is greater than zero.
            pub fn new(value: u32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositive)
                }
            }

            /// Returns the raw `u32` backing this value.
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<u32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: u32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for u32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

positive_newtype!(PageNumber, "One-based page index.");
positive_newtype!(PerPage, "Number of rows requested per page.");

impl PageNumber {
    /// The first page; every query reset lands here.
    pub const FIRST: PageNumber = PageNumber(1);
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Name of a server-side filter parameter such as `status` or `customer_id`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct FilterKey(String);

impl FilterKey {
    /// Validates a parameter name: trimmed, non-empty, `[A-Za-z0-9_]` only.
    pub fn new<S: Into<String>>(key: S) -> Result<Self, TypeConstraintError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(TypeConstraintError::InvalidValue(key));
        }
        Ok(Self(key))
    }

    /// Borrow the key as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FilterKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FilterKey {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for FilterKey {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for FilterKey {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FilterKey> for String {
    fn from(value: FilterKey) -> Self {
        value.0
    }
}
