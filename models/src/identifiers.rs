// models/src/identifiers.rs

use core::ops::Deref;
use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use internment::Intern;

use crate::errors::{ValidationError, ValidationResult};

/// A participant identity. Identities are interned, so cloning one is a
/// pointer copy and equality checks never touch the string bytes.
///
/// Equality is exact string equality, surrounding whitespace included.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Identifier(pub Intern<String>);

impl Identifier {
    /// Creates a new identifier.
    ///
    /// # Errors
    /// Returns `ValidationError::EmptyIdentity` if `value` is empty.
    pub fn new(value: impl Into<String>) -> ValidationResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::EmptyIdentity("identifier"));
        }

        Ok(Self(Intern::new(value)))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for Identifier {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl FromStr for Identifier {
    type Err = ValidationError;

    fn from_str(s: &str) -> ValidationResult<Self> {
        Self::new(s)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.as_str().to_string()
    }
}

// Ordered by string content, not by intern address, so ledger ordering is
// stable across runs.
impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}
