use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;

static CPF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}\.\d{3}\.\d{3}-\d{2}$").expect("this must never fail"));

/// A Brazilian taxpayer number (CPF) in the punctuated `NNN.NNN.NNN-NN`
/// form.
///
/// Only the format is checked; check digits are not verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaxId(String);

impl TaxId {
    /// Parses a tax ID, requiring the `NNN.NNN.NNN-NN` layout.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTaxId`] if the input does not match the pattern.
    pub fn new(s: String) -> Result<Self, InvalidTaxId> {
        if is_well_formed(&s) {
            Ok(Self(s))
        } else {
            Err(InvalidTaxId(s))
        }
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whether `s` has the `NNN.NNN.NNN-NN` layout.
#[must_use]
pub fn is_well_formed(s: &str) -> bool {
    CPF_PATTERN.is_match(s)
}

impl FromStr for TaxId {
    type Err = InvalidTaxId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl AsRef<str> for TaxId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when a tax ID is not in `NNN.NNN.NNN-NN` form.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid CPF '{0}': use the format 000.000.000-00")]
pub struct InvalidTaxId(String);
