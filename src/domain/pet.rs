use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// How big a pet is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetSize {
    /// Pequeno.
    #[serde(alias = "P")]
    Small,
    /// Médio. New pets start at this size.
    #[default]
    #[serde(alias = "M")]
    Medium,
    /// Grande.
    #[serde(alias = "G")]
    Large,
}

impl PetSize {
    /// The Portuguese label shown to guests.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Small => "Pequeno",
            Self::Medium => "Médio",
            Self::Large => "Grande",
        }
    }
}

impl fmt::Display for PetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string does not name a pet size.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown pet size '{0}': expected small, medium or large (P, M, G)")]
pub struct UnknownPetSize(String);

impl FromStr for PetSize {
    type Err = UnknownPetSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "p" | "s" | "small" | "pequeno" => Ok(Self::Small),
            "m" | "medium" | "medio" | "médio" => Ok(Self::Medium),
            "g" | "l" | "large" | "grande" => Ok(Self::Large),
            _ => Err(UnknownPetSize(s.to_string())),
        }
    }
}

/// A pet travelling with the guests.
///
/// Pets are edited field by field, so a freshly added pet has an empty kind
/// and description until the guest fills them in. Validation rejects blank
/// fields before submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pet {
    /// What animal it is (e.g. "cachorro", "gato").
    #[serde(alias = "type")]
    pub kind: String,
    /// How big it is.
    pub size: PetSize,
    /// Free-text description.
    pub description: String,
}

impl Pet {
    /// Creates a pet with the given fields.
    #[must_use]
    pub fn new(kind: impl Into<String>, size: PetSize, description: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            size,
            description: description.into(),
        }
    }
}

impl fmt::Display for Pet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}), {}", self.kind, self.size, self.description)
    }
}

/// Error returned when a pet cannot be parsed from `kind:size:description`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PetParseError {
    /// The input did not contain three `:`-separated parts.
    #[error("Invalid pet '{0}': expected kind:size:description")]
    Syntax(String),

    /// The size segment was not recognised.
    #[error(transparent)]
    Size(#[from] UnknownPetSize),
}

impl FromStr for Pet {
    type Err = PetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let (Some(kind), Some(size), Some(description)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(PetParseError::Syntax(s.to_string()));
        };

        Ok(Self::new(kind.trim(), size.parse()?, description.trim()))
    }
}
