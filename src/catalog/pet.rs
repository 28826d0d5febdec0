//! Pet model and the report form used to list a pet for adoption.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::errors::{AppError, AppResult};
use crate::core::ids::{PetId, UserId};

/// Size class of a pet.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PetSize {
    /// Small.
    Small,
    /// Medium.
    Medium,
    /// Large.
    Large,
}

impl PetSize {
    /// Stable string form for storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }
}

impl fmt::Display for PetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PetSize {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Small" => Ok(Self::Small),
            "Medium" => Ok(Self::Medium),
            "Large" => Ok(Self::Large),
            _ => Err(value.to_string()),
        }
    }
}

/// Gender of a pet.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PetGender {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl PetGender {
    /// Stable string form for storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl fmt::Display for PetGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PetGender {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            _ => Err(value.to_string()),
        }
    }
}

/// A pet listed for adoption.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    /// Pet identifier.
    pub id: PetId,
    /// Display name.
    pub name: String,
    /// Species, e.g. `Dog`.
    pub species: String,
    /// Breed, if known.
    pub breed: Option<String>,
    /// Age in years, if known.
    pub age: Option<u32>,
    /// Size class.
    pub size: Option<PetSize>,
    /// Gender.
    pub gender: Option<PetGender>,
    /// Free-form description.
    pub description: Option<String>,
    /// Health notes.
    pub health_status: Option<String>,
    /// Whether the pet has found a home.
    pub is_adopted: bool,
    /// User who listed the pet.
    pub reported_by: Option<UserId>,
    /// Picture URL.
    pub image_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Form submitted to list a pet for adoption.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PetReport {
    /// Display name (required).
    pub name: String,
    /// Species (required).
    pub species: String,
    /// Breed.
    #[serde(default)]
    pub breed: Option<String>,
    /// Age in years.
    #[serde(default)]
    pub age: Option<u32>,
    /// Size class.
    #[serde(default)]
    pub size: Option<PetSize>,
    /// Gender.
    #[serde(default)]
    pub gender: Option<PetGender>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Health notes.
    #[serde(default)]
    pub health_status: Option<String>,
    /// Picture URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl PetReport {
    /// Validate the form and turn it into a new, not yet adopted, pet.
    ///
    /// Blank optional text fields are stored as absent.
    ///
    /// # Errors
    /// Returns `InvalidInput` if name or species is blank.
    pub fn into_pet(self, reporter: UserId) -> AppResult<Pet> {
        let name = required(self.name, "name")?;
        let species = required(self.species, "species")?;
        let now = Utc::now();

        Ok(Pet {
            id: PetId::new(),
            name,
            species,
            breed: optional(self.breed),
            age: self.age,
            size: self.size,
            gender: self.gender,
            description: optional(self.description),
            health_status: optional(self.health_status),
            is_adopted: false,
            reported_by: Some(reporter),
            image_url: optional(self.image_url),
            created_at: now,
            updated_at: now,
        })
    }
}

fn required(value: String, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_requires_name_and_species() {
        let report = PetReport {
            name: "  ".to_string(),
            species: "Dog".to_string(),
            ..PetReport::default()
        };
        let err = report.into_pet(UserId::new()).unwrap_err();
        assert!(err.to_string().contains("name"));

        let report = PetReport {
            name: "Rex".to_string(),
            ..PetReport::default()
        };
        assert!(report.into_pet(UserId::new()).is_err());
    }

    #[test]
    fn test_report_blank_optionals_become_none() {
        let reporter = UserId::new();
        let pet = PetReport {
            name: " Rex ".to_string(),
            species: "Dog".to_string(),
            breed: Some(String::new()),
            description: Some("  Friendly  ".to_string()),
            age: Some(3),
            ..PetReport::default()
        }
        .into_pet(reporter)
        .unwrap();

        assert_eq!(pet.name, "Rex");
        assert_eq!(pet.breed, None);
        assert_eq!(pet.description.as_deref(), Some("Friendly"));
        assert_eq!(pet.age, Some(3));
        assert_eq!(pet.reported_by, Some(reporter));
        assert!(!pet.is_adopted);
    }

    #[test]
    fn test_report_deserializes_enums() {
        let report: PetReport = serde_json::from_str(
            r#"{"name":"Mia","species":"Cat","size":"Small","gender":"Female"}"#,
        )
        .unwrap();
        assert_eq!(report.size, Some(PetSize::Small));
        assert_eq!(report.gender, Some(PetGender::Female));
    }

    #[test]
    fn test_size_roundtrip() {
        for size in [PetSize::Small, PetSize::Medium, PetSize::Large] {
            assert_eq!(size.as_str().parse::<PetSize>(), Ok(size));
        }
        assert!("Huge".parse::<PetSize>().is_err());
    }
}
