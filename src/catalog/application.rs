//! Adoption application model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::pet::Pet;
use crate::core::ids::{ApplicationId, PetId, UserId};

/// Review state of an application.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    /// Awaiting review.
    Pending,
    /// Accepted by the shelter.
    Approved,
    /// Declined by the shelter.
    Rejected,
}

impl ApplicationStatus {
    /// Stable string form for storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending" => Ok(Self::Pending),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            _ => Err(value.to_string()),
        }
    }
}

/// A user's request to adopt a pet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdoptionApplication {
    /// Application identifier.
    pub id: ApplicationId,
    /// Pet applied for.
    pub pet_id: PetId,
    /// Applicant.
    pub user_id: UserId,
    /// Review state.
    pub status: ApplicationStatus,
    /// Applicant's motivation.
    pub reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Pet details, attached when listing a user's applications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet: Option<Pet>,
}

impl AdoptionApplication {
    /// Build a new pending application.
    #[must_use]
    pub fn pending(user_id: UserId, pet_id: PetId, reason: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ApplicationId::new(),
            pet_id,
            user_id,
            status: ApplicationStatus::Pending,
            reason: reason.filter(|r| !r.trim().is_empty()),
            created_at: now,
            updated_at: now,
            pet: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_drops_blank_reason() {
        let app = AdoptionApplication::pending(UserId::new(), PetId::new(), Some("  ".into()));
        assert_eq!(app.status, ApplicationStatus::Pending);
        assert_eq!(app.reason, None);
    }

    #[test]
    fn test_status_serializes_capitalized() {
        let json = serde_json::to_string(&ApplicationStatus::Approved).unwrap();
        assert_eq!(json, "\"Approved\"");
        assert_eq!("Rejected".parse(), Ok(ApplicationStatus::Rejected));
    }
}
