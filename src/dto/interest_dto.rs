use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::drive_dto::DriveResponse;
use crate::models::interest::{Interest, InterestStatus};
use crate::models::user::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestResponse {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub drive_id: Uuid,
    pub status: InterestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Interest> for InterestResponse {
    fn from(value: Interest) -> Self {
        Self {
            id: value.id,
            candidate_id: value.candidate_id,
            drive_id: value.drive_id,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// A candidate's interest with the drive it points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestWithDrive {
    #[serde(flatten)]
    pub interest: InterestResponse,
    pub drive: DriveResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: String,
    pub skills: Vec<String>,
    pub experience: Option<String>,
    pub location: Option<String>,
}

impl From<User> for CandidateProfile {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            full_name: value.profile.full_name,
            phone: value.profile.phone,
            email: value.email,
            skills: value.profile.skills,
            experience: value.profile.experience,
            location: value.profile.location,
        }
    }
}

/// An applicant as listed to the owning company.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestWithCandidate {
    #[serde(flatten)]
    pub interest: InterestResponse,
    pub candidate: CandidateProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInterestResponse {
    pub has_interest: bool,
}
