use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::drive::{Drive, DriveDetails, DriveFilter, DriveStatus, Location};
use crate::models::user::User;
use crate::services::drive_service::DriveListing;
use crate::utils::list::split_csv;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDrivePayload {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub requirements: Option<String>,
    #[validate(nested)]
    pub location: Location,
    pub date: DateTime<Utc>,
    #[validate(length(min = 1))]
    pub start_time: String,
    #[validate(length(min = 1))]
    pub end_time: String,
    #[serde(default)]
    pub job_categories: Vec<String>,
    #[serde(default)]
    pub specific_skills: Vec<String>,
    #[serde(default)]
    pub experience_level: Vec<String>,
    pub status: Option<DriveStatus>,
    #[validate(range(min = 1))]
    pub max_candidates: Option<i32>,
}

impl From<CreateDrivePayload> for DriveDetails {
    fn from(value: CreateDrivePayload) -> Self {
        Self {
            title: value.title,
            description: value.description,
            requirements: value.requirements,
            location: value.location,
            date: value.date,
            start_time: value.start_time,
            end_time: value.end_time,
            job_categories: value.job_categories,
            specific_skills: value.specific_skills,
            experience_level: value.experience_level,
            status: value.status.unwrap_or_default(),
            max_candidates: value.max_candidates,
        }
    }
}

/// Owner-editable drive fields. `companyId` and `currentInterested` are not
/// part of this payload, so a request carrying them leaves them untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDrivePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DriveStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub max_candidates: Option<i32>,
}

impl UpdateDrivePayload {
    pub fn apply_to(self, details: &mut DriveDetails) {
        if let Some(v) = self.title {
            details.title = v;
        }
        if let Some(v) = self.description {
            details.description = Some(v);
        }
        if let Some(v) = self.requirements {
            details.requirements = Some(v);
        }
        if let Some(v) = self.location {
            details.location = v;
        }
        if let Some(v) = self.date {
            details.date = v;
        }
        if let Some(v) = self.start_time {
            details.start_time = v;
        }
        if let Some(v) = self.end_time {
            details.end_time = v;
        }
        if let Some(v) = self.job_categories {
            details.job_categories = v;
        }
        if let Some(v) = self.specific_skills {
            details.specific_skills = v;
        }
        if let Some(v) = self.experience_level {
            details.experience_level = v;
        }
        if let Some(v) = self.status {
            details.status = v;
        }
        if let Some(v) = self.max_candidates {
            details.max_candidates = Some(v);
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DriveListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Comma separated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_categories: Option<String>,
    /// Comma separated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    /// Comma separated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl DriveListQuery {
    pub fn filter(&self) -> DriveFilter {
        DriveFilter {
            city: self
                .city
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            job_categories: split_csv(self.job_categories.as_deref()),
            specific_skills: split_csv(self.skills.as_deref()),
            experience_level: split_csv(self.experience.as_deref()),
        }
    }
}

/// Public company fields attached to drives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub id: Uuid,
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_description: Option<String>,
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl CompanyProfile {
    /// Name and contact only, as shown in listings.
    pub fn summary(user: &User) -> Self {
        Self {
            id: user.id,
            company_name: user.profile.company_name.clone(),
            company_description: None,
            contact_number: user.profile.contact_number.clone(),
            website: None,
        }
    }

    pub fn full(user: &User) -> Self {
        Self {
            company_description: user.profile.company_description.clone(),
            website: user.profile.website.clone(),
            ..Self::summary(user)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveResponse {
    pub id: Uuid,
    pub company_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyProfile>,
    pub title: String,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub location: Location,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub job_categories: Vec<String>,
    pub specific_skills: Vec<String>,
    pub experience_level: Vec<String>,
    pub status: DriveStatus,
    pub max_candidates: Option<i32>,
    pub current_interested: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DriveResponse {
    pub fn with_company(drive: Drive, company: Option<CompanyProfile>) -> Self {
        let details = drive.details;
        Self {
            id: drive.id,
            company_id: drive.company_id,
            company,
            title: details.title,
            description: details.description,
            requirements: details.requirements,
            location: details.location,
            date: details.date,
            start_time: details.start_time,
            end_time: details.end_time,
            job_categories: details.job_categories,
            specific_skills: details.specific_skills,
            experience_level: details.experience_level,
            status: details.status,
            max_candidates: details.max_candidates,
            current_interested: drive.current_interested,
            created_at: drive.created_at,
            updated_at: drive.updated_at,
        }
    }
}

impl From<Drive> for DriveResponse {
    fn from(value: Drive) -> Self {
        Self::with_company(value, None)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveListResponse {
    pub drives: Vec<DriveResponse>,
    pub total_pages: i64,
    pub current_page: i64,
    pub total: i64,
}

impl From<DriveListing> for DriveListResponse {
    fn from(value: DriveListing) -> Self {
        Self {
            drives: value.drives,
            total_pages: value.total_pages,
            current_page: value.page,
            total: value.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_payload_ignores_owner_and_counter_fields() {
        let payload: UpdateDrivePayload = serde_json::from_value(serde_json::json!({
            "title": "Renamed",
            "companyId": Uuid::new_v4(),
            "currentInterested": 99
        }))
        .unwrap();
        assert_eq!(payload.title.as_deref(), Some("Renamed"));
        assert!(payload.status.is_none());
    }

    #[test]
    fn list_query_builds_filter_from_comma_lists() {
        let query = DriveListQuery {
            city: Some("  ".into()),
            job_categories: Some("IT,Sales".into()),
            skills: Some("rust".into()),
            ..Default::default()
        };
        let filter = query.filter();
        assert!(filter.city.is_none());
        assert_eq!(filter.job_categories, vec!["IT", "Sales"]);
        assert_eq!(filter.specific_skills, vec!["rust"]);
        assert!(filter.experience_level.is_empty());
    }
}
