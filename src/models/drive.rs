use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveStatus {
    #[default]
    Active,
    Closed,
    Postponed,
    Cancelled,
}

impl DriveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriveStatus::Active => "active",
            DriveStatus::Closed => "closed",
            DriveStatus::Postponed => "postponed",
            DriveStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for DriveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriveStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(DriveStatus::Active),
            "closed" => Ok(DriveStatus::Closed),
            "postponed" => Ok(DriveStatus::Postponed),
            "cancelled" => Ok(DriveStatus::Cancelled),
            other => Err(format!("unknown drive status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Location {
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub coordinates: Option<Coordinates>,
}

/// Fields the owning company may set and later change.
#[derive(Debug, Clone, PartialEq)]
pub struct DriveDetails {
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
}

#[derive(Debug, Clone)]
pub struct Drive {
    pub id: Uuid,
    pub company_id: Uuid,
    pub details: DriveDetails,
    /// Written only by the interest ledger, never by the owner.
    pub current_interested: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Drive {
    pub fn new(company_id: Uuid, details: DriveDetails, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            details,
            current_interested: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Open drives are the only ones listed publicly or accepting interest.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.details.status == DriveStatus::Active && self.details.date >= now
    }
}

/// Public listing filters. Empty tag lists mean "no constraint".
#[derive(Debug, Clone, Default)]
pub struct DriveFilter {
    pub city: Option<String>,
    pub job_categories: Vec<String>,
    pub specific_skills: Vec<String>,
    pub experience_level: Vec<String>,
}

impl DriveFilter {
    pub fn matches(&self, drive: &Drive) -> bool {
        let details = &drive.details;
        if let Some(city) = &self.city {
            if !details
                .location
                .city
                .to_lowercase()
                .contains(&city.to_lowercase())
            {
                return false;
            }
        }
        any_of(&self.job_categories, &details.job_categories)
            && any_of(&self.specific_skills, &details.specific_skills)
            && any_of(&self.experience_level, &details.experience_level)
    }
}

fn any_of(wanted: &[String], tags: &[String]) -> bool {
    wanted.is_empty() || wanted.iter().any(|w| tags.contains(w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn details(city: &str, categories: &[&str]) -> DriveDetails {
        DriveDetails {
            title: "Backend hiring day".into(),
            description: None,
            requirements: None,
            location: Location {
                address: "12 MG Road".into(),
                city: city.into(),
                state: None,
                pincode: None,
                coordinates: None,
            },
            date: Utc::now() + Duration::days(1),
            start_time: "10:00".into(),
            end_time: "16:00".into(),
            job_categories: categories.iter().map(|c| c.to_string()).collect(),
            specific_skills: vec![],
            experience_level: vec![],
            status: DriveStatus::Active,
            max_candidates: None,
        }
    }

    #[test]
    fn city_filter_is_case_insensitive_substring() {
        let drive = Drive::new(Uuid::new_v4(), details("Bengaluru", &[]), Utc::now());
        let filter = DriveFilter {
            city: Some("GALU".into()),
            ..Default::default()
        };
        assert!(filter.matches(&drive));

        let filter = DriveFilter {
            city: Some("Pune".into()),
            ..Default::default()
        };
        assert!(!filter.matches(&drive));
    }

    #[test]
    fn tag_filters_match_any_of() {
        let drive = Drive::new(
            Uuid::new_v4(),
            details("Pune", &["engineering", "support"]),
            Utc::now(),
        );
        let filter = DriveFilter {
            job_categories: vec!["sales".into(), "support".into()],
            ..Default::default()
        };
        assert!(filter.matches(&drive));

        let filter = DriveFilter {
            job_categories: vec!["sales".into()],
            ..Default::default()
        };
        assert!(!filter.matches(&drive));
    }

    #[test]
    fn past_or_inactive_drives_are_not_open() {
        let now = Utc::now();
        let mut drive = Drive::new(Uuid::new_v4(), details("Pune", &[]), now);
        assert!(drive.is_open(now));

        drive.details.status = DriveStatus::Postponed;
        assert!(!drive.is_open(now));

        drive.details.status = DriveStatus::Active;
        drive.details.date = now - Duration::hours(1);
        assert!(!drive.is_open(now));
    }
}
