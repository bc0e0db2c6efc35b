use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestStatus {
    Interested,
    Withdrawn,
}

impl InterestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterestStatus::Interested => "interested",
            InterestStatus::Withdrawn => "withdrawn",
        }
    }
}

impl fmt::Display for InterestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "interested" => Ok(InterestStatus::Interested),
            "withdrawn" => Ok(InterestStatus::Withdrawn),
            other => Err(format!("unknown interest status '{}'", other)),
        }
    }
}

/// One row per (candidate, drive) pair, whatever its status.
#[derive(Debug, Clone)]
pub struct Interest {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub drive_id: Uuid,
    pub status: InterestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Interest {
    pub fn new(candidate_id: Uuid, drive_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            candidate_id,
            drive_id,
            status: InterestStatus::Interested,
            created_at: now,
            updated_at: now,
        }
    }
}
