use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserKind {
    Company,
    Candidate,
}

impl UserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserKind::Company => "company",
            UserKind::Candidate => "candidate",
        }
    }
}

impl fmt::Display for UserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "company" => Ok(UserKind::Company),
            "candidate" => Ok(UserKind::Candidate),
            other => Err(format!("unknown user type '{}'", other)),
        }
    }
}

/// Account record. `password_hash` and the reset fields never leave the
/// service layer; responses go through `dto::user_dto::UserResponse`.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub kind: UserKind,
    pub email: String,
    pub password_hash: String,
    pub reset_password_token: Option<String>,
    pub reset_password_expires: Option<DateTime<Utc>>,
    pub profile: Profile,
    pub profile_picture: Option<String>,
    pub is_verified: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner-editable profile fields for both account kinds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub company_name: Option<String>,
    pub company_description: Option<String>,
    pub website: Option<String>,
    pub contact_number: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub experience: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub kind: UserKind,
    pub email: String,
    pub password_hash: String,
    pub profile: Profile,
}

impl User {
    pub fn from_new(new: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: new.kind,
            email: new.email,
            password_hash: new.password_hash,
            reset_password_token: None,
            reset_password_expires: None,
            profile: new.profile,
            profile_picture: None,
            is_verified: false,
            status: "active".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_valid_reset_token(&self, token: &str, now: DateTime<Utc>) -> bool {
        match (&self.reset_password_token, self.reset_password_expires) {
            (Some(stored), Some(expires)) => stored == token && expires > now,
            _ => false,
        }
    }
}

/// Decoded bearer assertion: who is calling and as which account kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub kind: UserKind,
}

impl Identity {
    pub fn new(user_id: Uuid, kind: UserKind) -> Self {
        Self { user_id, kind }
    }

    pub fn require(&self, kind: UserKind, message: &str) -> crate::error::Result<()> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(crate::error::Error::Forbidden(message.to_string()))
        }
    }
}
