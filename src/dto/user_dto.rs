use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::{Profile, User, UserKind};

/// Profile fields accepted at registration and on profile update. Anything
/// else in the request body is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
}

impl ProfileFields {
    /// Overwrites only the fields present in the request.
    pub fn apply_to(self, profile: &mut Profile) {
        if let Some(v) = self.company_name {
            profile.company_name = Some(v);
        }
        if let Some(v) = self.company_description {
            profile.company_description = Some(v);
        }
        if let Some(v) = self.website {
            profile.website = Some(v);
        }
        if let Some(v) = self.contact_number {
            profile.contact_number = Some(v);
        }
        if let Some(v) = self.full_name {
            profile.full_name = Some(v);
        }
        if let Some(v) = self.phone {
            profile.phone = Some(v);
        }
        if let Some(v) = self.location {
            profile.location = Some(v);
        }
        if let Some(v) = self.skills {
            profile.skills = v;
        }
        if let Some(v) = self.experience {
            profile.experience = Some(v);
        }
    }

    pub fn into_profile(self) -> Profile {
        let mut profile = Profile::default();
        self.apply_to(&mut profile);
        profile
    }
}

/// A user as the API exposes it: no password hash, no reset token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub user_type: UserKind,
    pub email: String,
    #[serde(flatten)]
    pub profile: ProfileFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    pub is_verified: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let profile = value.profile;
        let skills = if profile.skills.is_empty() {
            None
        } else {
            Some(profile.skills)
        };
        Self {
            id: value.id,
            user_type: value.kind,
            email: value.email,
            profile: ProfileFields {
                company_name: profile.company_name,
                company_description: profile.company_description,
                website: profile.website,
                contact_number: profile.contact_number,
                full_name: profile.full_name,
                phone: profile.phone,
                location: profile.location,
                skills,
                experience: profile.experience,
            },
            profile_picture: value.profile_picture,
            is_verified: value.is_verified,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
