use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DrivePage, DriveRepository, Insertion, InterestRepository, UserRepository};
use crate::error::Result;
use crate::models::drive::{Drive, DriveDetails, DriveFilter};
use crate::models::interest::{Interest, InterestStatus};
use crate::models::user::{NewUser, Profile, User};

/// Process-local backend used by tests and by servers started without
/// `DATABASE_URL`. Rows are kept in insertion order; one lock guards all
/// three tables so ledger and counter writes land together.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    drives: Vec<Drive>,
    interests: Vec<Interest>,
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: NewUser) -> Result<Insertion<User>> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.email == user.email) {
            return Ok(Insertion::Duplicate);
        }
        let user = User::from_new(user, Utc::now());
        state.users.push(user.clone());
        Ok(Insertion::Created(user))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn update_profile(&self, id: Uuid, profile: &Profile) -> Result<Option<User>> {
        let mut state = self.state.write().await;
        let Some(user) = state.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.profile = profile.clone();
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn store_reset_token(
        &self,
        id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(user) = state.users.iter_mut().find(|u| u.id == id) {
            user.reset_password_token = Some(token.to_string());
            user.reset_password_expires = Some(expires_at);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn clear_reset_token(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(user) = state.users.iter_mut().find(|u| u.id == id) {
            user.reset_password_token = None;
            user.reset_password_expires = None;
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn find_by_reset_token(&self, token: &str, now: DateTime<Utc>) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|u| u.has_valid_reset_token(token, now))
            .cloned())
    }

    async fn consume_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
        password_hash: &str,
    ) -> Result<Option<User>> {
        let mut state = self.state.write().await;
        let Some(user) = state
            .users
            .iter_mut()
            .find(|u| u.has_valid_reset_token(token, now))
        else {
            return Ok(None);
        };
        user.password_hash = password_hash.to_string();
        user.reset_password_token = None;
        user.reset_password_expires = None;
        user.updated_at = now;
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl DriveRepository for MemoryStore {
    async fn insert(&self, company_id: Uuid, details: DriveDetails) -> Result<Drive> {
        let drive = Drive::new(company_id, details, Utc::now());
        self.state.write().await.drives.push(drive.clone());
        Ok(drive)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Drive>> {
        let state = self.state.read().await;
        Ok(state.drives.iter().find(|d| d.id == id).cloned())
    }

    async fn find_owned(&self, id: Uuid, company_id: Uuid) -> Result<Option<Drive>> {
        let state = self.state.read().await;
        Ok(state
            .drives
            .iter()
            .find(|d| d.id == id && d.company_id == company_id)
            .cloned())
    }

    async fn update_details(
        &self,
        id: Uuid,
        company_id: Uuid,
        details: &DriveDetails,
    ) -> Result<Option<Drive>> {
        let mut state = self.state.write().await;
        let Some(drive) = state
            .drives
            .iter_mut()
            .find(|d| d.id == id && d.company_id == company_id)
        else {
            return Ok(None);
        };
        drive.details = details.clone();
        drive.updated_at = Utc::now();
        Ok(Some(drive.clone()))
    }

    async fn list_open(
        &self,
        filter: &DriveFilter,
        now: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> Result<DrivePage> {
        let state = self.state.read().await;
        let mut matching: Vec<&Drive> = state
            .drives
            .iter()
            .filter(|d| d.is_open(now) && filter.matches(d))
            .collect();
        matching.sort_by_key(|d| d.details.date);

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok(DrivePage { items, total })
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Drive>> {
        let state = self.state.read().await;
        Ok(state
            .drives
            .iter()
            .rev()
            .filter(|d| d.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Drive>> {
        let state = self.state.read().await;
        Ok(state
            .drives
            .iter()
            .filter(|d| ids.contains(&d.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InterestRepository for MemoryStore {
    async fn find_interested(
        &self,
        candidate_id: Uuid,
        drive_id: Uuid,
    ) -> Result<Option<Interest>> {
        let state = self.state.read().await;
        Ok(state
            .interests
            .iter()
            .find(|i| {
                i.candidate_id == candidate_id
                    && i.drive_id == drive_id
                    && i.status == InterestStatus::Interested
            })
            .cloned())
    }

    async fn insert_counted(
        &self,
        candidate_id: Uuid,
        drive_id: Uuid,
    ) -> Result<Insertion<Interest>> {
        let mut state = self.state.write().await;
        if state
            .interests
            .iter()
            .any(|i| i.candidate_id == candidate_id && i.drive_id == drive_id)
        {
            return Ok(Insertion::Duplicate);
        }
        let now = Utc::now();
        let interest = Interest::new(candidate_id, drive_id, now);
        state.interests.push(interest.clone());
        if let Some(drive) = state.drives.iter_mut().find(|d| d.id == drive_id) {
            drive.current_interested += 1;
            drive.updated_at = now;
        }
        Ok(Insertion::Created(interest))
    }

    async fn withdraw_counted(
        &self,
        candidate_id: Uuid,
        drive_id: Uuid,
    ) -> Result<Option<Interest>> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let Some(interest) = state.interests.iter_mut().find(|i| {
            i.candidate_id == candidate_id
                && i.drive_id == drive_id
                && i.status == InterestStatus::Interested
        }) else {
            return Ok(None);
        };
        interest.status = InterestStatus::Withdrawn;
        interest.updated_at = now;
        let withdrawn = interest.clone();

        if let Some(drive) = state.drives.iter_mut().find(|d| d.id == drive_id) {
            drive.current_interested -= 1;
            drive.updated_at = now;
        }
        Ok(Some(withdrawn))
    }

    async fn list_for_candidate(&self, candidate_id: Uuid) -> Result<Vec<Interest>> {
        let state = self.state.read().await;
        Ok(state
            .interests
            .iter()
            .rev()
            .filter(|i| i.candidate_id == candidate_id && i.status == InterestStatus::Interested)
            .cloned()
            .collect())
    }

    async fn list_for_drive(&self, drive_id: Uuid) -> Result<Vec<Interest>> {
        let state = self.state.read().await;
        Ok(state
            .interests
            .iter()
            .rev()
            .filter(|i| i.drive_id == drive_id && i.status == InterestStatus::Interested)
            .cloned()
            .collect())
    }
}
