//! Persistence seams. Services only see the repository traits; `Store`
//! bundles one backend's implementations for injection into `AppState`.

pub mod memory;
pub mod pool;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::drive::{Drive, DriveDetails, DriveFilter};
use crate::models::interest::Interest;
use crate::models::user::{NewUser, Profile, User};

/// Outcome of an insert guarded by a uniqueness constraint.
#[derive(Debug)]
pub enum Insertion<T> {
    Created(T),
    Duplicate,
}

pub struct DrivePage {
    pub items: Vec<Drive>,
    pub total: i64,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: NewUser) -> Result<Insertion<User>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>>;

    async fn update_profile(&self, id: Uuid, profile: &Profile) -> Result<Option<User>>;

    async fn store_reset_token(
        &self,
        id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    async fn clear_reset_token(&self, id: Uuid) -> Result<()>;

    /// Account holding `token` with an expiry strictly after `now`.
    async fn find_by_reset_token(&self, token: &str, now: DateTime<Utc>) -> Result<Option<User>>;

    /// Swaps in `password_hash` and clears the token in one conditional write.
    /// Returns `None` when the token is unknown or expired.
    async fn consume_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
        password_hash: &str,
    ) -> Result<Option<User>>;
}

#[async_trait]
pub trait DriveRepository: Send + Sync {
    async fn insert(&self, company_id: Uuid, details: DriveDetails) -> Result<Drive>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Drive>>;

    async fn find_owned(&self, id: Uuid, company_id: Uuid) -> Result<Option<Drive>>;

    /// Rewrites owner-editable columns only; the counter and owner are kept.
    async fn update_details(
        &self,
        id: Uuid,
        company_id: Uuid,
        details: &DriveDetails,
    ) -> Result<Option<Drive>>;

    /// Active drives dated at or after `now`, earliest first.
    async fn list_open(
        &self,
        filter: &DriveFilter,
        now: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> Result<DrivePage>;

    /// Newest created first.
    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Drive>>;

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Drive>>;
}

#[async_trait]
pub trait InterestRepository: Send + Sync {
    async fn find_interested(&self, candidate_id: Uuid, drive_id: Uuid)
        -> Result<Option<Interest>>;

    /// Inserts an interested row and bumps the drive counter atomically.
    /// Any existing row for the pair, withdrawn or not, yields `Duplicate`.
    async fn insert_counted(&self, candidate_id: Uuid, drive_id: Uuid)
        -> Result<Insertion<Interest>>;

    /// Flips the interested row to withdrawn and decrements the counter
    /// atomically. `None` when there is no interested row.
    async fn withdraw_counted(&self, candidate_id: Uuid, drive_id: Uuid)
        -> Result<Option<Interest>>;

    /// Interested rows only, newest first.
    async fn list_for_candidate(&self, candidate_id: Uuid) -> Result<Vec<Interest>>;

    /// Interested rows only, newest first.
    async fn list_for_drive(&self, drive_id: Uuid) -> Result<Vec<Interest>>;
}

#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserRepository>,
    pub drives: Arc<dyn DriveRepository>,
    pub interests: Arc<dyn InterestRepository>,
}

impl Store {
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(postgres::PgStore::new(pool));
        Self {
            users: store.clone(),
            drives: store.clone(),
            interests: store,
        }
    }

    pub fn memory() -> Self {
        let store = Arc::new(memory::MemoryStore::default());
        Self {
            users: store.clone(),
            drives: store.clone(),
            interests: store,
        }
    }
}
