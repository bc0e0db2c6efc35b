use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{DrivePage, DriveRepository, Insertion, InterestRepository, UserRepository};
use crate::error::{Error, Result};
use crate::models::drive::{Coordinates, Drive, DriveDetails, DriveFilter, Location};
use crate::models::interest::Interest;
use crate::models::user::{NewUser, Profile, User};

const USER_COLUMNS: &str = "id, user_type, email, password_hash, reset_password_token, \
    reset_password_expires, company_name, company_description, website, contact_number, \
    full_name, phone, location, skills, experience, profile_picture, is_verified, status, \
    created_at, updated_at";

const DRIVE_COLUMNS: &str = "id, company_id, title, description, requirements, address, city, \
    state, pincode, latitude, longitude, date, start_time, end_time, job_categories, \
    specific_skills, experience_level, status, max_candidates, current_interested, \
    created_at, updated_at";

const INTEREST_COLUMNS: &str = "id, candidate_id, drive_id, status, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    user_type: String,
    email: String,
    password_hash: String,
    reset_password_token: Option<String>,
    reset_password_expires: Option<DateTime<Utc>>,
    company_name: Option<String>,
    company_description: Option<String>,
    website: Option<String>,
    contact_number: Option<String>,
    full_name: Option<String>,
    phone: Option<String>,
    location: Option<String>,
    skills: Vec<String>,
    experience: Option<String>,
    profile_picture: Option<String>,
    is_verified: bool,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            kind: row.user_type.parse().map_err(Error::Internal)?,
            email: row.email,
            password_hash: row.password_hash,
            reset_password_token: row.reset_password_token,
            reset_password_expires: row.reset_password_expires,
            profile: Profile {
                company_name: row.company_name,
                company_description: row.company_description,
                website: row.website,
                contact_number: row.contact_number,
                full_name: row.full_name,
                phone: row.phone,
                location: row.location,
                skills: row.skills,
                experience: row.experience,
            },
            profile_picture: row.profile_picture,
            is_verified: row.is_verified,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct DriveRow {
    id: Uuid,
    company_id: Uuid,
    title: String,
    description: Option<String>,
    requirements: Option<String>,
    address: String,
    city: String,
    state: Option<String>,
    pincode: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    date: DateTime<Utc>,
    start_time: String,
    end_time: String,
    job_categories: Vec<String>,
    specific_skills: Vec<String>,
    experience_level: Vec<String>,
    status: String,
    max_candidates: Option<i32>,
    current_interested: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DriveRow> for Drive {
    type Error = Error;

    fn try_from(row: DriveRow) -> Result<Self> {
        let coordinates = match (row.latitude, row.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        };
        Ok(Self {
            id: row.id,
            company_id: row.company_id,
            details: DriveDetails {
                title: row.title,
                description: row.description,
                requirements: row.requirements,
                location: Location {
                    address: row.address,
                    city: row.city,
                    state: row.state,
                    pincode: row.pincode,
                    coordinates,
                },
                date: row.date,
                start_time: row.start_time,
                end_time: row.end_time,
                job_categories: row.job_categories,
                specific_skills: row.specific_skills,
                experience_level: row.experience_level,
                status: row.status.parse().map_err(Error::Internal)?,
                max_candidates: row.max_candidates,
            },
            current_interested: row.current_interested,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct InterestRow {
    id: Uuid,
    candidate_id: Uuid,
    drive_id: Uuid,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<InterestRow> for Interest {
    type Error = Error;

    fn try_from(row: InterestRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            candidate_id: row.candidate_id,
            drive_id: row.drive_id,
            status: row.status.parse().map_err(Error::Internal)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = Error>,
{
    rows.into_iter().map(T::try_from).collect()
}

/// Escapes LIKE metacharacters so user input matches literally.
fn like_pattern(raw: &str) -> String {
    let escaped = raw
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn push_open_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &DriveFilter, now: DateTime<Utc>) {
    qb.push(" WHERE status = 'active' AND date >= ");
    qb.push_bind(now);
    if let Some(city) = &filter.city {
        qb.push(" AND city ILIKE ");
        qb.push_bind(like_pattern(city));
    }
    if !filter.job_categories.is_empty() {
        qb.push(" AND job_categories && ");
        qb.push_bind(filter.job_categories.clone());
    }
    if !filter.specific_skills.is_empty() {
        qb.push(" AND specific_skills && ");
        qb.push_bind(filter.specific_skills.clone());
    }
    if !filter.experience_level.is_empty() {
        qb.push(" AND experience_level && ");
        qb.push_bind(filter.experience_level.clone());
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert(&self, user: NewUser) -> Result<Insertion<User>> {
        let sql = format!(
            "INSERT INTO users (
                id, user_type, email, password_hash, company_name, company_description,
                website, contact_number, full_name, phone, location, skills, experience
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13)
            ON CONFLICT (email) DO NOTHING
            RETURNING {}",
            USER_COLUMNS
        );
        let profile = user.profile;
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(user.kind.as_str())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(profile.company_name)
            .bind(profile.company_description)
            .bind(profile.website)
            .bind(profile.contact_number)
            .bind(profile.full_name)
            .bind(profile.phone)
            .bind(profile.location)
            .bind(profile.skills)
            .bind(profile.experience)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Insertion::Created(row.try_into()?)),
            None => Ok(Insertion::Duplicate),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {} FROM users WHERE id = ANY($1)", USER_COLUMNS);
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        convert_all(rows)
    }

    async fn update_profile(&self, id: Uuid, profile: &Profile) -> Result<Option<User>> {
        let sql = format!(
            "UPDATE users
            SET
                company_name = $2,
                company_description = $3,
                website = $4,
                contact_number = $5,
                full_name = $6,
                phone = $7,
                location = $8,
                skills = $9,
                experience = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(&profile.company_name)
            .bind(&profile.company_description)
            .bind(&profile.website)
            .bind(&profile.contact_number)
            .bind(&profile.full_name)
            .bind(&profile.phone)
            .bind(&profile.location)
            .bind(&profile.skills)
            .bind(&profile.experience)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn store_reset_token(
        &self,
        id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE users
             SET reset_password_token = $2, reset_password_expires = $3, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(token)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn clear_reset_token(&self, id: Uuid) -> Result<()> {
        sqlx::query(
            "UPDATE users
             SET reset_password_token = NULL, reset_password_expires = NULL, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_reset_token(&self, token: &str, now: DateTime<Utc>) -> Result<Option<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE reset_password_token = $1 AND reset_password_expires > $2",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(token)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn consume_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
        password_hash: &str,
    ) -> Result<Option<User>> {
        let sql = format!(
            "UPDATE users
            SET
                password_hash = $3,
                reset_password_token = NULL,
                reset_password_expires = NULL,
                updated_at = NOW()
            WHERE reset_password_token = $1 AND reset_password_expires > $2
            RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(token)
            .bind(now)
            .bind(password_hash)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }
}

#[async_trait]
impl DriveRepository for PgStore {
    async fn insert(&self, company_id: Uuid, details: DriveDetails) -> Result<Drive> {
        let sql = format!(
            "INSERT INTO drives (
                id, company_id, title, description, requirements, address, city, state,
                pincode, latitude, longitude, date, start_time, end_time, job_categories,
                specific_skills, experience_level, status, max_candidates
            ) VALUES (
                $1,$2,$3,$4,$5,$6,$7,$8,
                $9,$10,$11,$12,$13,$14,$15,
                $16,$17,$18,$19
            )
            RETURNING {}",
            DRIVE_COLUMNS
        );
        let coordinates = details.location.coordinates;
        let row = sqlx::query_as::<_, DriveRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(company_id)
            .bind(details.title)
            .bind(details.description)
            .bind(details.requirements)
            .bind(details.location.address)
            .bind(details.location.city)
            .bind(details.location.state)
            .bind(details.location.pincode)
            .bind(coordinates.map(|c| c.lat))
            .bind(coordinates.map(|c| c.lng))
            .bind(details.date)
            .bind(details.start_time)
            .bind(details.end_time)
            .bind(details.job_categories)
            .bind(details.specific_skills)
            .bind(details.experience_level)
            .bind(details.status.as_str())
            .bind(details.max_candidates)
            .fetch_one(&self.pool)
            .await?;
        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Drive>> {
        let sql = format!("SELECT {} FROM drives WHERE id = $1", DRIVE_COLUMNS);
        let row = sqlx::query_as::<_, DriveRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Drive::try_from).transpose()
    }

    async fn find_owned(&self, id: Uuid, company_id: Uuid) -> Result<Option<Drive>> {
        let sql = format!(
            "SELECT {} FROM drives WHERE id = $1 AND company_id = $2",
            DRIVE_COLUMNS
        );
        let row = sqlx::query_as::<_, DriveRow>(&sql)
            .bind(id)
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Drive::try_from).transpose()
    }

    async fn update_details(
        &self,
        id: Uuid,
        company_id: Uuid,
        details: &DriveDetails,
    ) -> Result<Option<Drive>> {
        let sql = format!(
            "UPDATE drives
            SET
                title = $3,
                description = $4,
                requirements = $5,
                address = $6,
                city = $7,
                state = $8,
                pincode = $9,
                latitude = $10,
                longitude = $11,
                date = $12,
                start_time = $13,
                end_time = $14,
                job_categories = $15,
                specific_skills = $16,
                experience_level = $17,
                status = $18,
                max_candidates = $19,
                updated_at = NOW()
            WHERE id = $1 AND company_id = $2
            RETURNING {}",
            DRIVE_COLUMNS
        );
        let location = &details.location;
        let row = sqlx::query_as::<_, DriveRow>(&sql)
            .bind(id)
            .bind(company_id)
            .bind(&details.title)
            .bind(&details.description)
            .bind(&details.requirements)
            .bind(&location.address)
            .bind(&location.city)
            .bind(&location.state)
            .bind(&location.pincode)
            .bind(location.coordinates.map(|c| c.lat))
            .bind(location.coordinates.map(|c| c.lng))
            .bind(details.date)
            .bind(&details.start_time)
            .bind(&details.end_time)
            .bind(&details.job_categories)
            .bind(&details.specific_skills)
            .bind(&details.experience_level)
            .bind(details.status.as_str())
            .bind(details.max_candidates)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Drive::try_from).transpose()
    }

    async fn list_open(
        &self,
        filter: &DriveFilter,
        now: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> Result<DrivePage> {
        let mut items_query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM drives", DRIVE_COLUMNS));
        push_open_filter(&mut items_query, filter, now);
        items_query.push(" ORDER BY date ASC LIMIT ");
        items_query.push_bind(limit);
        items_query.push(" OFFSET ");
        items_query.push_bind(offset);
        let rows = items_query
            .build_query_as::<DriveRow>()
            .fetch_all(&self.pool)
            .await?;

        let mut total_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM drives");
        push_open_filter(&mut total_query, filter, now);
        let total = total_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(DrivePage {
            items: convert_all(rows)?,
            total,
        })
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Drive>> {
        let sql = format!(
            "SELECT {} FROM drives WHERE company_id = $1 ORDER BY created_at DESC",
            DRIVE_COLUMNS
        );
        let rows = sqlx::query_as::<_, DriveRow>(&sql)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;
        convert_all(rows)
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Drive>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {} FROM drives WHERE id = ANY($1)", DRIVE_COLUMNS);
        let rows = sqlx::query_as::<_, DriveRow>(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        convert_all(rows)
    }
}

#[async_trait]
impl InterestRepository for PgStore {
    async fn find_interested(
        &self,
        candidate_id: Uuid,
        drive_id: Uuid,
    ) -> Result<Option<Interest>> {
        let sql = format!(
            "SELECT {} FROM interests
             WHERE candidate_id = $1 AND drive_id = $2 AND status = 'interested'",
            INTEREST_COLUMNS
        );
        let row = sqlx::query_as::<_, InterestRow>(&sql)
            .bind(candidate_id)
            .bind(drive_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Interest::try_from).transpose()
    }

    async fn insert_counted(
        &self,
        candidate_id: Uuid,
        drive_id: Uuid,
    ) -> Result<Insertion<Interest>> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO interests (id, candidate_id, drive_id, status)
             VALUES ($1, $2, $3, 'interested')
             ON CONFLICT (candidate_id, drive_id) DO NOTHING
             RETURNING {}",
            INTEREST_COLUMNS
        );
        let inserted = sqlx::query_as::<_, InterestRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(candidate_id)
            .bind(drive_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = inserted else {
            tx.rollback().await?;
            return Ok(Insertion::Duplicate);
        };

        sqlx::query(
            "UPDATE drives SET current_interested = current_interested + 1, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(drive_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Insertion::Created(row.try_into()?))
    }

    async fn withdraw_counted(
        &self,
        candidate_id: Uuid,
        drive_id: Uuid,
    ) -> Result<Option<Interest>> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE interests SET status = 'withdrawn', updated_at = NOW()
             WHERE candidate_id = $1 AND drive_id = $2 AND status = 'interested'
             RETURNING {}",
            INTEREST_COLUMNS
        );
        let updated = sqlx::query_as::<_, InterestRow>(&sql)
            .bind(candidate_id)
            .bind(drive_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = updated else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query(
            "UPDATE drives SET current_interested = current_interested - 1, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(drive_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(row.try_into()?))
    }

    async fn list_for_candidate(&self, candidate_id: Uuid) -> Result<Vec<Interest>> {
        let sql = format!(
            "SELECT {} FROM interests
             WHERE candidate_id = $1 AND status = 'interested'
             ORDER BY created_at DESC",
            INTEREST_COLUMNS
        );
        let rows = sqlx::query_as::<_, InterestRow>(&sql)
            .bind(candidate_id)
            .fetch_all(&self.pool)
            .await?;
        convert_all(rows)
    }

    async fn list_for_drive(&self, drive_id: Uuid) -> Result<Vec<Interest>> {
        let sql = format!(
            "SELECT {} FROM interests
             WHERE drive_id = $1 AND status = 'interested'
             ORDER BY created_at DESC",
            INTEREST_COLUMNS
        );
        let rows = sqlx::query_as::<_, InterestRow>(&sql)
            .bind(drive_id)
            .fetch_all(&self.pool)
            .await?;
        convert_all(rows)
    }
}
