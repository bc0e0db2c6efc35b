use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::database::{DriveRepository, UserRepository};
use crate::dto::drive_dto::{
    CompanyProfile, CreateDrivePayload, DriveListQuery, DriveResponse, UpdateDrivePayload,
};
use crate::error::{Error, Result};
use crate::models::drive::{Drive, DriveDetails};
use crate::models::user::{Identity, UserKind};
use crate::utils::time::now;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Clone)]
pub struct DriveService {
    drives: Arc<dyn DriveRepository>,
    users: Arc<dyn UserRepository>,
}

pub struct DriveListing {
    pub drives: Vec<DriveResponse>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl DriveService {
    pub fn new(drives: Arc<dyn DriveRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { drives, users }
    }

    /// Open drives only, earliest first, each with its company's name and
    /// contact number.
    pub async fn list(&self, query: DriveListQuery) -> Result<DriveListing> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1)
            .checked_mul(per_page)
            .ok_or_else(|| Error::BadRequest("Page number is out of range".into()))?;

        let result = self
            .drives
            .list_open(&query.filter(), now(), per_page, offset)
            .await?;

        let company_ids: Vec<Uuid> = result.items.iter().map(|d| d.company_id).collect();
        let companies: HashMap<Uuid, CompanyProfile> = self
            .users
            .find_many(&company_ids)
            .await?
            .iter()
            .map(|u| (u.id, CompanyProfile::summary(u)))
            .collect();

        let drives = result
            .items
            .into_iter()
            .map(|drive| {
                let company = companies.get(&drive.company_id).cloned();
                DriveResponse::with_company(drive, company)
            })
            .collect();

        let total_pages = if result.total == 0 {
            0
        } else {
            (result.total + per_page - 1) / per_page
        };

        Ok(DriveListing {
            drives,
            total: result.total,
            page,
            per_page,
            total_pages,
        })
    }

    /// Any drive regardless of status or date, with the full company profile.
    pub async fn get_by_id(&self, id: Uuid) -> Result<DriveResponse> {
        let drive = self.find(id).await?;
        let company = self
            .users
            .find_by_id(drive.company_id)
            .await?
            .map(|u| CompanyProfile::full(&u));
        Ok(DriveResponse::with_company(drive, company))
    }

    pub async fn create(&self, identity: Identity, payload: CreateDrivePayload) -> Result<Drive> {
        identity.require(UserKind::Company, "Only companies can create drives")?;
        payload.validate()?;

        let drive = self
            .drives
            .insert(identity.user_id, DriveDetails::from(payload))
            .await?;
        info!(drive_id = %drive.id, company_id = %drive.company_id, "drive created");
        Ok(drive)
    }

    pub async fn update(
        &self,
        identity: Identity,
        id: Uuid,
        payload: UpdateDrivePayload,
    ) -> Result<Drive> {
        payload.validate()?;

        let Some(existing) = self.drives.find_owned(id, identity.user_id).await? else {
            return Err(Error::NotFound("Drive not found or unauthorized".into()));
        };

        let mut details = existing.details;
        payload.apply_to(&mut details);

        let drive = self
            .drives
            .update_details(id, identity.user_id, &details)
            .await?
            .ok_or_else(|| Error::NotFound("Drive not found or unauthorized".into()))?;
        info!(drive_id = %drive.id, "drive updated");
        Ok(drive)
    }

    pub async fn list_mine(&self, identity: Identity) -> Result<Vec<Drive>> {
        identity.require(UserKind::Company, "Access denied")?;
        self.drives.list_by_company(identity.user_id).await
    }

    pub(crate) async fn find(&self, id: Uuid) -> Result<Drive> {
        self.drives
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("Drive not found".into()))
    }
}
