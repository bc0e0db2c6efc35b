use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::database::{DriveRepository, Insertion, InterestRepository, UserRepository};
use crate::dto::drive_dto::{CompanyProfile, DriveResponse};
use crate::dto::interest_dto::{
    CandidateProfile, InterestResponse, InterestWithCandidate, InterestWithDrive,
};
use crate::error::{Error, Result};
use crate::models::interest::Interest;
use crate::models::user::{Identity, UserKind};
use crate::utils::time::now;

/// Interest ledger. Every status change is paired with the drive's
/// `current_interested` counter inside the repository.
#[derive(Clone)]
pub struct InterestService {
    interests: Arc<dyn InterestRepository>,
    drives: Arc<dyn DriveRepository>,
    users: Arc<dyn UserRepository>,
}

impl InterestService {
    pub fn new(
        interests: Arc<dyn InterestRepository>,
        drives: Arc<dyn DriveRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            interests,
            drives,
            users,
        }
    }

    pub async fn express(&self, identity: Identity, drive_id: Uuid) -> Result<Interest> {
        identity.require(UserKind::Candidate, "Only candidates can express interest")?;

        let open = self
            .drives
            .find_by_id(drive_id)
            .await?
            .filter(|d| d.is_open(now()));
        if open.is_none() {
            return Err(Error::NotFound("Drive not found or not active".into()));
        }

        if self
            .interests
            .find_interested(identity.user_id, drive_id)
            .await?
            .is_some()
        {
            return Err(Error::AlreadyInterested);
        }

        // A withdrawn row for the pair also lands here: re-expressing is not
        // supported by the ledger.
        match self
            .interests
            .insert_counted(identity.user_id, drive_id)
            .await?
        {
            Insertion::Created(interest) => {
                info!(candidate_id = %identity.user_id, drive_id = %drive_id, "interest expressed");
                Ok(interest)
            }
            Insertion::Duplicate => Err(Error::AlreadyInterested),
        }
    }

    pub async fn withdraw(&self, identity: Identity, drive_id: Uuid) -> Result<Interest> {
        identity.require(UserKind::Candidate, "Only candidates can withdraw interest")?;

        let interest = self
            .interests
            .withdraw_counted(identity.user_id, drive_id)
            .await?
            .ok_or_else(|| Error::NotFound("Interest not found".into()))?;
        info!(candidate_id = %identity.user_id, drive_id = %drive_id, "interest withdrawn");
        Ok(interest)
    }

    pub async fn my_interests(&self, identity: Identity) -> Result<Vec<InterestWithDrive>> {
        identity.require(UserKind::Candidate, "Access denied")?;

        let interests = self.interests.list_for_candidate(identity.user_id).await?;
        let drive_ids: Vec<Uuid> = interests.iter().map(|i| i.drive_id).collect();
        let drives = self.drives.find_many(&drive_ids).await?;

        let company_ids: Vec<Uuid> = drives.iter().map(|d| d.company_id).collect();
        let companies: HashMap<Uuid, CompanyProfile> = self
            .users
            .find_many(&company_ids)
            .await?
            .iter()
            .map(|u| (u.id, CompanyProfile::summary(u)))
            .collect();
        let mut drives: HashMap<Uuid, _> = drives.into_iter().map(|d| (d.id, d)).collect();

        Ok(interests
            .into_iter()
            .filter_map(|interest| {
                let drive = drives.remove(&interest.drive_id)?;
                let company = companies.get(&drive.company_id).cloned();
                Some(InterestWithDrive {
                    interest: InterestResponse::from(interest),
                    drive: DriveResponse::with_company(drive, company),
                })
            })
            .collect())
    }

    pub async fn drive_candidates(
        &self,
        identity: Identity,
        drive_id: Uuid,
    ) -> Result<Vec<InterestWithCandidate>> {
        identity.require(UserKind::Company, "Access denied")?;

        if self
            .drives
            .find_owned(drive_id, identity.user_id)
            .await?
            .is_none()
        {
            return Err(Error::NotFound("Drive not found or unauthorized".into()));
        }

        let interests = self.interests.list_for_drive(drive_id).await?;
        let candidate_ids: Vec<Uuid> = interests.iter().map(|i| i.candidate_id).collect();
        let mut candidates: HashMap<Uuid, CandidateProfile> = self
            .users
            .find_many(&candidate_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, CandidateProfile::from(u)))
            .collect();

        Ok(interests
            .into_iter()
            .filter_map(|interest| {
                let candidate = candidates.remove(&interest.candidate_id)?;
                Some(InterestWithCandidate {
                    interest: InterestResponse::from(interest),
                    candidate,
                })
            })
            .collect())
    }

    pub async fn check_interest(&self, identity: Identity, drive_id: Uuid) -> Result<bool> {
        identity.require(UserKind::Candidate, "Access denied")?;
        Ok(self
            .interests
            .find_interested(identity.user_id, drive_id)
            .await?
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Store;
    use crate::dto::user_dto::ProfileFields;
    use crate::models::drive::{Drive, DriveDetails, DriveStatus, Location};
    use crate::models::interest::InterestStatus;
    use crate::models::user::NewUser;
    use chrono::{Duration, Utc};

    struct Fixture {
        store: Store,
        service: InterestService,
        company: Identity,
        candidate: Identity,
    }

    async fn account(store: &Store, kind: UserKind, email: &str, profile: ProfileFields) -> Identity {
        let new_user = NewUser {
            kind,
            email: email.into(),
            password_hash: "unused".into(),
            profile: profile.into_profile(),
        };
        match store.users.insert(new_user).await.unwrap() {
            Insertion::Created(user) => Identity::new(user.id, user.kind),
            Insertion::Duplicate => panic!("duplicate account"),
        }
    }

    async fn fixture() -> Fixture {
        let store = Store::memory();
        let company = account(
            &store,
            UserKind::Company,
            "hr@acme.example",
            ProfileFields {
                company_name: Some("Acme".into()),
                ..Default::default()
            },
        )
        .await;
        let candidate = account(
            &store,
            UserKind::Candidate,
            "ravi@example.com",
            ProfileFields {
                full_name: Some("Ravi K".into()),
                phone: Some("98450".into()),
                skills: Some(vec!["rust".into()]),
                ..Default::default()
            },
        )
        .await;
        let service = InterestService::new(
            store.interests.clone(),
            store.drives.clone(),
            store.users.clone(),
        );
        Fixture {
            store,
            service,
            company,
            candidate,
        }
    }

    async fn drive(fx: &Fixture, status: DriveStatus, days_ahead: i64) -> Drive {
        let details = DriveDetails {
            title: "Walk-in".into(),
            description: None,
            requirements: None,
            location: Location {
                address: "5 Ring Road".into(),
                city: "Chennai".into(),
                state: None,
                pincode: None,
                coordinates: None,
            },
            date: Utc::now() + Duration::days(days_ahead),
            start_time: "10:00".into(),
            end_time: "13:00".into(),
            job_categories: vec![],
            specific_skills: vec![],
            experience_level: vec![],
            status,
            max_candidates: None,
        };
        fx.store
            .drives
            .insert(fx.company.user_id, details)
            .await
            .unwrap()
    }

    async fn counter(fx: &Fixture, drive_id: Uuid) -> i32 {
        fx.store
            .drives
            .find_by_id(drive_id)
            .await
            .unwrap()
            .unwrap()
            .current_interested
    }

    #[tokio::test]
    async fn express_then_withdraw_keeps_counter_in_step() {
        let fx = fixture().await;
        let d = drive(&fx, DriveStatus::Active, 2).await;

        let interest = fx.service.express(fx.candidate, d.id).await.unwrap();
        assert_eq!(interest.status, InterestStatus::Interested);
        assert_eq!(counter(&fx, d.id).await, 1);
        assert!(fx.service.check_interest(fx.candidate, d.id).await.unwrap());

        let again = fx.service.express(fx.candidate, d.id).await;
        assert!(matches!(again, Err(Error::AlreadyInterested)));
        assert_eq!(counter(&fx, d.id).await, 1);

        let withdrawn = fx.service.withdraw(fx.candidate, d.id).await.unwrap();
        assert_eq!(withdrawn.status, InterestStatus::Withdrawn);
        assert_eq!(counter(&fx, d.id).await, 0);
        assert!(!fx.service.check_interest(fx.candidate, d.id).await.unwrap());

        let twice = fx.service.withdraw(fx.candidate, d.id).await;
        assert!(matches!(twice, Err(Error::NotFound(_))));
        assert_eq!(counter(&fx, d.id).await, 0);
    }

    #[tokio::test]
    async fn re_expressing_after_withdrawal_is_rejected() {
        let fx = fixture().await;
        let d = drive(&fx, DriveStatus::Active, 2).await;
        fx.service.express(fx.candidate, d.id).await.unwrap();
        fx.service.withdraw(fx.candidate, d.id).await.unwrap();

        let result = fx.service.express(fx.candidate, d.id).await;
        assert!(matches!(result, Err(Error::AlreadyInterested)));
        assert_eq!(counter(&fx, d.id).await, 0);
    }

    #[tokio::test]
    async fn only_open_drives_accept_interest() {
        let fx = fixture().await;
        let closed = drive(&fx, DriveStatus::Closed, 2).await;
        let past = drive(&fx, DriveStatus::Active, -1).await;

        for id in [closed.id, past.id, Uuid::new_v4()] {
            let result = fx.service.express(fx.candidate, id).await;
            assert!(matches!(result, Err(Error::NotFound(_))));
        }
    }

    #[tokio::test]
    async fn companies_cannot_act_as_candidates() {
        let fx = fixture().await;
        let d = drive(&fx, DriveStatus::Active, 2).await;

        assert!(matches!(
            fx.service.express(fx.company, d.id).await,
            Err(Error::Forbidden(_))
        ));
        assert!(matches!(
            fx.service.check_interest(fx.company, d.id).await,
            Err(Error::Forbidden(_))
        ));
        assert!(matches!(
            fx.service.my_interests(fx.company).await,
            Err(Error::Forbidden(_))
        ));
        assert!(matches!(
            fx.service.drive_candidates(fx.candidate, d.id).await,
            Err(Error::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn my_interests_expand_drive_and_company_newest_first() {
        let fx = fixture().await;
        let first = drive(&fx, DriveStatus::Active, 2).await;
        let second = drive(&fx, DriveStatus::Active, 5).await;
        fx.service.express(fx.candidate, first.id).await.unwrap();
        fx.service.express(fx.candidate, second.id).await.unwrap();

        let mine = fx.service.my_interests(fx.candidate).await.unwrap();
        let ids: Vec<Uuid> = mine.iter().map(|i| i.drive.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        let company = mine[0].drive.company.as_ref().unwrap();
        assert_eq!(company.company_name.as_deref(), Some("Acme"));
    }

    #[tokio::test]
    async fn drive_candidates_requires_ownership() {
        let fx = fixture().await;
        let d = drive(&fx, DriveStatus::Active, 2).await;
        fx.service.express(fx.candidate, d.id).await.unwrap();

        let applicants = fx.service.drive_candidates(fx.company, d.id).await.unwrap();
        assert_eq!(applicants.len(), 1);
        assert_eq!(applicants[0].candidate.full_name.as_deref(), Some("Ravi K"));
        assert_eq!(applicants[0].candidate.email, "ravi@example.com");

        let rival = account(
            &fx.store,
            UserKind::Company,
            "hr@globex.example",
            ProfileFields::default(),
        )
        .await;
        let result = fx.service.drive_candidates(rival, d.id).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
