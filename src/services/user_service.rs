use std::sync::Arc;

use tracing::info;

use crate::database::UserRepository;
use crate::dto::user_dto::{ProfileFields, UserResponse};
use crate::error::{Error, Result};
use crate::models::user::Identity;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn profile(&self, identity: Identity) -> Result<UserResponse> {
        let user = self
            .users
            .find_by_id(identity.user_id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".into()))?;
        Ok(UserResponse::from(user))
    }

    /// Merges the supplied profile fields. Email, kind and password are not
    /// reachable from here.
    pub async fn update_profile(
        &self,
        identity: Identity,
        fields: ProfileFields,
    ) -> Result<UserResponse> {
        let mut user = self
            .users
            .find_by_id(identity.user_id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".into()))?;
        fields.apply_to(&mut user.profile);

        let user = self
            .users
            .update_profile(identity.user_id, &user.profile)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".into()))?;
        info!(user_id = %user.id, "profile updated");
        Ok(UserResponse::from(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{Insertion, Store};
    use crate::models::user::{NewUser, UserKind};
    use uuid::Uuid;

    #[tokio::test]
    async fn update_merges_only_supplied_fields() {
        let store = Store::memory();
        let user = match store
            .users
            .insert(NewUser {
                kind: UserKind::Candidate,
                email: "meera@example.com".into(),
                password_hash: "unused".into(),
                profile: ProfileFields {
                    full_name: Some("Meera".into()),
                    phone: Some("111".into()),
                    ..Default::default()
                }
                .into_profile(),
            })
            .await
            .unwrap()
        {
            Insertion::Created(user) => user,
            Insertion::Duplicate => unreachable!(),
        };
        let service = UserService::new(store.users.clone());
        let identity = Identity::new(user.id, user.kind);

        let updated = service
            .update_profile(
                identity,
                ProfileFields {
                    phone: Some("222".into()),
                    skills: Some(vec!["welding".into()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.profile.full_name.as_deref(), Some("Meera"));
        assert_eq!(updated.profile.phone.as_deref(), Some("222"));
        assert_eq!(updated.profile.skills, Some(vec!["welding".to_string()]));
        assert_eq!(updated.email, "meera@example.com");
    }

    #[tokio::test]
    async fn unknown_account_is_not_found() {
        let service = UserService::new(Store::memory().users.clone());
        let ghost = Identity::new(Uuid::new_v4(), UserKind::Company);
        assert!(matches!(service.profile(ghost).await, Err(Error::NotFound(_))));
    }
}
