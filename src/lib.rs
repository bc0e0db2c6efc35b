pub mod client;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::database::Store;
use crate::services::{
    auth_service::AuthService, drive_service::DriveService, interest_service::InterestService,
    mail_service::Mailer, user_service::UserService,
};
use crate::utils::jwt::JwtKeys;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub jwt: JwtKeys,
    pub auth_service: AuthService,
    pub drive_service: DriveService,
    pub interest_service: InterestService,
    pub user_service: UserService,
}

impl AppState {
    pub fn new(config: &Config, store: Store, mailer: Arc<dyn Mailer>) -> Self {
        let jwt = JwtKeys::new(&config.jwt_secret);

        let auth_service = AuthService::new(store.users.clone(), jwt.clone(), mailer);
        let drive_service = DriveService::new(store.drives.clone(), store.users.clone());
        let interest_service = InterestService::new(
            store.interests.clone(),
            store.drives.clone(),
            store.users.clone(),
        );
        let user_service = UserService::new(store.users.clone());

        Self {
            store,
            jwt,
            auth_service,
            drive_service,
            interest_service,
            user_service,
        }
    }
}
