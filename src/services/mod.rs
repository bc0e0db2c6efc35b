pub mod auth_service;
pub mod drive_service;
pub mod interest_service;
pub mod mail_service;
pub mod user_service;
