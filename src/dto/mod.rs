pub mod auth_dto;
pub mod drive_dto;
pub mod interest_dto;
pub mod user_dto;
