pub mod drive;
pub mod interest;
pub mod user;
