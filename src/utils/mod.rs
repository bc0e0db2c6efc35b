pub mod crypto;
pub mod jwt;
pub mod list;
pub mod time;
pub mod token;
