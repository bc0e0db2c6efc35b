use chrono::{DateTime, Duration, Utc};

pub const RESET_TOKEN_TTL_HOURS: i64 = 1;
pub const SESSION_TTL_DAYS: i64 = 7;

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn reset_token_expiry(from: DateTime<Utc>) -> DateTime<Utc> {
    from + Duration::hours(RESET_TOKEN_TTL_HOURS)
}
