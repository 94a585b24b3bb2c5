use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod board;
pub mod checkpoint;
pub mod common;
pub mod draft;
pub mod evolution;
pub mod health;
pub mod league;
pub mod library;
pub mod phase;
pub mod pool;
pub mod season;
pub mod sse;
pub mod validation;
pub mod week;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
