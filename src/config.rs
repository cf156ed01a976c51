use std::env;

use anyhow::anyhow;
use chrono::{FixedOffset, Offset, Utc};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub calendar_offset: FixedOffset,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(5);
        let calendar_offset = match env::var("CALENDAR_UTC_OFFSET_MINUTES") {
            Ok(s) => parse_offset_minutes(&s)?,
            Err(_) => utc_offset(),
        };

        Ok(Self {
            database_url,
            bind_addr,
            db_max_connections,
            calendar_offset,
        })
    }
}

pub fn utc_offset() -> FixedOffset {
    Utc.fix()
}

/// Minutes east of UTC, e.g. `120` for +02:00 or `-300` for -05:00.
pub fn parse_offset_minutes(s: &str) -> anyhow::Result<FixedOffset> {
    let minutes: i32 = s
        .trim()
        .parse()
        .map_err(|_| anyhow!("CALENDAR_UTC_OFFSET_MINUTES must be an integer (got {s:?})"))?;

    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| anyhow!("CALENDAR_UTC_OFFSET_MINUTES out of range (got {minutes})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offsets_either_side_of_utc() {
        assert_eq!(parse_offset_minutes("120").unwrap().local_minus_utc(), 7200);
        assert_eq!(parse_offset_minutes(" -300 ").unwrap().local_minus_utc(), -18000);
        assert_eq!(parse_offset_minutes("0").unwrap(), utc_offset());
    }

    #[test]
    fn rejects_garbage_and_out_of_range() {
        assert!(parse_offset_minutes("+02:00").is_err());
        assert!(parse_offset_minutes("").is_err());
        assert!(parse_offset_minutes("1440").is_err());
        assert!(parse_offset_minutes("-1440").is_err());
        assert!(parse_offset_minutes("1439").is_ok());
    }
}
