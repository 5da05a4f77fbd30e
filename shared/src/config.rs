//! Configuration management for the skill Lambda.

use std::env;
use std::time::Duration;

use chrono_tz::Tz;

use crate::{Error, Result};

/// Time zone every event is created in.
pub const SKILL_TIME_ZONE: Tz = chrono_tz::America::Sao_Paulo;

/// OAuth scope granting calendar write access.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";
const DEFAULT_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the service account JSON key
    pub credentials_file: String,
    /// Calendar that receives new events
    pub calendar_id: String,
    /// Google Calendar API base URL
    pub calendar_api_base: String,
    /// Timeout applied to every outbound HTTP request
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let calendar_id = lookup("CALENDAR_ID")
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::Config("CALENDAR_ID must be set to a calendar id".to_string()))?;

        let http_timeout = match lookup("CALENDAR_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                Error::Config(format!("Invalid CALENDAR_HTTP_TIMEOUT_SECS '{}': {}", raw, e))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            credentials_file: lookup("GOOGLE_CREDENTIALS_FILE")
                .unwrap_or_else(|| DEFAULT_CREDENTIALS_FILE.to_string()),
            calendar_id,
            calendar_api_base: lookup("CALENDAR_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_CALENDAR_API_BASE.to_string()),
            http_timeout: Duration::from_secs(http_timeout),
        })
    }
}
