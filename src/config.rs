use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_refresh_per_min: u32,
    pub rate_logout_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    /// roster loaded through the importer at startup
    pub seed_file: Option<PathBuf>,
    /// login ids granted the HR admin role, stored uppercase
    pub hr_admin_ids: Vec<String>,
    /// charge leave on working days instead of business days
    pub exclude_public_holidays: bool,
    pub upcoming_window_days: u32,
    pub history_year: i32,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("JWT_SECRET must be set"))?;

        Ok(Self {
            jwt_secret,
            server_addr: lookup("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            access_token_ttl: parse_or(&lookup, "ACCESS_TOKEN_TTL", 900)?, // default 15 min
            refresh_token_ttl: parse_or(&lookup, "REFRESH_TOKEN_TTL", 604_800)?, // default 7 days

            rate_login_per_min: parse_or(&lookup, "RATE_LOGIN_PER_MIN", 60)?,
            rate_refresh_per_min: parse_or(&lookup, "RATE_REFRESH_PER_MIN", 30)?,
            rate_logout_per_min: parse_or(&lookup, "RATE_LOGOUT_PER_MIN", 30)?,
            rate_protected_per_min: parse_or(&lookup, "RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api".to_string()),

            seed_file: lookup("SEED_FILE")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            hr_admin_ids: lookup("HR_ADMIN_IDS")
                .map(|raw| {
                    raw.split(',')
                        .map(|id| id.trim().to_uppercase())
                        .filter(|id| !id.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            exclude_public_holidays: parse_or(&lookup, "EXCLUDE_PUBLIC_HOLIDAYS", false)?,
            upcoming_window_days: parse_or(&lookup, "UPCOMING_WINDOW_DAYS", 30)?,
            history_year: parse_or(&lookup, "HISTORY_YEAR", 2025)?,
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
        })
    }

    pub fn is_hr_admin(&self, login_id: &str) -> bool {
        let login_id = login_id.trim().to_uppercase();
        self.hr_admin_ids.iter().any(|id| *id == login_id)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        _ => Ok(default),
    }
}
