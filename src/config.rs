use std::env;
use std::time::Duration;

use chrono::{FixedOffset, NaiveDate, Utc};

use crate::services::week;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote REST backend, without trailing slash.
    pub backend_url: String,
    pub backend_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub app_base_url: String,
    /// Offset of the kitchen's time zone (Africa/Tunis by default).
    pub menu_utc_offset_minutes: i32,
    /// Hour on Thursday from which next week becomes the editable menu week.
    pub menu_cutoff_hour: u32,
    pub max_upload_bytes: usize,
    /// Menu drafts untouched for this long are dropped.
    pub draft_idle_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            backend_url: required("BACKEND_URL")?.trim_end_matches('/').to_string(),
            backend_timeout: Duration::from_secs(
                env::var("BACKEND_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "15".into())
                    .parse()?,
            ),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            menu_utc_offset_minutes: env::var("MENU_UTC_OFFSET_MINUTES")
                .unwrap_or_else(|_| "60".into())
                .parse()?,
            menu_cutoff_hour: env::var("MENU_CUTOFF_HOUR")
                .unwrap_or_else(|_| "17".into())
                .parse()?,
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (10 * 1024 * 1024).to_string())
                .parse()?,
            draft_idle_timeout: Duration::from_secs(
                env::var("DRAFT_IDLE_MINUTES")
                    .unwrap_or_else(|_| "120".into())
                    .parse::<u64>()?
                    * 60,
            ),
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults for everything but the backend location.
    pub fn for_backend(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into().trim_end_matches('/').to_string(),
            backend_timeout: Duration::from_secs(15),
            host: "127.0.0.1".into(),
            port: 8080,
            app_base_url: "http://localhost:3000".into(),
            menu_utc_offset_minutes: 60,
            menu_cutoff_hour: 17,
            max_upload_bytes: 10 * 1024 * 1024,
            draft_idle_timeout: Duration::from_secs(2 * 60 * 60),
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.backend_url.starts_with("http://") || self.backend_url.starts_with("https://"),
            "BACKEND_URL must be an http(s) URL: {}",
            self.backend_url
        );
        anyhow::ensure!(self.menu_cutoff_hour < 24, "MENU_CUTOFF_HOUR must be between 0 and 23");
        anyhow::ensure!(!self.draft_idle_timeout.is_zero(), "DRAFT_IDLE_MINUTES must be positive");
        self.menu_offset()?;
        Ok(())
    }

    pub fn menu_offset(&self) -> anyhow::Result<FixedOffset> {
        FixedOffset::east_opt(self.menu_utc_offset_minutes * 60).ok_or_else(|| {
            anyhow::anyhow!(
                "MENU_UTC_OFFSET_MINUTES out of range: {}",
                self.menu_utc_offset_minutes
            )
        })
    }

    /// Monday of the week the kitchen is composing right now.
    pub fn current_menu_monday(&self) -> anyhow::Result<NaiveDate> {
        let now = Utc::now().with_timezone(&self.menu_offset()?);
        Ok(week::current_menu_monday(&now, self.menu_cutoff_hour))
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("Missing required env var: {}", key))
}
