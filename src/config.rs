use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Nickname length ceiling of the game client.
pub const MAX_NICKNAME_CHARS: usize = 15;

/// Lower bound of the default query window, 2010-01-01T00:00:00Z.
pub fn default_start_time_floor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub start_time_floor: DateTime<Utc>,
    pub max_nickname_chars: usize,
    /// Per-variant stats call timeout. Expiry fails the whole query.
    pub stats_timeout: Option<Duration>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            start_time_floor: default_start_time_floor(),
            max_nickname_chars: MAX_NICKNAME_CHARS,
            stats_timeout: None,
        }
    }
}

/// Settings of the command-line front end.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub query: QueryConfig,
    pub fixtures_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut query = QueryConfig::default();

        if let Ok(raw) = env::var("MAJSOUL_START_FLOOR") {
            query.start_time_floor = DateTime::parse_from_rfc3339(&raw)
                .context("MAJSOUL_START_FLOOR must be an RFC 3339 timestamp")?
                .with_timezone(&Utc);
        }

        if let Ok(raw) = env::var("MAJSOUL_STATS_TIMEOUT_MS") {
            let millis: u64 = raw
                .parse()
                .context("MAJSOUL_STATS_TIMEOUT_MS must be a number")?;
            query.stats_timeout = Some(Duration::from_millis(millis));
        }

        let fixtures_path = env::var("MAJSOUL_FIXTURES").ok().map(PathBuf::from);

        Ok(Self {
            query,
            fixtures_path,
        })
    }
}
