//! Handles settings for the application.
//!
//! Layers, lowest priority first: built-in defaults, the TOML file
//! (`config/fairshare.toml` unless `--config` says otherwise, optional),
//! `FAIRSHARE_*` environment variables (`FAIRSHARE_SERVER__PORT=8080`), then
//! command line flags.

use chrono_tz::Tz;
use clap::Parser;
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/fairshare.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl From<String> for Database {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("memory") {
            Self::Memory
        } else {
            Self::Sqlite(value)
        }
    }
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Self::Memory => "sqlite::memory:".to_string(),
            Self::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
    /// IANA zone name used for "today" and "this month".
    pub timezone: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
            database: Database::Sqlite("fairshare.db".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn timezone(&self) -> Result<Tz> {
        self.app
            .timezone
            .parse()
            .map_err(|_| AppError::Timezone(self.app.timezone.clone()))
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}

#[derive(Debug, Parser)]
#[command(name = "fairshare", version, about = "Shared expense tracker server")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the database ("memory" or a SQLite file path).
    #[arg(long)]
    database: Option<String>,
    /// Override the listen address.
    #[arg(long)]
    bind: Option<String>,
    /// Override the listen port.
    #[arg(long)]
    port: Option<u16>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Override the log level (error, warn, info, debug, trace).
    #[arg(long)]
    level: Option<String>,
}

pub fn load() -> Result<Settings> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(
        config::Environment::with_prefix("FAIRSHARE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(database) = args.database {
        settings.server.database = Database::from(database);
    }
    if let Some(bind) = args.bind {
        settings.server.bind = bind;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    if let Some(timezone) = args.timezone {
        settings.app.timezone = timezone;
    }
    if let Some(level) = args.level {
        settings.app.level = level;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_from_string() {
        assert_eq!(Database::from("memory".to_string()), Database::Memory);
        assert_eq!(Database::Memory.url(), "sqlite::memory:");
        assert_eq!(
            Database::from("data/app.db".to_string()).url(),
            "sqlite:data/app.db?mode=rwc"
        );
    }

    #[test]
    fn defaults_use_utc() {
        let settings = Settings::default();
        assert_eq!(settings.timezone().unwrap(), Tz::UTC);
        assert_eq!(settings.address(), "127.0.0.1:3000");
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let mut settings = Settings::default();
        settings.app.timezone = "Mars/Olympus".to_string();
        assert!(matches!(settings.timezone(), Err(AppError::Timezone(_))));
    }
}
