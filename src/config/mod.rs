use crate::core::{AppError, ReportingCalendar, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: Option<DatabaseConfig>,
    pub server: ServerConfig,
    pub notifications: NotificationConfig,
}

/// Which store backs the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Mysql,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Mysql => "mysql",
            StorageBackend::Memory => "memory",
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(StorageBackend::Mysql),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(AppError::Configuration(format!(
                "Invalid STORAGE_BACKEND: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: LogFormat,
    pub reporting_offset: FixedOffset,
    pub dashboard_top_employees: usize,
    pub dashboard_recent_sales: usize,
    pub storage: StorageBackend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationConfig {
    pub webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
    pub withdrawal_notify_email: Option<String>,
}

impl AppConfig {
    pub fn calendar(&self) -> ReportingCalendar {
        ReportingCalendar::new(self.reporting_offset)
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let storage: StorageBackend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "mysql".to_string())
            .parse()?;

        let reporting_offset = ReportingCalendar::parse_offset(
            &env::var("REPORTING_UTC_OFFSET").unwrap_or_else(|_| "+00:00".to_string()),
        )
        .map_err(|e| AppError::Configuration(format!("Invalid REPORTING_UTC_OFFSET: {}", e)))?;

        let log_format = match env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "pretty".to_string())
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".to_string()),
                log_format,
                reporting_offset,
                dashboard_top_employees: env::var("DASHBOARD_TOP_EMPLOYEES")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid DASHBOARD_TOP_EMPLOYEES".to_string())
                    })?,
                dashboard_recent_sales: env::var("DASHBOARD_RECENT_SALES")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid DASHBOARD_RECENT_SALES".to_string())
                    })?,
                storage,
            },
            database: match storage {
                StorageBackend::Mysql => Some(DatabaseConfig::from_env()?),
                StorageBackend::Memory => None,
            },
            server: ServerConfig::from_env()?,
            notifications: NotificationConfig {
                webhook_url: optional_var("NOTIFY_WEBHOOK_URL"),
                webhook_secret: optional_var("NOTIFY_WEBHOOK_SECRET"),
                withdrawal_notify_email: optional_var("WITHDRAWAL_NOTIFY_EMAIL"),
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.app.dashboard_top_employees == 0 {
            return Err(AppError::Configuration(
                "DASHBOARD_TOP_EMPLOYEES must be greater than 0".to_string(),
            ));
        }

        if self.app.dashboard_recent_sales == 0 {
            return Err(AppError::Configuration(
                "DASHBOARD_RECENT_SALES must be greater than 0".to_string(),
            ));
        }

        if let Some(database) = &self.database {
            database.validate()?;
        }

        if self.notifications.webhook_url.is_some() && self.notifications.webhook_secret.is_none() {
            return Err(AppError::Configuration(
                "NOTIFY_WEBHOOK_SECRET is required when NOTIFY_WEBHOOK_URL is set".to_string(),
            ));
        }

        Ok(())
    }
}
