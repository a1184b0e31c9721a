use std::path::PathBuf;

use anyhow::Result;

use crate::agents::retriever::DEFAULT_LIMIT;

pub const DEFAULT_DRIVE_ACCOUNT: &str = "demo@pdm.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Dataset overrides; the bundled seeds are used when unset.
    pub deals_path: Option<PathBuf>,
    pub qa_path: Option<PathBuf>,
    pub drive_path: Option<PathBuf>,
    pub drive_account: String,
    pub cors_origin: Option<String>,
    pub log_level: String,
    /// Default page size for `/retrieve` when the request omits one.
    pub retrieve_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            deals_path: None,
            qa_path: None,
            drive_path: None,
            drive_account: DEFAULT_DRIVE_ACCOUNT.to_string(),
            cors_origin: None,
            log_level: "info".to_string(),
            retrieve_limit: DEFAULT_LIMIT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Ok(Config {
            port: match non_empty_var("PORT") {
                Some(port) => port.parse()?,
                None => defaults.port,
            },
            deals_path: non_empty_var("DEALS_PATH").map(PathBuf::from),
            qa_path: non_empty_var("QA_PATH").map(PathBuf::from),
            drive_path: non_empty_var("DRIVE_PATH").map(PathBuf::from),
            drive_account: non_empty_var("DRIVE_ACCOUNT").unwrap_or(defaults.drive_account),
            cors_origin: non_empty_var("CORS_ORIGIN"),
            log_level: non_empty_var("LOG_LEVEL").unwrap_or(defaults.log_level),
            retrieve_limit: match non_empty_var("RETRIEVE_LIMIT") {
                Some(limit) => limit.parse()?,
                None => defaults.retrieve_limit,
            },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
