//! Environment-driven CLI configuration.
//!
//! # Invariants
//! - The data directory is always absolute.
//! - The generation api key is read from the environment only.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use studynotes_core::{default_log_level, GenerationConfig};

pub const DATA_DIR_ENV: &str = "STUDYNOTES_DATA_DIR";
pub const LOG_LEVEL_ENV: &str = "STUDYNOTES_LOG_LEVEL";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "STUDYNOTES_GENERATION_MODEL";
pub const ENDPOINT_ENV: &str = "STUDYNOTES_GENERATION_ENDPOINT";

const DEFAULT_DATA_DIR: &str = ".studynotes";
const DATABASE_FILE_NAME: &str = "studynotes.sqlite3";

#[derive(Debug)]
pub enum ConfigError {
    CurrentDir(std::io::Error),
    DotEnv(dotenvy::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CurrentDir(err) => write!(f, "cannot resolve current directory: {err}"),
            Self::DotEnv(err) => write!(f, "cannot read .env file: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CurrentDir(err) => Some(err),
            Self::DotEnv(err) => Some(err),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub generation: GenerationConfig,
}

impl CliConfig {
    /// Reads the process environment, after loading `.env` when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(err) if err.not_found() => {}
            Err(err) => return Err(ConfigError::DotEnv(err)),
        }
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        Ok(Self::from_lookup(&cwd, |key| std::env::var(key).ok()))
    }

    /// Builds config from an arbitrary variable source; relative data
    /// directories are resolved against `cwd`.
    pub fn from_lookup<F>(cwd: &Path, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let data_dir = non_blank(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let data_dir = if data_dir.is_absolute() {
            data_dir
        } else {
            cwd.join(data_dir)
        };

        let mut generation = GenerationConfig::new(lookup(API_KEY_ENV));
        if let Some(model) = non_blank(MODEL_ENV) {
            generation = generation.with_model(model.trim());
        }
        if let Some(endpoint) = non_blank(ENDPOINT_ENV) {
            generation = generation.with_endpoint(endpoint.trim());
        }

        Self {
            data_dir,
            log_level: non_blank(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            generation,
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}
