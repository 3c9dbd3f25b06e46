//! Process-wide configuration for formreader.
//!
//! Everything is read from the environment once at startup (after `.env` has
//! been loaded) and then passed by reference to the extraction client and the
//! form store. Database values are not validated here: a bad host or port
//! shows up later as a connection failure, so commands that never touch the
//! database still start.

use std::path::PathBuf;

use thiserror::Error;

/// Default Document AI project (production form processor).
pub const DEFAULT_PROJECT_ID: &str = "599834168707";
/// Default Document AI region.
pub const DEFAULT_LOCATION: &str = "us";
/// Default Document AI processor.
pub const DEFAULT_PROCESSOR_ID: &str = "98b736a0b757dd27";
/// Default service-account key file.
pub const DEFAULT_CREDENTIALS_PATH: &str = "key.json";
/// Default MySQL port.
pub const DEFAULT_DB_PORT: &str = "3306";

/// Errors while turning settings into connection parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Identity of the Document AI processor every upload is sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    pub project_id: String,
    pub location: String,
    pub processor_id: String,
}

impl ProcessorConfig {
    /// Resource name, `projects/{p}/locations/{l}/processors/{id}`.
    pub fn resource_name(&self) -> String {
        format!(
            "projects/{}/locations/{}/processors/{}",
            self.project_id, self.location, self.processor_id
        )
    }

    /// Full URL of the `:process` method for this processor.
    pub fn process_url(&self) -> String {
        format!(
            "https://{}-documentai.googleapis.com/v1/{}:process",
            self.location,
            self.resource_name()
        )
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            project_id: DEFAULT_PROJECT_ID.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            processor_id: DEFAULT_PROCESSOR_ID.to_string(),
        }
    }
}

/// MySQL connection parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    /// Raw `DB_PORT` value, parsed when connecting.
    pub port: String,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl DatabaseConfig {
    /// Connection URL understood by diesel-async's MySQL driver.
    pub fn url(&self) -> Result<String, ConfigError> {
        let port = self
            .port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "DB_PORT",
                value: self.port.clone(),
            })?;

        Ok(format!(
            "mysql://{}:{}@{}:{}/{}",
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
            self.host,
            port,
            self.name
        ))
    }
}

// Keeps the password out of logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .finish()
    }
}

/// All runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub processor: ProcessorConfig,
    pub database: DatabaseConfig,
    /// Service-account key used to authenticate against Document AI.
    pub credentials_path: PathBuf,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database = DatabaseConfig {
            host: get("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: get("DB_PORT").unwrap_or_else(|| DEFAULT_DB_PORT.to_string()),
            user: get("DB_USER").unwrap_or_default(),
            password: get("DB_PASSWORD").unwrap_or_default(),
            name: get("DB_DEFAULT_BASE")
                .or_else(|| get("DB_NAME_ONLINE"))
                .unwrap_or_default(),
        };

        let defaults = ProcessorConfig::default();
        let processor = ProcessorConfig {
            project_id: get("DOCAI_PROJECT_ID").unwrap_or(defaults.project_id),
            location: get("DOCAI_LOCATION").unwrap_or(defaults.location),
            processor_id: get("DOCAI_PROCESSOR_ID").unwrap_or(defaults.processor_id),
        };

        let credentials_path = get("GOOGLE_APPLICATION_CREDENTIALS")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH));

        Self {
            processor,
            database,
            credentials_path,
        }
    }
}
