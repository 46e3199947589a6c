use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::errors::F1LabError;
use crate::session::{SessionKey, SessionType};

const CONFIG_DIR_NAME: &str = "f1lab";
const CONFIG_FILE_NAME: &str = "config.json";
/// Environment variable overriding the configured backend URL
pub const API_URL_ENV: &str = "F1LAB_API_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
/// Loading a session for the first time makes the backend download it
pub const DEFAULT_TIMEOUT_S: u64 = 60;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: String,
    pub timeout_s: u64,
    pub default_year: i32,
    pub default_event: String,
    pub default_session_type: SessionType,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_s: DEFAULT_TIMEOUT_S,
            default_year: 2021,
            default_event: "Monaco".to_string(),
            default_session_type: SessionType::Race,
        }
    }
}

impl AppConfig {
    /// Location of the config file in the user's config directory
    pub fn default_path() -> Result<PathBuf, F1LabError> {
        Ok(dirs::config_dir()
            .ok_or(F1LabError::NoConfigDir)?
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }

    /// Read the config file at `path`, `None` when it does not exist
    pub fn from_path(path: &Path) -> Result<Option<Self>, F1LabError> {
        if !path.exists() {
            return Ok(None);
        }
        let file =
            std::fs::File::open(path).map_err(|e| F1LabError::ConfigIOError { source: e })?;
        serde_json::from_reader(file)
            .map(Some)
            .map_err(|e| F1LabError::ConfigSerializeError { source: e })
    }

    /// Config from the user's config file, or defaults when it is missing or
    /// unreadable. The API URL environment override is applied either way.
    pub fn load() -> Self {
        let from_file = Self::default_path().and_then(|path| Self::from_path(&path));
        let config = match from_file {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("Could not load config file, using defaults: {}", e);
                Self::default()
            }
        };
        config.with_env_override(std::env::var(API_URL_ENV).ok())
    }

    /// Replace the API URL when an override is set and not blank
    pub fn with_env_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        self
    }

    pub fn default_session(&self) -> SessionKey {
        SessionKey::new(
            self.default_year,
            self.default_event.clone(),
            self.default_session_type,
        )
    }

    /// Remember `key` as the session to preselect next time
    pub fn remember_session(&mut self, key: &SessionKey) {
        self.default_year = key.year;
        self.default_event = key.event.clone();
        self.default_session_type = key.session_type;
    }

    pub fn save(&self) -> Result<(), F1LabError> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), F1LabError> {
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| F1LabError::ConfigIOError { source: e })?;
        }

        let file =
            std::fs::File::create(path).map_err(|e| F1LabError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| F1LabError::ConfigSerializeError { source: e })
    }
}
