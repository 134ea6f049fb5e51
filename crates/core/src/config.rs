use std::{
    fs::{self, File},
    io::Write,
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::{
    assets::{get_config_dir, get_default_config},
    client::AskMySiteClient,
    error::ClientError,
    model::WidgetOverrides,
    storage::KeyValueStore,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File system error: {0}")]
    IO(#[from] std::io::Error),
    #[error("YAML parsing error: {0}")]
    YAMLError(#[from] serde_yaml::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Host side settings for talking to the AskMySite API.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Literal key, or `env:NAME` to read it from the environment.
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub widget: WidgetOverrides,
}

impl Config {
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        let key = match self.api_key.strip_prefix("env:") {
            Some(name) => {
                let name = name.trim();
                std::env::var(name).map_err(|_| {
                    ConfigError::Config(format!("Environment variable {name} not found"))
                })?
            }
            None => self.api_key.clone(),
        };

        if key.trim().is_empty() {
            return Err(ConfigError::Config("api_key is empty".to_string()));
        }
        Ok(key)
    }

    /// Builds a client persisting its state in `store`.
    pub fn build_client(
        &self,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<AskMySiteClient, ConfigError> {
        let mut http = reqwest::Client::builder();
        if let Some(secs) = self.timeout_secs {
            http = http.timeout(Duration::from_secs(secs));
        }
        let http = http.build().map_err(ClientError::from)?;

        let mut builder = AskMySiteClient::builder(self.resolve_api_key()?)
            .store(store)
            .http_client(http);
        if let Some(url) = &self.base_url {
            builder = builder.base_url(url.clone());
        }
        Ok(builder.build()?)
    }
}

#[instrument(skip(config_path))]
pub fn create_or_get_config_file(
    config_path: Option<PathBuf>,
) -> Result<(bool, PathBuf), ConfigError> {
    let actual_path = config_path.unwrap_or_else(|| get_config_dir().join("askmysite.yml"));

    let parent_dir = actual_path.parent().ok_or_else(|| {
        ConfigError::IO(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Config path has no parent directory",
        ))
    })?;

    if !parent_dir.exists() {
        fs::create_dir_all(parent_dir)?;
    }

    if actual_path.exists() {
        Ok((true, actual_path))
    } else {
        File::create(&actual_path)?.write_all(get_default_config().as_bytes())?;
        Ok((false, actual_path))
    }
}

#[instrument(skip(config_path))]
pub fn get_config(config_path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let (_, config_file) = create_or_get_config_file(config_path)?;
    let content = fs::read_to_string(&config_file)?;
    Ok(serde_yaml::from_str(&content)?)
}
