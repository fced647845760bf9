/*!
    Persistent configuration for a source component.
*/

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use sidechannel_buffers::{BufferLimits, ThreadPriority};
use sidechannel_resources::TagZeroPolicy;

/**
    Errors that can occur while loading or saving a [`SideChannelConfig`].
*/
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] sidechannel_types::Error),
}

/**
    Configuration for a [`crate::SourceFilter`].

    Every field has a default, so a partial JSON file only overrides what it
    names.
*/
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideChannelConfig {
    /// How bulk resource removal treats the zero tag.
    pub tag_zero_policy: TagZeroPolicy,
    /// Fill limits handed to every monitored queue.
    pub buffer: BufferLimits,
    /// Priority reported for the buffering worker.
    pub worker_priority: ThreadPriority,
}

impl SideChannelConfig {
    /**
        Path of the per-user config file, if the platform has a data directory.
    */
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("sidechannel").join("config.json"))
    }

    /**
        Load the config from the per-user config file.

        Falls back to defaults if there is no data directory or no file.
    */
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /**
        Load the config from `path`, falling back to defaults if it does not exist.
    */
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let config = Self::from_json(&contents)?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /**
        Parse and validate a config from a JSON string.
    */
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /**
        Write the config to `path` as pretty JSON, creating parent directories.
    */
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /**
        Check the buffer limits and worker priority.
    */
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.buffer.validate()?;
        let range = ThreadPriority::IDLE..=ThreadPriority::TIME_CRITICAL;
        if !range.contains(&self.worker_priority) {
            return Err(sidechannel_types::Error::invalid_argument(format!(
                "worker priority {} is outside {}..={}",
                self.worker_priority.0,
                ThreadPriority::IDLE.0,
                ThreadPriority::TIME_CRITICAL.0
            ))
            .into());
        }
        Ok(())
    }
}
