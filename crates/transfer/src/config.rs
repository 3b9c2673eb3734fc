//! Transfer configuration.
//!
//! Stored as TOML:
//! - Linux: `~/.config/meshbot/transfer.toml`
//! - Windows: `%APPDATA%/meshbot/transfer.toml`

use std::path::PathBuf;

use meshbot_protocol::MediaSource;
use serde::{Deserialize, Serialize};

use crate::TransferError;
use crate::request::TransferRequest;

/// Configuration surface consumed by the transfer subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Root directory for downloaded files.
    #[serde(default = "default_data_root")]
    pub data_root: String,

    /// Local hour (0-23) at which messages bucket into the next order date.
    #[serde(default = "default_day_border")]
    pub day_border_local_hour: u8,
}

fn default_data_root() -> String {
    "DATA".into()
}

fn default_day_border() -> u8 {
    20
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            day_border_local_hour: default_day_border(),
        }
    }
}

impl TransferConfig {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> Result<Self, TransferError> {
        let path = config_path();

        let config = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str::<Self>(&content).map_err(|e| TransferError::Config(e.to_string()))?
        } else {
            let config = Self::default();
            config.save()?;
            config
        };

        if config.day_border_local_hour > 23 {
            return Err(TransferError::InvalidDayBorder(config.day_border_local_hour));
        }
        Ok(config)
    }

    /// Saves the current configuration to disk.
    pub fn save(&self) -> Result<(), TransferError> {
        let path = config_path();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| TransferError::Config(e.to_string()))?;
        std::fs::write(&path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Builds a transfer request for `source` using this configuration's
    /// day-border hour.
    pub fn request_for(
        &self,
        source: &dyn MediaSource,
        file_name: impl Into<String>,
    ) -> Result<TransferRequest, TransferError> {
        TransferRequest::from_source(source, file_name, self.day_border_local_hour)
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("meshbot").join("transfer.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("meshbot")
            .join("transfer.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = TransferConfig::default();
        assert_eq!(config.data_root, "DATA");
        assert_eq!(config.day_border_local_hour, 20);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = TransferConfig {
            data_root: "/srv/orders".into(),
            day_border_local_hour: 18,
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: TransferConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.data_root, "/srv/orders");
        assert_eq!(parsed.day_border_local_hour, 18);
    }

    #[test]
    fn config_partial_toml_uses_defaults() {
        let parsed: TransferConfig = toml::from_str(r#"data_root = "/mnt/data""#).unwrap();
        assert_eq!(parsed.data_root, "/mnt/data");
        assert_eq!(parsed.day_border_local_hour, 20);
    }

    #[test]
    fn config_path_not_empty() {
        let path = config_path();
        assert!(path.to_string_lossy().contains("meshbot"));
    }

    #[test]
    fn request_for_uses_configured_day_border() {
        use std::future::Future;
        use std::pin::Pin;

        use chrono::{DateTime, TimeZone, Utc};
        use meshbot_protocol::{ChunkStream, SenderIdentity, SourceError};

        struct EmptySource;

        impl MediaSource for EmptySource {
            fn sender(&self) -> SenderIdentity {
                SenderIdentity::default()
            }

            fn timestamp(&self) -> DateTime<Utc> {
                Utc.with_ymd_and_hms(2024, 5, 17, 10, 0, 0).unwrap()
            }

            fn media_size(&self) -> u64 {
                512
            }

            fn read_chunks(
                &self,
                _offset: u64,
            ) -> Pin<
                Box<dyn Future<Output = Result<Box<dyn ChunkStream>, SourceError>> + Send + '_>,
            > {
                Box::pin(async { Err(SourceError::Unavailable("empty".into())) })
            }
        }

        let config = TransferConfig {
            data_root: "DATA".into(),
            day_border_local_hour: 17,
        };
        let request = config.request_for(&EmptySource, "model.obj").unwrap();
        assert_eq!(request.day_border_local_hour, 17);
        assert_eq!(request.total_size, 512);
    }
}
