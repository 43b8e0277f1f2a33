//! Configuration file support
//!
//! Loads tool configuration from TOML files.

use ld_metadata::LineOverrides;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{LogFormat, ToolConfig};
use crate::error::Result;

/// Configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Logging settings
    pub logging: Option<LoggingSettings>,
    /// Active line settings
    pub lines: Option<LineSettings>,
    /// Frame pairing settings
    pub frames: Option<FrameSettings>,
    /// Dropout analysis settings
    pub dropouts: Option<DropoutSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSettings {
    /// First active field line
    pub first_active_field_line: Option<i32>,
    /// Last active field line (exclusive)
    pub last_active_field_line: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSettings {
    /// Whether frames start with the first field
    pub is_first_field_first: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropoutSettings {
    /// Only count dropouts inside the visible picture area
    pub visible_only: Option<bool>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        Self {
            logging: Some(LoggingSettings {
                level: "info".to_string(),
                format: Some("pretty".to_string()),
            }),
            lines: None,
            frames: Some(FrameSettings {
                is_first_field_first: Some(true),
            }),
            dropouts: Some(DropoutSettings {
                visible_only: Some(false),
            }),
        }
    }

    /// Convert to ToolConfig
    pub fn into_tool_config(self) -> Result<ToolConfig> {
        let defaults = ToolConfig::default();
        let (log_level, log_format) = match self.logging {
            Some(logging) => {
                let format = match logging.format {
                    Some(format) => format.parse::<LogFormat>()?,
                    None => defaults.log_format,
                };
                (logging.level, format)
            }
            None => (defaults.log_level, defaults.log_format),
        };

        Ok(ToolConfig {
            log_level,
            log_format,
            line_overrides: self
                .lines
                .map(|l| LineOverrides {
                    first_active_field_line: l.first_active_field_line,
                    last_active_field_line: l.last_active_field_line,
                })
                .unwrap_or_default(),
            is_first_field_first: self.frames.and_then(|f| f.is_first_field_first),
            visible_only: self
                .dropouts
                .and_then(|d| d.visible_only)
                .unwrap_or(defaults.visible_only),
        })
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let config = ConfigFile::default_config();
    config.to_file(path)?;
    Ok(())
}
