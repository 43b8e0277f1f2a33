//! Tool configuration

use ld_metadata::LineOverrides;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "plain" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ToolError::Config(format!("unknown log format '{}'", other))),
        }
    }
}

/// Tool configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Log output format
    pub log_format: LogFormat,

    /// Explicit active line bounds applied before loading a document
    pub line_overrides: LineOverrides,

    /// Field order of the capture; `None` keeps the store default
    pub is_first_field_first: Option<bool>,

    /// Restrict dropout analysis to the visible picture area by default
    pub visible_only: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            line_overrides: LineOverrides::default(),
            is_first_field_first: None,
            visible_only: false,
        }
    }
}

impl ToolConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub fn log_filter(&self) -> String {
        format!(
            "ld_metadata={level},ld_metadata_tool={level}",
            level = self.log_level
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ToolConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(!config.line_overrides.is_explicit());
        assert_eq!(config.is_first_field_first, None);
        assert!(!config.visible_only);
    }

    #[test]
    fn test_log_filter() {
        let config = ToolConfig::default();
        assert_eq!(config.log_filter(), "ld_metadata=info,ld_metadata_tool=info");

        let config = ToolConfig {
            log_level: "debug".to_string(),
            ..Default::default()
        };
        assert_eq!(config.log_filter(), "ld_metadata=debug,ld_metadata_tool=debug");
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Plain".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
