//! Tool commands
//!
//! Each command works on a loaded [`MetadataStore`] and writes its report
//! to a caller-supplied sink, so the commands can be driven from tests.

pub mod dropouts;
pub mod info;
pub mod resize;
pub mod timecode;

use std::path::Path;

use ld_metadata::MetadataStore;
use tracing::debug;

use crate::config::ToolConfig;
use crate::error::Result;

/// Open a metadata document with the configured line bounds and field order
pub fn load_store(path: &Path, config: &ToolConfig) -> Result<MetadataStore> {
    let mut store = MetadataStore::new();
    store.set_line_overrides(config.line_overrides)?;
    if let Some(is_first_field_first) = config.is_first_field_first {
        debug!("Field order override: first field first = {}", is_first_field_first);
        store.set_is_first_field_first(is_first_field_first);
    }
    store.read_file(path)?;
    Ok(store)
}


#[cfg(test)]
mod tests {
    use super::*;
    use ld_metadata::LineOverrides;

    #[test]
    fn test_load_store_applies_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.tbc.json");
        test_support::pal_store(3).write_file(&path).unwrap();

        let config = ToolConfig {
            line_overrides: LineOverrides::new(30, 300),
            is_first_field_first: Some(true),
            ..Default::default()
        };
        let store = load_store(&path, &config).unwrap();
        assert_eq!(store.number_of_frames(), 3);
        assert_eq!(store.line_parameters().unwrap().first_active_field_line, 30);
    }

    #[test]
    fn test_load_store_rejects_bad_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.tbc.json");
        test_support::pal_store(1).write_file(&path).unwrap();

        let config = ToolConfig {
            line_overrides: LineOverrides::new(300, 30),
            ..Default::default()
        };
        assert!(load_store(&path, &config).is_err());
    }
}
