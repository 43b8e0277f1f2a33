//! Field count correction

use std::io::BufWriter;
use std::path::Path;

use ld_metadata::MetadataStore;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::Result;

/// Truncate or pad the capture to `number_of_fields` fields and save it
pub fn run(store: &mut MetadataStore, number_of_fields: u32, output: &Path) -> Result<()> {
    let before = store.number_of_fields();
    store.set_number_of_fields(number_of_fields);
    info!(
        "Resized from {} to {} fields ({} frames)",
        before,
        store.number_of_fields(),
        store.number_of_frames()
    );
    save(store, output)
}

/// Write the document next to `output`, then rename it into place so an
/// existing document is never left half written
fn save(store: &MetadataStore, output: &Path) -> Result<()> {
    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    debug!("Writing {} via {}", output.display(), temp.path().display());

    store.write(BufWriter::new(temp.as_file_mut()))?;
    temp.persist(output).map_err(|e| e.error)?;
    info!("Wrote {}", output.display());
    Ok(())
}
