use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::CatalogDocument;

/// Serialize a catalog the way it is stored: pretty JSON with a trailing newline
pub fn to_json_string(doc: &CatalogDocument) -> Result<String> {
    let mut json = serde_json::to_string_pretty(doc).context("Failed to serialize catalog")?;
    json.push('\n');
    Ok(json)
}

/// Load the catalog from the last successful run; missing or unreadable files count as none
pub fn read_previous<P: AsRef<Path>>(path: P) -> Option<CatalogDocument> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            debug!("No previous catalog at {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str::<CatalogDocument>(&text) {
        Ok(doc) => {
            info!("Previous catalog has {} items ({})", doc.items.len(), path.display());
            Some(doc)
        }
        Err(e) => {
            warn!("Ignoring unparsable previous catalog {}: {}", path.display(), e);
            None
        }
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "catalog".to_string());
    path.with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4().simple()))
}

/// Write the catalog next to its destination, then rename it into place
pub fn write_catalog<P: AsRef<Path>>(path: P, doc: &CatalogDocument) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let json = to_json_string(doc)?;
    let tmp = temp_sibling(path);
    fs::write(&tmp, json).with_context(|| format!("Failed to write file: {}", tmp.display()))?;

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("Failed to replace {}", path.display()));
    }

    info!("Wrote {} items to {}", doc.count, path.display());
    Ok(())
}
