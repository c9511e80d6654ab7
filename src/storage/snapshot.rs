use crate::model::CatalogError;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Writes a snapshot document as pretty JSON, creating parent directories.
pub fn write_snapshot<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    info!("Saved snapshot: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn creates_directories_and_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/api_museum_items.json");
        write_snapshot(&path, &json!({ "sword": ["Hyperion"] })).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, json!({ "sword": ["Hyperion"] }));
    }
}
