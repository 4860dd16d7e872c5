//! JSON file storage.

use super::{LayoutDocument, LayoutStorage, StorageError, StorageResult};
use crate::weather::BoxFuture;
use crate::widget::Widget;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name used inside the default data directory.
const LAYOUT_FILE_NAME: &str = "layout.json";

/// Stores the layout as a single JSON document.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-save leaves the previous layout intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a storage backed by the file at `path`.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn new(path: PathBuf) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StorageError::Io(format!("Failed to create storage directory: {}", e))
                })?;
            }
        }
        Ok(Self { path })
    }

    /// Create file storage in the default location.
    ///
    /// On Linux: `~/.local/share/signboard/layout.json`
    /// On Windows: `%LOCALAPPDATA%\signboard\layout.json`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("signboard").join(LAYOUT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LayoutStorage for FileStorage {
    fn save_all(&self, widgets: &[Widget]) -> BoxFuture<'_, StorageResult<()>> {
        let json = match LayoutDocument::new(widgets.to_vec()).to_json() {
            Ok(j) => j,
            Err(e) => return Box::pin(async move { Err(StorageError::Serialization(e.to_string())) }),
        };
        let path = self.path.clone();
        let temp = self.temp_path();

        Box::pin(async move {
            tokio::fs::write(&temp, json).await.map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", temp.display(), e))
            })?;
            tokio::fs::rename(&temp, &path).await.map_err(|e| {
                StorageError::Io(format!("Failed to replace {}: {}", path.display(), e))
            })?;
            log::debug!("Saved layout to {}", path.display());
            Ok(())
        })
    }

    fn load_all(&self) -> BoxFuture<'_, StorageResult<Vec<Widget>>> {
        let path = self.path.clone();

        Box::pin(async move {
            let json = match tokio::fs::read_to_string(&path).await {
                Ok(json) => json,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => {
                    return Err(StorageError::Io(format!(
                        "Failed to read {}: {}",
                        path.display(),
                        e
                    )));
                }
            };

            let doc = LayoutDocument::from_json(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })?;
            Ok(doc.widgets)
        })
    }

    fn clear(&self) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.path.clone();

        Box::pin(async move {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StorageError::Io(format!(
                    "Failed to delete {}: {}",
                    path.display(),
                    e
                ))),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::WidgetKind;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("layout.json")).unwrap();

        let clock = Widget::with_id("c", WidgetKind::Clock, 16, 16, 150, 100).unwrap();
        let text = Widget::with_id("t", WidgetKind::Text, 182, 16, 150, 100)
            .unwrap()
            .with_text(Some("Welcome".into()));
        storage.save_all(&[clock.clone(), text.clone()]).await.unwrap();

        let loaded = storage.load_all().await.unwrap();
        assert_eq!(loaded, vec![clock, text]);
        assert!(!storage.temp_path().exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_layout() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("layout.json")).unwrap();

        assert!(dir.path().join("nested").is_dir());
        assert!(storage.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, "not json").unwrap();
        let storage = FileStorage::new(path).unwrap();

        assert!(matches!(
            storage.load_all().await,
            Err(StorageError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_clear_removes_file() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("layout.json")).unwrap();
        storage.save_all(&[]).await.unwrap();
        assert!(storage.path().exists());

        storage.clear().await.unwrap();
        assert!(!storage.path().exists());
        // Clearing twice is fine.
        storage.clear().await.unwrap();
    }
}
