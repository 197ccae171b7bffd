//! Item store backed by a JSON snapshot file (the `GET /items/` body, pretty-printed).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::{Item, ItemId, ItemPatch, ItemStore, StoreError};

pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the snapshot with `items`.
    pub fn write_all(&self, items: &[Item]) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.write_locked(items)
    }

    fn read_locked(&self) -> Result<Vec<Item>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_locked(&self, items: &[Item]) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(items)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), count = items.len(), "snapshot written");
        Ok(())
    }
}

impl ItemStore for JsonFileStore {
    fn list(&self) -> Result<Vec<Item>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.read_locked()
    }

    fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut items = self.read_locked()?;
        let before = items.len();
        items.retain(|i| i.id != id);
        if items.len() == before {
            return Err(StoreError::NotFound(id));
        }
        self.write_locked(&items)
    }

    fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut items = self.read_locked()?;
        let item = items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(StoreError::NotFound(id))?;
        patch.apply(item);
        let updated = item.clone();
        self.write_locked(&items)?;
        Ok(updated)
    }
}
