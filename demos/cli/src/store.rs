use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use virchow_core::{KeyValueStore, MemoryStore, VirchowError};

/// Entradas da sessão guardadas num arquivo JSON entre execuções.
pub struct FileStore {
    path: PathBuf,
    entries: MemoryStore,
}

impl FileStore {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let entries = if path.exists() {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Não foi possível ler a sessão em {}", path.display()))?;
            serde_json::from_str(&data)
                .with_context(|| format!("Sessão corrompida em {}", path.display()))?
        } else {
            MemoryStore::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    fn persist(&self) -> Result<(), VirchowError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| VirchowError::Storage(err.to_string()))?;
        }
        let data = serde_json::to_string_pretty(&self.entries)
            .map_err(|err| VirchowError::Serialization(err.to_string()))?;
        fs::write(&self.path, data).map_err(|err| VirchowError::Storage(err.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), VirchowError> {
        self.entries.set(key, value)?;
        self.persist()
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        if let Err(err) = self.persist() {
            tracing::warn!(%err, key, "could not persist session removal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("virchow-cli-{}-{name}.json", std::process::id()));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn entries_survive_reopening() {
        let path = scratch("reopen");
        let mut store = FileStore::open(&path).unwrap();
        store.set("token", "abc").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("token").as_deref(), Some("abc"));

        let mut reopened = reopened;
        reopened.remove("token");
        assert_eq!(FileStore::open(&path).unwrap().get("token"), None);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn corrupted_file_is_reported() {
        let path = scratch("corrupt");
        fs::write(&path, "not json").unwrap();
        assert!(FileStore::open(&path).is_err());
        fs::remove_file(&path).unwrap();
    }
}
