#![cfg(target_arch = "wasm32")]

use virchow_core::{FallbackStore, KeyValueStore, VirchowError};
use web_sys::Storage;

/// Armazenamento da sessão: `window.localStorage`, ou memória quando o
/// navegador nega acesso (modo privado). Nesse caso a sessão dura só
/// enquanto a página estiver aberta.
pub type LocalStore = FallbackStore<BrowserStorage>;

pub fn open_local_store() -> LocalStore {
    let storage = web_sys::window().and_then(|window| window.local_storage().ok().flatten());
    if storage.is_none() {
        tracing::warn!("local storage unavailable, keeping the session in memory");
    }
    FallbackStore::new(storage.map(BrowserStorage))
}

#[derive(Debug, Clone)]
pub struct BrowserStorage(Storage);

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), VirchowError> {
        self.0
            .set_item(key, value)
            .map_err(|err| VirchowError::Storage(format!("{err:?}")))
    }

    fn remove(&mut self, key: &str) {
        let _ = self.0.remove_item(key);
    }
}
