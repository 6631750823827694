use common::{Error, Result, StorageBackend};

/// `window.localStorage`, where the dashboard keeps its rolling history
/// between page loads.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| Error::Storage("no window".to_owned()))?
            .local_storage()
            .map_err(|e| Error::Storage(format!("{e:?}")))?
            .ok_or_else(|| Error::Storage("localStorage is disabled".to_owned()))
    }
}

impl StorageBackend for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| Error::Storage(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| Error::Storage(format!("{e:?}")))
    }
}
