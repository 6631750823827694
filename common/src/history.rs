use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
};

use log::{debug, warn};

use crate::{error::Result, reading::GasReading};

/// Storage slot of the rolling history.
pub const HISTORY_KEY: &str = "gasHistory";
/// Maximum number of readings kept in the rolling history.
pub const HISTORY_CAPACITY: usize = 100;

/// A string key-value store, the shape of browser `localStorage`.
pub trait StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// One `<key>.json` file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        // write-then-rename so a crash never leaves a half written slot
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, self.path(key))?;
        Ok(())
    }
}

/// Bounded rolling history of readings, oldest first.
///
/// Reads never fail: an absent or unreadable slot is an empty history. Write
/// failures are logged and dropped, the live dashboard keeps running without
/// its history.
#[derive(Debug)]
pub struct HistoryStore<B> {
    backend: B,
    key: String,
}

impl<B: StorageBackend> HistoryStore<B> {
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, HISTORY_KEY)
    }

    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn load_all(&self) -> Vec<GasReading> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("cannot read history slot {}: {e}", self.key);
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("discarding unreadable history slot {}: {e}", self.key);
            Vec::new()
        })
    }

    pub fn append(&mut self, reading: GasReading) {
        let mut readings = self.load_all();
        readings.push(reading);
        if readings.len() > HISTORY_CAPACITY {
            let excess = readings.len() - HISTORY_CAPACITY;
            readings.drain(..excess);
        }

        let raw = match serde_json::to_string(&readings) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("cannot serialize history: {e}");
                return;
            }
        };
        match self.backend.set(&self.key, &raw) {
            Ok(()) => debug!("history holds {} readings", readings.len()),
            Err(e) => warn!("cannot persist history slot {}: {e}", self.key),
        }
    }

    pub fn len(&self) -> usize {
        self.load_all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
