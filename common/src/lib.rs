//! Shared core of the gas monitor: gas identifiers and thresholds, tier
//! classification, the rolling history store and the feed/API types used by
//! both the backend and the frontend.

pub mod classify;
pub mod error;
pub mod event;
pub mod gas;
pub mod history;
pub mod monitor;
pub mod reading;
pub mod req;

pub use classify::{Classifier, GasLevel, SafetyTier};
pub use error::{Error, Result};
pub use event::{Alert, FeedCursor, FeedEvent, FeedPage};
pub use gas::{GasId, ThresholdTable};
pub use history::{FileStorage, HistoryStore, MemoryStorage, StorageBackend};
pub use monitor::{Monitor, Presenter};
pub use reading::GasReading;
