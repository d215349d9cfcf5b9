//! Encoding of the cached feed snapshots and the stored preferences.

use crate::persistence::error::PersistenceError;
use crate::persistence::store::{SnapshotStore, StorageKey};
use crate::types::raw_sample::{parse_feeds, FeedRecord, RawSample};
use bincode::config::{Configuration, Fixint, LittleEndian};
use chrono::DateTime;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

/// The part of a [`RawSample`] needed to rebuild it.
#[derive(Debug, Serialize, Deserialize)]
struct CompactSample {
    timestamp_ms: i64,
    temperature: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
    rainfall: Option<f64>,
}

pub fn encode_compact(samples: &[RawSample]) -> Result<Vec<u8>, PersistenceError> {
    let compact: Vec<CompactSample> = samples
        .iter()
        .map(|s| CompactSample {
            timestamp_ms: s.timestamp.timestamp_millis(),
            temperature: s.temperature,
            humidity: s.humidity,
            pressure: s.pressure,
            rainfall: s.rainfall,
        })
        .collect();
    bincode::serde::encode_to_vec(compact, BINCODE_CONFIG)
        .map_err(|e| PersistenceError::Encode(Box::new(e)))
}

pub fn decode_compact(bytes: &[u8]) -> Result<Vec<RawSample>, PersistenceError> {
    let (compact, _) = bincode::serde::decode_from_slice::<Vec<CompactSample>, _>(
        bytes,
        BINCODE_CONFIG,
    )
    .map_err(|e| PersistenceError::Decode(Box::new(e)))?;

    // Samples whose timestamp no longer maps to a valid instant are dropped.
    Ok(compact
        .into_iter()
        .filter_map(|c| {
            DateTime::from_timestamp_millis(c.timestamp_ms).map(|timestamp| RawSample {
                timestamp,
                temperature: c.temperature,
                humidity: c.humidity,
                pressure: c.pressure,
                rainfall: c.rainfall,
            })
        })
        .collect())
}

/// Persisted user preferences. `None` means "use the configured value".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub poll_interval: Option<Duration>,
    pub notifications: Option<bool>,
}

/// Reads and writes snapshots and preferences on top of a [`SnapshotStore`].
///
/// Reads never fail: a missing or unreadable entry is logged and reported
/// as absent.
#[derive(Debug, Clone)]
pub struct SnapshotCache<S> {
    store: S,
}

impl<S: SnapshotStore> SnapshotCache<S> {
    pub fn new(store: S) -> Self {
        SnapshotCache { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Writes the full JSON snapshot of `records` and the compact snapshot of
    /// `samples`.
    pub async fn save(
        &self,
        records: &[FeedRecord],
        samples: &[RawSample],
    ) -> Result<(), PersistenceError> {
        let json = serde_json::to_vec(records)?;
        let compact = encode_compact(samples)?;
        self.store.save(StorageKey::LastGoodSnapshot, json).await?;
        self.store.save(StorageKey::OfflineSnapshot, compact).await?;
        Ok(())
    }

    /// The last-good full snapshot, parsed.
    pub async fn load_last_good(&self) -> Option<Vec<RawSample>> {
        let bytes = self.read(StorageKey::LastGoodSnapshot).await?;
        match serde_json::from_slice::<Vec<FeedRecord>>(&bytes) {
            Ok(records) if !records.is_empty() => {
                info!("Loaded cached data ({} feed entries)", records.len());
                Some(parse_feeds(&records))
            }
            Ok(_) => None,
            Err(e) => {
                warn!("Ignoring corrupt last-good snapshot: {}", e);
                None
            }
        }
    }

    /// The compact offline snapshot, falling back to the last-good one.
    pub async fn load_offline(&self) -> Option<Vec<RawSample>> {
        if let Some(bytes) = self.read(StorageKey::OfflineSnapshot).await {
            match decode_compact(&bytes) {
                Ok(samples) if !samples.is_empty() => {
                    info!("Loaded offline snapshot ({} samples)", samples.len());
                    return Some(samples);
                }
                Ok(_) => {}
                Err(e) => warn!("Ignoring corrupt offline snapshot: {}", e),
            }
        }
        self.load_last_good().await
    }

    pub async fn load_preferences(&self) -> Preferences {
        let poll_interval = self
            .read_text(StorageKey::PollInterval)
            .await
            .and_then(|text| match text.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Some(Duration::from_millis(ms)),
                _ => {
                    warn!("Ignoring invalid poll interval preference '{}'", text);
                    None
                }
            });
        let notifications = self
            .read_text(StorageKey::Notifications)
            .await
            .and_then(|text| match text.trim().parse::<bool>() {
                Ok(enabled) => Some(enabled),
                Err(_) => {
                    warn!("Ignoring invalid notifications preference '{}'", text);
                    None
                }
            });
        Preferences {
            poll_interval,
            notifications,
        }
    }

    pub async fn save_poll_interval(&self, interval: Duration) -> Result<(), PersistenceError> {
        self.store
            .save(
                StorageKey::PollInterval,
                interval.as_millis().to_string().into_bytes(),
            )
            .await
    }

    pub async fn save_notifications(&self, enabled: bool) -> Result<(), PersistenceError> {
        self.store
            .save(StorageKey::Notifications, enabled.to_string().into_bytes())
            .await
    }

    /// Forgets the stored preferences. Snapshots are kept.
    pub async fn reset_preferences(&self) -> Result<(), PersistenceError> {
        self.store.remove(StorageKey::PollInterval).await?;
        self.store.remove(StorageKey::Notifications).await
    }

    async fn read(&self, key: StorageKey) -> Option<Vec<u8>> {
        match self.store.load(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read {:?}: {}", key, e);
                None
            }
        }
    }

    async fn read_text(&self, key: StorageKey) -> Option<String> {
        let bytes = self.read(key).await?;
        match String::from_utf8(bytes) {
            Ok(text) => Some(text),
            Err(_) => {
                warn!("Ignoring non-UTF-8 value stored for {:?}", key);
                None
            }
        }
    }
}
