//! Key-value snapshot port and its backends
use super::error::StorageError;
use sled::Batch;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

pub const SOLD_SEATS_KEY: &str = "soldSeats";
pub const SELECTED_SEATS_KEY: &str = "selectedSeats";

/// A single write against the store, used to group the commit writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotWrite {
    Set { key: String, seats: Vec<String> },
    Remove { key: String },
}

/// Storage port for seat snapshots. Values are ordered sequences of seat keys.
pub trait SnapshotStore {
    fn get(&self, key: &str) -> Result<Option<Vec<String>>, StorageError>;
    fn set(&mut self, key: &str, seats: &[String]) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// Applies writes in order. Backends that can do so apply them atomically.
    fn apply(&mut self, writes: Vec<SnapshotWrite>) -> Result<(), StorageError> {
        for write in writes {
            match write {
                SnapshotWrite::Set { key, seats } => self.set(&key, &seats)?,
                SnapshotWrite::Remove { key } => self.remove(&key)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<String>>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }
    fn set(&mut self, key: &str, seats: &[String]) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), seats.to_vec());
        Ok(())
    }
    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

// value stored under each key
#[derive(Debug, minicbor::Encode, minicbor::Decode)]
#[cbor(array)]
struct SeatList {
    #[n(0)]
    seats: Vec<String>,
}

/// Sled backed store. Sequences are kept as CBOR-encoded seat lists.
pub struct SledStore {
    instance: Arc<sled::Db>,
}

impl SledStore {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self { instance }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Ok(Self::new(Arc::new(db)))
    }

    fn encode(seats: &[String]) -> Result<Vec<u8>, StorageError> {
        let list = SeatList {
            seats: seats.to_vec(),
        };
        minicbor::to_vec(&list).map_err(|e| StorageError::Encode(e.to_string()))
    }
}

impl SnapshotStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<Vec<String>>, StorageError> {
        match self.instance.get(key.as_bytes())? {
            Some(bytes) => {
                let list: SeatList = minicbor::decode(&bytes)?;
                Ok(Some(list.seats))
            }
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, seats: &[String]) -> Result<(), StorageError> {
        self.instance.insert(key.as_bytes(), Self::encode(seats)?)?;
        self.instance.flush()?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.instance.remove(key.as_bytes())?;
        self.instance.flush()?;
        Ok(())
    }

    fn apply(&mut self, writes: Vec<SnapshotWrite>) -> Result<(), StorageError> {
        let mut batch = Batch::default();
        for write in writes {
            match write {
                SnapshotWrite::Set { key, seats } => {
                    batch.insert(key.as_bytes(), Self::encode(&seats)?);
                }
                SnapshotWrite::Remove { key } => batch.remove(key.as_bytes()),
            }
        }
        self.instance.apply_batch(batch)?;
        self.instance.flush()?;
        Ok(())
    }
}
