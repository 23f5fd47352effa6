//! Trend record storage

use crate::capture::record::TrendRecord;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// Persists captured records
#[async_trait]
pub trait TrendStore: Send + Sync {
    async fn insert(&self, record: &TrendRecord) -> Result<()>;

    /// Most recently inserted record
    async fn latest(&self) -> Result<Option<TrendRecord>>;
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<TrendRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TrendStore for MemoryStore {
    async fn insert(&self, record: &TrendRecord) -> Result<()> {
        self.records
            .lock()
            .map_err(|e| Error::Store(e.to_string()))?
            .push(record.clone());
        Ok(())
    }

    async fn latest(&self) -> Result<Option<TrendRecord>> {
        Ok(self
            .records
            .lock()
            .map_err(|e| Error::Store(e.to_string()))?
            .last()
            .cloned())
    }
}
