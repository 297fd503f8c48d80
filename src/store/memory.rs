use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::geometry::WindowSize;
use crate::store::{PersistedWindowRecord, SizeStore, StoreError, StoreResult};

/// 内存中的尺寸存储，用于无界面宿主和测试
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, PersistedWindowRecord>>,
    loads: AtomicUsize,
    saves: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预先放入一条记录
    pub async fn insert(&self, identifier: &str, size: WindowSize) {
        let record = PersistedWindowRecord::new(identifier, size);
        self.records.write().await.insert(identifier.to_string(), record);
    }

    pub async fn get(&self, identifier: &str) -> Option<PersistedWindowRecord> {
        self.records.read().await.get(identifier).cloned()
    }

    /// 之后的读写都返回 `StoreError::Unavailable`
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SizeStore for MemoryStore {
    async fn load_size(&self, identifier: &str) -> StoreResult<Option<WindowSize>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self
            .records
            .read()
            .await
            .get(identifier)
            .map(PersistedWindowRecord::size))
    }

    async fn save_size(&self, record: PersistedWindowRecord) -> StoreResult<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.records
            .write()
            .await
            .insert(record.identifier.clone(), record);
        Ok(())
    }
}
