pub mod errors;
pub mod file;
pub mod memory;

pub use errors::*;
pub use file::*;
pub use memory::*;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::WindowSize;

/// 持久化的窗口记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedWindowRecord {
    pub identifier: String,
    pub width: f64,
    pub height: f64,
    pub saved_at: DateTime<Utc>,
}

impl PersistedWindowRecord {
    pub fn new(identifier: impl Into<String>, size: WindowSize) -> Self {
        Self {
            identifier: identifier.into(),
            width: size.width,
            height: size.height,
            saved_at: Utc::now(),
        }
    }

    pub fn size(&self) -> WindowSize {
        WindowSize::new(self.width, self.height)
    }
}

/// 按窗口标识存取最近一次尺寸的外部存储
#[async_trait]
pub trait SizeStore: Send + Sync {
    /// 读取尺寸，没有记录时返回 `None`
    async fn load_size(&self, identifier: &str) -> StoreResult<Option<WindowSize>>;

    /// 写入尺寸
    async fn save_size(&self, record: PersistedWindowRecord) -> StoreResult<()>;
}
