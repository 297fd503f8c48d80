use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::geometry::WindowSize;
use crate::store::{PersistedWindowRecord, SizeStore, StoreError, StoreResult};

/// 以 JSON 文件保存窗口尺寸，每个窗口一个文件
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// 使用指定目录创建存储
    pub fn new(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        debug!("窗口尺寸存储目录: {:?}", dir);
        Ok(Self { dir })
    }

    /// 使用默认目录创建存储
    pub fn with_default_dir() -> StoreResult<Self> {
        Self::new(Self::get_default_dir().unwrap_or_else(|| PathBuf::from("config/windows")))
    }

    /// 获取默认存储目录
    fn get_default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("overlay_window");
            path.push("windows");
            path
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, identifier: &str) -> StoreResult<PathBuf> {
        let file_name: String = identifier
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        if file_name.is_empty() {
            return Err(StoreError::InvalidIdentifier(identifier.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", file_name)))
    }
}

#[async_trait]
impl SizeStore for JsonFileStore {
    async fn load_size(&self, identifier: &str) -> StoreResult<Option<WindowSize>> {
        let path = self.record_path(identifier)?;
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: PersistedWindowRecord = serde_json::from_str(&content)?;
        if record.identifier != identifier {
            warn!("记录标识不匹配: {} != {}，忽略", record.identifier, identifier);
            return Ok(None);
        }

        let size = record.size();
        if !size.is_usable() {
            warn!("窗口 {} 的记录尺寸无效: {:?}", identifier, size);
            return Ok(None);
        }
        Ok(Some(size))
    }

    async fn save_size(&self, record: PersistedWindowRecord) -> StoreResult<()> {
        let path = self.record_path(&record.identifier)?;
        let content = serde_json::to_string_pretty(&record)?;
        tokio::fs::write(&path, content).await?;
        debug!("保存窗口尺寸: {} -> {}x{}", record.identifier, record.width, record.height);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path()).unwrap();

        let record = PersistedWindowRecord::new("launcher", WindowSize::new(640.0, 360.0));
        store.save_size(record).await.unwrap();

        let loaded = store.load_size("launcher").await.unwrap();
        assert_eq!(loaded, Some(WindowSize::new(640.0, 360.0)));
    }

    #[tokio::test]
    async fn test_missing_record_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path()).unwrap();
        assert_eq!(store.load_size("nothing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unusable_size_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path()).unwrap();

        let record = PersistedWindowRecord::new("tiny", WindowSize::new(0.0, 200.0));
        store.save_size(record).await.unwrap();
        assert_eq!(store.load_size("tiny").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_record_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path()).unwrap();
        std::fs::write(temp_dir.path().join("broken.json"), "{ not json").unwrap();

        let err = store.load_size("broken").await.unwrap_err();
        assert!(err.is_corrupt_record());
    }

    #[test]
    fn test_identifier_sanitised() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path()).unwrap();

        let path = store.record_path("../quick search").unwrap();
        assert_eq!(path, temp_dir.path().join("___quick_search.json"));
        assert!(store.record_path("").is_err());
    }
}
