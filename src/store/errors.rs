use thiserror::Error;

/// 尺寸存储错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("文件读写失败: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON解析失败: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("窗口标识无效: {0:?}")]
    InvalidIdentifier(String),

    #[error("存储不可用")]
    Unavailable,
}

impl StoreError {
    /// 损坏的记录按“无记录”处理
    pub fn is_corrupt_record(&self) -> bool {
        matches!(self, StoreError::JsonParseError(_))
    }
}

/// 尺寸存储结果类型
pub type StoreResult<T> = Result<T, StoreError>;
