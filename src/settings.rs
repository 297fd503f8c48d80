use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::anchor::Anchor;

/// 悬浮窗口设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// 失去焦点时关闭窗口
    pub close_on_blur: bool,
    /// 响应全局关闭快捷键
    pub close_on_key: bool,
    /// 窗口标识（持久化键）
    pub identifier: String,
    pub initial_width: u32,
    pub initial_height: u32,
    /// 垂直位置（比例或百分数）
    pub top_percent: f64,
    pub top_anchor: Anchor,
    /// 水平位置（比例或百分数）
    pub left_percent: f64,
    pub left_anchor: Anchor,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            close_on_blur: true,
            close_on_key: true,
            identifier: "overlay".to_string(),
            initial_width: 640,
            initial_height: 360,
            top_percent: 30.0,
            top_anchor: Anchor::Center,
            left_percent: 50.0,
            left_anchor: Anchor::Center,
        }
    }
}

impl OverlaySettings {
    /// 获取默认设置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("overlay_window");
            path.push("settings.json");
            path
        })
    }

    /// 从默认路径读取设置
    pub fn load_default() -> Self {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Self::default(),
        }
    }

    /// 读取设置，文件缺失或损坏时使用默认值
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!("读取设置文件失败，使用默认设置: {} - {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("解析设置文件失败，使用默认设置: {} - {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = OverlaySettings::load(&temp_dir.path().join("missing.json"));
        assert_eq!(settings, OverlaySettings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "close_on_blur": false, "left_anchor": "end" }"#).unwrap();

        let settings = OverlaySettings::load(&path);
        assert!(!settings.close_on_blur);
        assert_eq!(settings.left_anchor, Anchor::End);
        assert_eq!(settings.identifier, "overlay");
    }

    #[test]
    fn test_corrupt_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, "[1, 2").unwrap();
        assert_eq!(OverlaySettings::load(&path), OverlaySettings::default());
    }
}
