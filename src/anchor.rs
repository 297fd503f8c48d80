use serde::{Deserialize, Serialize};

/// 百分比定位时测量的窗口锚点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    /// 测量到窗口的上/左边缘
    #[default]
    Begin,
    /// 测量到窗口中心
    Center,
    /// 测量到窗口的下/右边缘
    End,
}

impl Anchor {
    /// 锚点对应的窗口尺寸比例
    fn weight(self) -> f64 {
        match self {
            Anchor::Begin => 0.0,
            Anchor::Center => 0.5,
            Anchor::End => 1.0,
        }
    }
}

/// 每个轴上最近一次百分比定位使用的锚点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnchorSources {
    pub top: Anchor,
    pub left: Anchor,
}

/// 大于1的输入按百分数处理
pub fn normalize_fraction(value: f64) -> f64 {
    if value > 1.0 { value / 100.0 } else { value }
}

/// 根据比例和锚点计算一个轴上的像素位置
pub fn anchored_offset(
    fraction: f64,
    window_extent: f64,
    monitor_origin: f64,
    monitor_extent: f64,
    anchor: Anchor,
) -> f64 {
    // extent × (fraction − weight × size / extent) 展开后计算，避免除法误差
    let fraction = normalize_fraction(fraction);
    (monitor_origin + monitor_extent * fraction - anchor.weight() * window_extent).trunc()
}

/// 尺寸变化后为保持锚点不动需要的位移
pub fn anchor_shift(anchor: Anchor, previous: f64, new: f64) -> f64 {
    (previous - new) * anchor.weight()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_and_fraction_are_equivalent() {
        let from_percent = anchored_offset(50.0, 200.0, 0.0, 1000.0, Anchor::Begin);
        let from_fraction = anchored_offset(0.5, 200.0, 0.0, 1000.0, Anchor::Begin);
        assert_eq!(from_percent, from_fraction);
        assert_eq!(from_fraction, 500.0);
    }

    #[test]
    fn test_one_is_a_fraction() {
        assert_eq!(normalize_fraction(1.0), 1.0);
        assert_eq!(normalize_fraction(100.0), 1.0);
        assert_eq!(normalize_fraction(0.25), 0.25);
    }

    #[test]
    fn test_center_anchor() {
        let left = anchored_offset(0.5, 200.0, 0.0, 1000.0, Anchor::Center);
        assert_eq!(left, 400.0);

        let offset_monitor = anchored_offset(0.5, 200.0, 1920.0, 1000.0, Anchor::Center);
        assert_eq!(offset_monitor, 2320.0);
    }

    #[test]
    fn test_end_anchor() {
        let top = anchored_offset(100.0, 300.0, 0.0, 1080.0, Anchor::End);
        assert_eq!(top, 780.0);
    }

    #[test]
    fn test_result_is_truncated() {
        let left = anchored_offset(0.333, 0.0, 0.0, 1000.0, Anchor::Begin);
        assert_eq!(left, 333.0);
    }

    #[test]
    fn test_anchor_shift() {
        assert_eq!(anchor_shift(Anchor::Begin, 200.0, 300.0), 0.0);
        assert_eq!(anchor_shift(Anchor::Center, 200.0, 300.0), -50.0);
        assert_eq!(anchor_shift(Anchor::End, 200.0, 300.0), -100.0);
    }

    #[test]
    fn test_anchor_serde_names() {
        let json = serde_json::to_string(&Anchor::Center).unwrap();
        assert_eq!(json, "\"center\"");
        let parsed: Anchor = serde_json::from_str("\"end\"").unwrap();
        assert_eq!(parsed, Anchor::End);
    }
}
