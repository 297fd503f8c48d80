use serde::{Deserialize, Serialize};

/// 虚拟桌面坐标系中的一个像素点
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 窗口尺寸（像素）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: f64,
    pub height: f64,
}

impl WindowSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// 宽高都为有限正数时才可用于恢复
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// 矩形区域，原点为左上角
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.y >= self.top
            && point.x < self.right()
            && point.y < self.bottom()
    }

    pub fn size(&self) -> WindowSize {
        WindowSize::new(self.width, self.height)
    }
}

/// 指针所在显示器的矩形区域
pub type MonitorRect = Rect;

/// 将窗口矩形夹紧到显示器内
///
/// 每个轴先检查尾边再检查首边，窗口比显示器更大时首边检查最后生效，
/// 窗口被钉在该轴的最小坐标上。
pub fn clamp_to_monitor(window: Rect, monitor: MonitorRect) -> Rect {
    let mut left = window.left;
    let mut top = window.top;

    if left + window.width > monitor.right() {
        left = monitor.right() - window.width;
    }
    if left < monitor.left {
        left = monitor.left;
    }

    if top + window.height > monitor.bottom() {
        top = monitor.bottom() - window.height;
    }
    if top < monitor.top {
        top = monitor.top;
    }

    Rect { left, top, ..window }
}
