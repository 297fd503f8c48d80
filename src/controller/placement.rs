use tracing::debug;

use crate::anchor::{Anchor, anchor_shift, anchored_offset};
use crate::controller::{Inner, WindowController};
use crate::geometry::{Rect, WindowSize};

/// 定位轴
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Top,
    Left,
}

impl Inner {
    /// 按百分比和锚点定位一个轴，记录锚点后重新夹紧
    pub(crate) fn place_local(&self, axis: Axis, value: f64, anchor: Anchor) {
        let monitor = self.display.monitor_at_pointer();

        match axis {
            Axis::Top => {
                let top = anchored_offset(value, self.window.height(), monitor.top, monitor.height, anchor);
                self.set_anchor(axis, anchor);
                self.window.set_top(top);
            }
            Axis::Left => {
                let left = anchored_offset(value, self.window.width(), monitor.left, monitor.width, anchor);
                self.set_anchor(axis, anchor);
                self.window.set_left(left);
            }
        }

        self.ensure_bounds_local();
    }

    fn set_anchor(&self, axis: Axis, anchor: Anchor) {
        if let Ok(mut anchors) = self.anchors.lock() {
            match axis {
                Axis::Top => anchors.top = anchor,
                Axis::Left => anchors.left = anchor,
            }
        }
    }

    /// 应用恢复的尺寸，按记录的锚点平移以保持锚点不动
    pub(crate) fn apply_restored_size(&self, size: WindowSize) {
        let previous = WindowSize::new(self.window.width(), self.window.height());
        self.window.set_size(size);

        let anchors = self.anchors.lock().map(|a| *a).unwrap_or_default();
        let dx = anchor_shift(anchors.left, previous.width, size.width);
        let dy = anchor_shift(anchors.top, previous.height, size.height);
        if dx != 0.0 {
            self.window.set_left(self.window.left() + dx);
        }
        if dy != 0.0 {
            self.window.set_top(self.window.top() + dy);
        }

        debug!(
            "窗口 {} 恢复尺寸 {}x{} -> {}x{}，平移 ({}, {})",
            self.window.identifier(),
            previous.width,
            previous.height,
            size.width,
            size.height,
            dx,
            dy
        );

        self.ensure_bounds_local();
    }
}

impl WindowController {
    pub fn width(&self) -> f64 {
        self.on_owner("width", |inner| inner.window.width())
            .unwrap_or_default()
    }

    pub fn set_width(&self, width: f64) {
        self.on_owner("set_width", move |inner| inner.window.set_width(width));
    }

    pub fn height(&self) -> f64 {
        self.on_owner("height", |inner| inner.window.height())
            .unwrap_or_default()
    }

    pub fn set_height(&self, height: f64) {
        self.on_owner("set_height", move |inner| inner.window.set_height(height));
    }

    pub fn top(&self) -> f64 {
        self.on_owner("top", |inner| inner.window.top())
            .unwrap_or_default()
    }

    pub fn left(&self) -> f64 {
        self.on_owner("left", |inner| inner.window.left())
            .unwrap_or_default()
    }

    /// 窗口当前矩形
    pub fn bounds(&self) -> Rect {
        self.on_owner("bounds", |inner| inner.window.bounds())
            .unwrap_or_default()
    }

    /// 按位移移动窗口，之后重新夹紧
    pub fn move_by(&self, dx: f64, dy: f64) {
        self.on_owner("move_by", move |inner| {
            if dx != 0.0 {
                inner.window.set_left(inner.window.left() + dx);
            }
            if dy != 0.0 {
                inner.window.set_top(inner.window.top() + dy);
            }
            inner.ensure_bounds_local();
        });
    }

    /// 垂直定位，`y` 可以是比例（0.5）或百分数（50）
    pub fn set_top_percent(&self, y: f64, anchor: Anchor) {
        self.on_owner("set_top_percent", move |inner| inner.place_local(Axis::Top, y, anchor));
    }

    /// 水平定位，`x` 可以是比例（0.5）或百分数（50）
    pub fn set_left_percent(&self, x: f64, anchor: Anchor) {
        self.on_owner("set_left_percent", move |inner| inner.place_local(Axis::Left, x, anchor));
    }
}
