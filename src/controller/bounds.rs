use tracing::debug;

use crate::controller::{Inner, WindowController};
use crate::geometry::clamp_to_monitor;

impl Inner {
    /// 将可见窗口夹紧到指针所在显示器内，必须在所属线程上调用
    pub(crate) fn ensure_bounds_local(&self) {
        if !self.window.is_visible() {
            return;
        }

        // 每次都重新查询，显示器配置可能已经变化
        let monitor = self.display.monitor_at_pointer();
        let current = self.window.bounds();
        let clamped = clamp_to_monitor(current, monitor);

        if clamped.left != current.left {
            self.window.set_left(clamped.left);
        }
        if clamped.top != current.top {
            self.window.set_top(clamped.top);
        }

        if clamped != current {
            debug!(
                "窗口 {} 越界，从 ({}, {}) 移动到 ({}, {})",
                self.window.identifier(),
                current.left,
                current.top,
                clamped.left,
                clamped.top
            );
        }
    }
}

impl WindowController {
    /// 确保窗口位于指针所在的显示器内（窗口隐藏时不做任何事）
    pub fn ensure_bounds(&self) {
        self.on_owner("ensure_bounds", |inner| inner.ensure_bounds_local());
    }
}
