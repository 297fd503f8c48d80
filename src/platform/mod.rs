mod creation;
mod events;
mod winit_window;

pub use creation::*;
pub use events::*;
pub use winit_window::*;

use crate::geometry::{MonitorRect, Point, Rect, WindowSize};

/// 平台窗口句柄
///
/// 所有像素值都是虚拟桌面坐标。实现方只需保证在所属线程上调用时正确，
/// 线程亲和由控制器的派发器负责。
pub trait PlatformWindow: Send + Sync {
    /// 持久化使用的窗口标识
    fn identifier(&self) -> &str;

    fn left(&self) -> f64;
    fn set_left(&self, left: f64);
    fn top(&self) -> f64;
    fn set_top(&self, top: f64);
    fn width(&self) -> f64;
    fn set_width(&self, width: f64);
    fn height(&self) -> f64;
    fn set_height(&self, height: f64);

    /// 一次设置宽高；异步调整尺寸的平台应覆盖此方法，避免用旧尺寸补另一维
    fn set_size(&self, size: WindowSize) {
        self.set_width(size.width);
        self.set_height(size.height);
    }

    fn is_visible(&self) -> bool;

    /// 请求关闭窗口，平台随后发出 `Closing` 通知
    fn close(&self);

    fn bounds(&self) -> Rect {
        Rect::new(self.left(), self.top(), self.width(), self.height())
    }
}

/// 显示器布局查询
pub trait DisplayLayout: Send + Sync {
    /// 当前指针位置
    fn pointer_position(&self) -> Point;

    /// 包含该点的显示器；找不到时由平台层回退到主显示器
    fn monitor_containing(&self, point: Point) -> MonitorRect;

    fn monitor_at_pointer(&self) -> MonitorRect {
        self.monitor_containing(self.pointer_position())
    }
}
