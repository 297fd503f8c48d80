use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::monitor::MonitorHandle;
use winit::window::Window;

use crate::geometry::{MonitorRect, Point, Rect, WindowSize};
use crate::platform::{DisplayLayout, PlatformWindow, WindowEvent};

type CloseRequest = Box<dyn Fn() + Send + Sync>;

/// 基于 winit 的平台窗口
pub struct WinitWindow {
    window: Arc<Window>,
    identifier: String,
    visible: AtomicBool,
    on_close: CloseRequest,
}

impl WinitWindow {
    /// `on_close` 负责通知宿主事件循环关闭窗口
    pub fn new<F>(window: Arc<Window>, identifier: impl Into<String>, on_close: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let visible = window.is_visible().unwrap_or(false);
        Self {
            window,
            identifier: identifier.into(),
            visible: AtomicBool::new(visible),
            on_close: Box::new(on_close),
        }
    }

    /// 显示或隐藏窗口，返回可见性是否发生变化
    pub fn set_visible(&self, visible: bool) -> bool {
        self.window.set_visible(visible);
        self.visible.swap(visible, Ordering::SeqCst) != visible
    }

    fn position(&self) -> PhysicalPosition<i32> {
        self.window.outer_position().unwrap_or_default()
    }

    fn size(&self) -> PhysicalSize<u32> {
        self.window.inner_size()
    }

    fn resize(&self, width: f64, height: f64) {
        let width = width.max(1.0) as u32;
        let height = height.max(1.0) as u32;
        let _ = self.window.request_inner_size(PhysicalSize::new(width, height));
    }
}

impl PlatformWindow for WinitWindow {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn left(&self) -> f64 {
        self.position().x as f64
    }

    fn set_left(&self, left: f64) {
        let y = self.position().y;
        self.window.set_outer_position(PhysicalPosition::new(left as i32, y));
    }

    fn top(&self) -> f64 {
        self.position().y as f64
    }

    fn set_top(&self, top: f64) {
        let x = self.position().x;
        self.window.set_outer_position(PhysicalPosition::new(x, top as i32));
    }

    fn width(&self) -> f64 {
        self.size().width as f64
    }

    fn set_width(&self, width: f64) {
        let height = self.height();
        self.resize(width, height);
    }

    fn height(&self) -> f64 {
        self.size().height as f64
    }

    fn set_height(&self, height: f64) {
        let width = self.width();
        self.resize(width, height);
    }

    fn set_size(&self, size: WindowSize) {
        self.resize(size.width, size.height);
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    fn close(&self) {
        (self.on_close)();
    }
}

/// 基于 winit 显示器枚举的布局查询
pub struct WinitDisplay {
    window: Arc<Window>,
    last_cursor: Mutex<Option<Point>>,
}

impl WinitDisplay {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            last_cursor: Mutex::new(None),
        }
    }

    /// 记录窗口内的指针移动（窗口坐标），非 Windows 平台用它推算全局指针位置
    pub fn record_cursor(&self, position: PhysicalPosition<f64>) {
        let origin = self.window.outer_position().unwrap_or_default();
        if let Ok(mut last) = self.last_cursor.lock() {
            *last = Some(Point::new(
                origin.x as f64 + position.x,
                origin.y as f64 + position.y,
            ));
        }
    }

    fn window_center(&self) -> Point {
        let origin = self.window.outer_position().unwrap_or_default();
        let size = self.window.inner_size();
        Point::new(
            origin.x as f64 + size.width as f64 / 2.0,
            origin.y as f64 + size.height as f64 / 2.0,
        )
    }

    fn fallback_monitor(&self) -> MonitorRect {
        self.window
            .primary_monitor()
            .or_else(|| self.window.current_monitor())
            .or_else(|| self.window.available_monitors().next())
            .map(|handle| monitor_rect(&handle))
            .unwrap_or_else(|| {
                let origin = self.window.outer_position().unwrap_or_default();
                let size = self.window.inner_size();
                Rect::new(
                    origin.x as f64,
                    origin.y as f64,
                    size.width as f64,
                    size.height as f64,
                )
            })
    }
}

impl DisplayLayout for WinitDisplay {
    fn pointer_position(&self) -> Point {
        if let Some(point) = system_cursor_position() {
            return point;
        }
        self.last_cursor
            .lock()
            .ok()
            .and_then(|last| *last)
            .unwrap_or_else(|| self.window_center())
    }

    fn monitor_containing(&self, point: Point) -> MonitorRect {
        self.window
            .available_monitors()
            .map(|handle| monitor_rect(&handle))
            .find(|rect| rect.contains(point))
            .unwrap_or_else(|| self.fallback_monitor())
    }
}

fn monitor_rect(handle: &MonitorHandle) -> MonitorRect {
    let position = handle.position();
    let size = handle.size();
    Rect::new(
        position.x as f64,
        position.y as f64,
        size.width as f64,
        size.height as f64,
    )
}

#[cfg(windows)]
fn system_cursor_position() -> Option<Point> {
    use windows::Win32::Foundation::POINT;
    use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

    let mut point = POINT::default();
    unsafe { GetCursorPos(&mut point) }.ok()?;
    Some(Point::new(point.x as f64, point.y as f64))
}

#[cfg(not(windows))]
fn system_cursor_position() -> Option<Point> {
    None
}

/// 将 winit 窗口事件转换为控制器关心的通知
pub fn translate_event(event: &winit::event::WindowEvent) -> Option<WindowEvent> {
    use winit::event::WindowEvent as Winit;

    match event {
        Winit::Resized(size) => Some(WindowEvent::SizeChanged(WindowSize::new(
            size.width as f64,
            size.height as f64,
        ))),
        Winit::Focused(false) => Some(WindowEvent::Deactivated),
        Winit::CloseRequested => Some(WindowEvent::Closing),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_resize() {
        let event = winit::event::WindowEvent::Resized(PhysicalSize::new(640, 480));
        assert_eq!(
            translate_event(&event),
            Some(WindowEvent::SizeChanged(WindowSize::new(640.0, 480.0)))
        );
    }

    #[test]
    fn test_translate_focus() {
        let lost = winit::event::WindowEvent::Focused(false);
        let gained = winit::event::WindowEvent::Focused(true);
        assert_eq!(translate_event(&lost), Some(WindowEvent::Deactivated));
        assert_eq!(translate_event(&gained), None);
    }

    #[test]
    fn test_translate_close() {
        let event = winit::event::WindowEvent::CloseRequested;
        assert_eq!(translate_event(&event), Some(WindowEvent::Closing));
    }
}
