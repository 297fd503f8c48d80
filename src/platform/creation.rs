use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowLevel};

/// 创建悬浮窗口
pub fn create_overlay_window(
    event_loop: &ActiveEventLoop,
    title: &str,
    width: u32,
    height: u32,
) -> std::result::Result<Arc<Window>, String> {
    let window_attributes = Window::default_attributes()
        .with_title(title)
        .with_inner_size(PhysicalSize::new(width, height))
        .with_decorations(false)
        .with_transparent(true)
        .with_window_level(WindowLevel::AlwaysOnTop)
        .with_visible(false); // 加载完成后再显示

    // 悬浮窗口不在任务栏显示图标
    #[cfg(windows)]
    let window_attributes = {
        use winit::platform::windows::WindowAttributesExtWindows;
        window_attributes.with_skip_taskbar(true)
    };

    let window = event_loop
        .create_window(window_attributes)
        .map_err(|e| format!("创建窗口失败: {}", e))?;

    Ok(Arc::new(window))
}
