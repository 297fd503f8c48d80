use overlay_window::{App, EventLoop, OverlaySettings, UserEvent};
use tracing_subscriber::EnvFilter;

/// 程序入口点
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = OverlaySettings::load_default();

    // 创建事件循环
    let event_loop = EventLoop::<UserEvent>::with_user_event()
        .build()
        .map_err(|e| anyhow::anyhow!("创建事件循环失败: {}", e))?;

    // 创建应用实例
    let mut app = App::new(settings, event_loop.create_proxy())?;

    // 运行应用
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow::anyhow!("运行应用失败: {}", e))?;

    Ok(())
}
