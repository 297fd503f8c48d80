use std::sync::{Arc, Mutex};

use tokio::runtime::Runtime;
use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoopProxy};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use crate::controller::WindowController;
use crate::dispatcher::Dispatcher;
use crate::keybind::KeybindHub;
use crate::platform::{self, EventHub, WinitDisplay, WinitWindow, create_overlay_window, translate_event};
use crate::settings::OverlaySettings;
use crate::store::{JsonFileStore, MemoryStore, SizeStore};

/// 事件循环的用户事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserEvent {
    /// 派发器有排队任务
    Dispatch,
    /// 控制器请求关闭窗口
    CloseWindow,
}

/// 已创建的悬浮窗口
struct Overlay {
    window: Arc<WinitWindow>,
    display: Arc<WinitDisplay>,
    controller: WindowController,
}

/// 应用程序主结构体，承载一个悬浮窗口
pub struct App {
    settings: OverlaySettings,
    runtime: Runtime,
    proxy: EventLoopProxy<UserEvent>,
    store: Arc<dyn SizeStore>,
    keybinds: Arc<KeybindHub>,
    events: Arc<EventHub>,
    overlay: Option<Overlay>,
}

impl App {
    pub fn new(settings: OverlaySettings, proxy: EventLoopProxy<UserEvent>) -> anyhow::Result<Self> {
        // 后台持久化任务使用的线程池
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("overlay-io")
            .enable_all()
            .build()?;

        let store: Arc<dyn SizeStore> = match JsonFileStore::with_default_dir() {
            Ok(store) => {
                info!("尺寸存储目录: {}", store.dir().display());
                Arc::new(store)
            }
            Err(e) => {
                warn!("无法创建尺寸存储目录，尺寸不会跨会话保存: {}", e);
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self {
            settings,
            runtime,
            proxy,
            store,
            keybinds: Arc::new(KeybindHub::new()),
            events: Arc::new(EventHub::new()),
            overlay: None,
        })
    }

    /// 创建窗口和控制器，放置窗口后显示并发出加载通知
    fn open_overlay(&mut self, event_loop: &ActiveEventLoop) -> Result<(), String> {
        let raw = create_overlay_window(
            event_loop,
            &self.settings.identifier,
            self.settings.initial_width,
            self.settings.initial_height,
        )?;

        let close_proxy = Mutex::new(self.proxy.clone());
        let window = Arc::new(WinitWindow::new(raw.clone(), self.settings.identifier.clone(), move || {
            if let Ok(proxy) = close_proxy.lock() {
                let _ = proxy.send_event(UserEvent::CloseWindow);
            }
        }));
        let display = Arc::new(WinitDisplay::new(raw));

        let dispatcher = Arc::new(Dispatcher::new());
        let wake_proxy = Mutex::new(self.proxy.clone());
        dispatcher.set_waker(move || {
            if let Ok(proxy) = wake_proxy.lock() {
                let _ = proxy.send_event(UserEvent::Dispatch);
            }
        });

        let controller = WindowController::builder(
            window.clone(),
            display.clone(),
            self.events.clone(),
            self.store.clone(),
        )
        .close_on_blur(true)
        .close_on_key(self.settings.close_on_key)
        .with_blur_setting(self.settings.close_on_blur)
        .with_keybinds(self.keybinds.clone())
        .with_dispatcher(dispatcher)
        .with_runtime(self.runtime.handle().clone())
        .build()
        .map_err(|e| format!("创建窗口控制器失败: {}", e))?;

        controller.set_top_percent(self.settings.top_percent, self.settings.top_anchor);
        controller.set_left_percent(self.settings.left_percent, self.settings.left_anchor);

        if window.set_visible(true) {
            self.events.emit(&platform::WindowEvent::VisibilityChanged(true));
        }
        self.events.emit(&platform::WindowEvent::Loaded);

        self.overlay = Some(Overlay {
            window,
            display,
            controller,
        });
        Ok(())
    }

    fn close_overlay(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(overlay) = self.overlay.take() {
            overlay.controller.close();
            overlay.window.set_visible(false);
            info!("悬浮窗口已关闭: {}", overlay.controller.identifier());
        }
        event_loop.exit();
    }

    fn raise_close_keybind(&self) {
        let keybinds = self.keybinds.clone();
        self.runtime.spawn(async move {
            let handled = keybinds.raise().await;
            debug!("关闭快捷键处理结果: {}", handled);
        });
    }
}

impl ApplicationHandler<UserEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.overlay.is_some() {
            return;
        }

        if let Err(e) = self.open_overlay(event_loop) {
            error!("{}", e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(overlay) = &self.overlay else {
            return;
        };

        match &event {
            WindowEvent::CursorMoved { position, .. } => {
                overlay.display.record_cursor(*position);
            }
            WindowEvent::KeyboardInput { event: key, .. }
                if key.state == ElementState::Pressed
                    && key.logical_key == Key::Named(NamedKey::Escape) =>
            {
                self.raise_close_keybind();
            }
            _ => {}
        }

        if let Some(translated) = translate_event(&event) {
            self.events.emit(&translated);
        }

        if matches!(event, WindowEvent::CloseRequested) {
            self.close_overlay(event_loop);
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::Dispatch => {
                if let Some(overlay) = &self.overlay {
                    overlay.controller.dispatcher().run_pending();
                }
            }
            UserEvent::CloseWindow => self.close_overlay(event_loop),
        }
    }
}
