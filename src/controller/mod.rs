mod bounds;
mod lifecycle;
mod placement;

pub use lifecycle::LifecycleState;
pub use placement::Axis;

use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::runtime::Handle;
use tracing::{error, info};

use crate::anchor::AnchorSources;
use crate::dispatcher::Dispatcher;
use crate::keybind::CloseKeybindSource;
use crate::platform::{DisplayLayout, EventHub, PlatformWindow};
use crate::store::SizeStore;
use lifecycle::Lifecycle;

/// 控制器构建错误
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("当前线程没有可用的 tokio 运行时")]
    NoRuntime,

    #[error("启用了关闭快捷键但没有提供快捷键事件源")]
    MissingKeybindSource,
}

pub type ControllerResult<T> = Result<T, ControllerError>;

/// 控制器配置
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// 该窗口是否支持失焦关闭
    pub close_on_blur: bool,
    /// 该窗口是否响应关闭快捷键
    pub close_on_key: bool,
    /// 外部“失焦关闭”设置，构建时读取一次
    pub close_on_blur_setting: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            close_on_blur: false,
            close_on_key: false,
            close_on_blur_setting: true,
        }
    }
}

impl ControllerConfig {
    /// 是否绑定失焦关闭
    pub fn binds_blur(&self) -> bool {
        self.close_on_blur && self.close_on_blur_setting
    }
}

/// 控制器共享状态
pub(crate) struct Inner {
    window: Arc<dyn PlatformWindow>,
    display: Arc<dyn DisplayLayout>,
    events: Arc<EventHub>,
    keybinds: Option<Arc<dyn CloseKeybindSource>>,
    store: Arc<dyn SizeStore>,
    dispatcher: Arc<Dispatcher>,
    runtime: Handle,
    config: ControllerConfig,
    anchors: Mutex<AnchorSources>,
    lifecycle: Lifecycle,
}

/// 窗口几何与生命周期控制器
///
/// 可以在任意线程克隆和调用，几何读写会被派发到窗口所属线程执行。
#[derive(Clone)]
pub struct WindowController {
    inner: Arc<Inner>,
}

impl WindowController {
    pub fn builder(
        window: Arc<dyn PlatformWindow>,
        display: Arc<dyn DisplayLayout>,
        events: Arc<EventHub>,
        store: Arc<dyn SizeStore>,
    ) -> WindowControllerBuilder {
        WindowControllerBuilder::new(window, display, events, store)
    }

    /// 窗口标识
    pub fn identifier(&self) -> &str {
        self.inner.window.identifier()
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.inner.dispatcher
    }

    /// 当前记录的锚点
    pub fn anchor_sources(&self) -> AnchorSources {
        self.inner
            .anchors
            .lock()
            .map(|anchors| *anchors)
            .unwrap_or_default()
    }

    /// 在所属线程上执行，派发失败时记录日志并返回 `None`
    fn on_owner<F, R>(&self, op: &'static str, f: F) -> Option<R>
    where
        F: FnOnce(&Inner) -> R + Send + 'static,
        R: Send + 'static,
    {
        let inner = self.inner.clone();
        match self.inner.dispatcher.invoke(move || f(&inner)) {
            Ok(value) => Some(value),
            Err(e) => {
                error!("窗口 {} 的 {} 派发失败: {}", self.identifier(), op, e);
                None
            }
        }
    }
}

/// 控制器构建器
pub struct WindowControllerBuilder {
    window: Arc<dyn PlatformWindow>,
    display: Arc<dyn DisplayLayout>,
    events: Arc<EventHub>,
    store: Arc<dyn SizeStore>,
    keybinds: Option<Arc<dyn CloseKeybindSource>>,
    dispatcher: Option<Arc<Dispatcher>>,
    runtime: Option<Handle>,
    config: ControllerConfig,
}

impl WindowControllerBuilder {
    pub fn new(
        window: Arc<dyn PlatformWindow>,
        display: Arc<dyn DisplayLayout>,
        events: Arc<EventHub>,
        store: Arc<dyn SizeStore>,
    ) -> Self {
        Self {
            window,
            display,
            events,
            store,
            keybinds: None,
            dispatcher: None,
            runtime: None,
            config: ControllerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn close_on_blur(mut self, enable: bool) -> Self {
        self.config.close_on_blur = enable;
        self
    }

    pub fn close_on_key(mut self, enable: bool) -> Self {
        self.config.close_on_key = enable;
        self
    }

    pub fn with_blur_setting(mut self, close_on_blur: bool) -> Self {
        self.config.close_on_blur_setting = close_on_blur;
        self
    }

    pub fn with_keybinds(mut self, keybinds: Arc<dyn CloseKeybindSource>) -> Self {
        self.keybinds = Some(keybinds);
        self
    }

    /// 默认在调用 `build` 的线程上创建派发器
    pub fn with_dispatcher(mut self, dispatcher: Arc<Dispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// 后台持久化任务使用的运行时，默认取当前运行时
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// 构建控制器并注册所有订阅
    pub fn build(self) -> ControllerResult<WindowController> {
        if self.config.close_on_key && self.keybinds.is_none() {
            return Err(ControllerError::MissingKeybindSource);
        }

        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|_| ControllerError::NoRuntime)?,
        };

        let inner = Arc::new(Inner {
            window: self.window,
            display: self.display,
            events: self.events,
            keybinds: self.keybinds,
            store: self.store,
            dispatcher: self.dispatcher.unwrap_or_else(|| Arc::new(Dispatcher::new())),
            runtime,
            config: self.config,
            anchors: Mutex::new(AnchorSources::default()),
            lifecycle: Lifecycle::new(),
        });

        lifecycle::wire(&inner);

        info!(
            "窗口控制器初始化完成 - 标识: {}, 失焦关闭: {}, 快捷键关闭: {}",
            inner.window.identifier(),
            inner.config.binds_blur(),
            inner.config.close_on_key
        );

        Ok(WindowController { inner })
    }
}
