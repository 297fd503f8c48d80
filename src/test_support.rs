//! 控制器测试使用的假平台层。

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use crate::controller::{ControllerConfig, WindowController};
use tokio::runtime::Handle;

use crate::geometry::{MonitorRect, Point, Rect, WindowSize};
use crate::keybind::KeybindHub;
use crate::platform::{DisplayLayout, EventHub, PlatformWindow};
use crate::store::MemoryStore;

pub struct FakeWindow {
    rect: Mutex<Rect>,
    visible: AtomicBool,
    close_requests: AtomicUsize,
    size_requests: AtomicUsize,
    callers: Mutex<HashSet<ThreadId>>,
}

impl FakeWindow {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect: Mutex::new(rect),
            visible: AtomicBool::new(false),
            close_requests: AtomicUsize::new(0),
            size_requests: AtomicUsize::new(0),
            callers: Mutex::new(HashSet::new()),
        }
    }

    pub fn rect(&self) -> Rect {
        *self.rect.lock().unwrap()
    }

    pub fn set_rect(&self, rect: Rect) {
        *self.rect.lock().unwrap() = rect;
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    pub fn close_requests(&self) -> usize {
        self.close_requests.load(Ordering::SeqCst)
    }

    /// 一次性设置宽高的次数
    pub fn size_requests(&self) -> usize {
        self.size_requests.load(Ordering::SeqCst)
    }

    /// 所有几何访问都发生在给定线程上
    pub fn touched_only_by(&self, owner: ThreadId) -> bool {
        self.callers.lock().unwrap().iter().all(|id| *id == owner)
    }

    fn update(&self, f: impl FnOnce(&mut Rect)) {
        self.note_caller();
        f(&mut *self.rect.lock().unwrap());
    }

    fn read<R>(&self, f: impl FnOnce(&Rect) -> R) -> R {
        self.note_caller();
        f(&*self.rect.lock().unwrap())
    }

    fn note_caller(&self) {
        self.callers.lock().unwrap().insert(thread::current().id());
    }
}

impl PlatformWindow for FakeWindow {
    fn identifier(&self) -> &str {
        "test-window"
    }

    fn left(&self) -> f64 {
        self.read(|r| r.left)
    }

    fn set_left(&self, left: f64) {
        self.update(|r| r.left = left);
    }

    fn top(&self) -> f64 {
        self.read(|r| r.top)
    }

    fn set_top(&self, top: f64) {
        self.update(|r| r.top = top);
    }

    fn width(&self) -> f64 {
        self.read(|r| r.width)
    }

    fn set_width(&self, width: f64) {
        self.update(|r| r.width = width);
    }

    fn height(&self) -> f64 {
        self.read(|r| r.height)
    }

    fn set_height(&self, height: f64) {
        self.update(|r| r.height = height);
    }

    fn set_size(&self, size: WindowSize) {
        self.size_requests.fetch_add(1, Ordering::SeqCst);
        self.update(|r| {
            r.width = size.width;
            r.height = size.height;
        });
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    fn close(&self) {
        self.close_requests.fetch_add(1, Ordering::SeqCst);
    }
}

/// 指针永远落在同一块（可替换的）显示器上
pub struct FakeDisplay {
    monitor: Mutex<MonitorRect>,
    queries: AtomicUsize,
}

impl FakeDisplay {
    pub fn new(monitor: MonitorRect) -> Self {
        Self {
            monitor: Mutex::new(monitor),
            queries: AtomicUsize::new(0),
        }
    }

    pub fn set_monitor(&self, monitor: MonitorRect) {
        *self.monitor.lock().unwrap() = monitor;
    }

    pub fn monitor_queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl DisplayLayout for FakeDisplay {
    fn pointer_position(&self) -> Point {
        let monitor = *self.monitor.lock().unwrap();
        Point::new(monitor.left + 1.0, monitor.top + 1.0)
    }

    fn monitor_containing(&self, _point: Point) -> MonitorRect {
        self.queries.fetch_add(1, Ordering::SeqCst);
        *self.monitor.lock().unwrap()
    }
}

pub struct Harness {
    pub window: Arc<FakeWindow>,
    pub display: Arc<FakeDisplay>,
    pub events: Arc<EventHub>,
    pub keybinds: Arc<KeybindHub>,
    pub store: Arc<MemoryStore>,
    pub controller: WindowController,
}

impl Harness {
    /// 1920x1080 显示器，默认配置；需要在 tokio 运行时内调用
    pub fn new(rect: Rect) -> Self {
        Self::with_config(rect, ControllerConfig::default())
    }

    pub fn with_config(rect: Rect, config: ControllerConfig) -> Self {
        Self::build(rect, config, None)
    }

    /// 后台任务跑在给定运行时上；调用线程即窗口所属线程，无需处于运行时内
    pub fn with_runtime(rect: Rect, runtime: Handle) -> Self {
        Self::build(rect, ControllerConfig::default(), Some(runtime))
    }

    fn build(rect: Rect, config: ControllerConfig, runtime: Option<Handle>) -> Self {
        let window = Arc::new(FakeWindow::new(rect));
        let display = Arc::new(FakeDisplay::new(Rect::new(0.0, 0.0, 1920.0, 1080.0)));
        let events = Arc::new(EventHub::new());
        let keybinds = Arc::new(KeybindHub::new());
        let store = Arc::new(MemoryStore::new());

        let mut builder = WindowController::builder(
            window.clone(),
            display.clone(),
            events.clone(),
            store.clone(),
        )
        .with_config(config)
        .with_keybinds(keybinds.clone());
        if let Some(runtime) = runtime {
            builder = builder.with_runtime(runtime);
        }
        let controller = builder.build().unwrap();

        Self {
            window,
            display,
            events,
            keybinds,
            store,
            controller,
        }
    }
}

/// 让出执行权，使已派生的后台任务跑完
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
