use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::controller::{ControllerConfig, Inner, WindowController};
use crate::keybind::{KeybindHandler, KeybindToken};
use crate::platform::{EventHandler, EventKind, SubscriptionToken, WindowEvent};
use crate::store::PersistedWindowRecord;

/// 生命周期状态，`Closing` 为终态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Active,
    Closing,
}

#[derive(Debug, Clone, Copy)]
enum Condition {
    Always,
    CloseOnBlur,
    CloseOnKey,
}

#[derive(Debug, Clone, Copy)]
enum Source {
    Window(EventKind),
    CloseKeybind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reaction {
    EnsureBounds,
    PersistSize,
    RestoreSize,
    Close,
    Teardown,
}

struct Binding {
    condition: Condition,
    source: Source,
    reaction: Reaction,
}

const fn bind(condition: Condition, source: Source, reaction: Reaction) -> Binding {
    Binding { condition, source, reaction }
}

/// 构建时按顺序求值一次，关闭时按同一张表拆除
const BINDINGS: &[Binding] = &[
    bind(Condition::Always, Source::Window(EventKind::VisibilityChanged), Reaction::EnsureBounds),
    bind(Condition::Always, Source::Window(EventKind::Loaded), Reaction::EnsureBounds),
    bind(Condition::Always, Source::Window(EventKind::SizeChanged), Reaction::EnsureBounds),
    bind(Condition::Always, Source::Window(EventKind::SizeChanged), Reaction::PersistSize),
    bind(Condition::Always, Source::Window(EventKind::Loaded), Reaction::RestoreSize),
    bind(Condition::CloseOnBlur, Source::Window(EventKind::Deactivated), Reaction::Close),
    bind(Condition::CloseOnKey, Source::CloseKeybind, Reaction::Close),
    bind(Condition::Always, Source::Window(EventKind::Closing), Reaction::Teardown),
];

impl Condition {
    fn holds(self, config: &ControllerConfig) -> bool {
        match self {
            Condition::Always => true,
            Condition::CloseOnBlur => config.binds_blur(),
            Condition::CloseOnKey => config.close_on_key,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Subscription {
    Window(SubscriptionToken),
    Keybind(KeybindToken),
}

/// 订阅集合与关闭标志
pub(crate) struct Lifecycle {
    closing: AtomicBool,
    active: Mutex<Vec<(Reaction, Subscription)>>,
}

impl Lifecycle {
    pub(crate) fn new() -> Self {
        Self {
            closing: AtomicBool::new(false),
            active: Mutex::new(Vec::new()),
        }
    }
}

/// 按绑定表注册订阅
pub(crate) fn wire(inner: &Arc<Inner>) {
    let weak = Arc::downgrade(inner);
    let mut active = Vec::new();

    for binding in BINDINGS {
        if !binding.condition.holds(&inner.config) {
            continue;
        }

        let subscription = match binding.source {
            Source::Window(kind) => {
                let token = inner.events.subscribe(kind, window_handler(weak.clone(), binding.reaction));
                Subscription::Window(token)
            }
            Source::CloseKeybind => match &inner.keybinds {
                Some(keybinds) => Subscription::Keybind(keybinds.subscribe(keybind_handler(weak.clone()))),
                None => continue,
            },
        };
        active.push((binding.reaction, subscription));
    }

    debug!("窗口 {} 注册了 {} 个订阅", inner.window.identifier(), active.len());
    if let Ok(mut slot) = inner.lifecycle.active.lock() {
        *slot = active;
    }
}

fn window_handler(weak: Weak<Inner>, reaction: Reaction) -> EventHandler {
    Arc::new(move |event: &WindowEvent| {
        if let Some(inner) = weak.upgrade() {
            WindowController { inner }.react(reaction, event);
        }
    })
}

fn keybind_handler(weak: Weak<Inner>) -> KeybindHandler {
    Arc::new(move || {
        let weak = weak.clone();
        async move {
            if let Some(inner) = weak.upgrade() {
                debug!("收到关闭快捷键: {}", inner.window.identifier());
                WindowController { inner }.close();
            }
            true
        }
        .boxed()
    })
}

impl WindowController {
    fn react(&self, reaction: Reaction, event: &WindowEvent) {
        match reaction {
            Reaction::EnsureBounds => self.ensure_bounds(),
            Reaction::PersistSize => self.persist_size(),
            Reaction::RestoreSize => self.restore_size(),
            Reaction::Close => self.close(),
            Reaction::Teardown => {
                debug!("窗口 {} 收到 {:?}", self.identifier(), event);
                self.teardown();
            }
        }
    }

    /// 当前生命周期状态
    pub fn state(&self) -> LifecycleState {
        if self.is_closing() {
            LifecycleState::Closing
        } else {
            LifecycleState::Active
        }
    }

    pub fn is_closing(&self) -> bool {
        self.inner.lifecycle.closing.load(Ordering::SeqCst)
    }

    /// 仍然有效的订阅数量
    pub fn active_bindings(&self) -> usize {
        self.inner
            .lifecycle
            .active
            .lock()
            .map(|active| active.len())
            .unwrap_or(0)
    }

    /// 关闭窗口：先拆除订阅，再请求平台关闭；重复调用不做任何事
    pub fn close(&self) {
        if self.teardown() {
            self.inner.window.close();
        }
    }

    /// 进入 `Closing` 状态并取消全部订阅，仅第一次调用生效
    fn teardown(&self) -> bool {
        if self.inner.lifecycle.closing.swap(true, Ordering::SeqCst) {
            debug!("窗口 {} 已在关闭中，忽略重复请求", self.identifier());
            return false;
        }

        let active = match self.inner.lifecycle.active.lock() {
            Ok(mut active) => std::mem::take(&mut *active),
            Err(_) => Vec::new(),
        };

        let mut removed = 0;
        for (reaction, subscription) in &active {
            let ok = match subscription {
                Subscription::Window(token) => self.inner.events.unsubscribe(*token),
                Subscription::Keybind(token) => self
                    .inner
                    .keybinds
                    .as_ref()
                    .is_some_and(|keybinds| keybinds.unsubscribe(*token)),
            };
            if ok {
                removed += 1;
            } else {
                warn!("窗口 {} 取消订阅 {:?} 失败", self.identifier(), reaction);
            }
        }

        info!("窗口 {} 关闭，取消了 {} 个订阅", self.identifier(), removed);
        true
    }

    /// 后台写入当前尺寸，不等待结果
    fn persist_size(&self) {
        let Some(size) = self.on_owner("persist_size", |inner| inner.window.bounds().size()) else {
            return;
        };
        let record = PersistedWindowRecord::new(self.identifier(), size);
        let store = self.inner.store.clone();

        self.inner.runtime.spawn(async move {
            let identifier = record.identifier.clone();
            if let Err(e) = store.save_size(record).await {
                warn!("保存窗口 {} 尺寸失败: {}", identifier, e);
            }
        });
    }

    /// 后台读取持久化尺寸，读到后回到所属线程应用
    fn restore_size(&self) {
        let weak = Arc::downgrade(&self.inner);
        let store = self.inner.store.clone();
        let identifier = self.identifier().to_string();

        self.inner.runtime.spawn(async move {
            let size = match store.load_size(&identifier).await {
                Ok(Some(size)) => size,
                Ok(None) => {
                    debug!("窗口 {} 没有保存的尺寸", identifier);
                    return;
                }
                Err(e) if e.is_corrupt_record() => {
                    debug!("窗口 {} 的尺寸记录已损坏，按无记录处理: {}", identifier, e);
                    return;
                }
                Err(e) => {
                    warn!("读取窗口 {} 尺寸失败: {}", identifier, e);
                    return;
                }
            };

            let Some(inner) = weak.upgrade() else {
                return;
            };
            if inner.lifecycle.closing.load(Ordering::SeqCst) {
                return;
            }

            let dispatcher = inner.dispatcher.clone();
            let target = inner.clone();
            match dispatcher
                .invoke_async(move || {
                    // 派发期间可能已经关闭
                    if target.lifecycle.closing.load(Ordering::SeqCst) {
                        return false;
                    }
                    target.apply_restored_size(size);
                    true
                })
                .await
            {
                Ok(true) => {}
                Ok(false) => debug!("窗口 {} 已关闭，放弃恢复尺寸", identifier),
                Err(e) => warn!("窗口 {} 恢复尺寸派发失败: {}", identifier, e),
            }
        });
    }
}
