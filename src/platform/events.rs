use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::geometry::WindowSize;

/// 平台层发出的窗口通知
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    /// 可见性变化
    VisibilityChanged(bool),
    /// 窗口加载完成
    Loaded,
    /// 尺寸变化
    SizeChanged(WindowSize),
    /// 窗口失去焦点
    Deactivated,
    /// 窗口即将关闭
    Closing,
}

impl WindowEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            WindowEvent::VisibilityChanged(_) => EventKind::VisibilityChanged,
            WindowEvent::Loaded => EventKind::Loaded,
            WindowEvent::SizeChanged(_) => EventKind::SizeChanged,
            WindowEvent::Deactivated => EventKind::Deactivated,
            WindowEvent::Closing => EventKind::Closing,
        }
    }
}

/// 可订阅的通知类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    VisibilityChanged,
    Loaded,
    SizeChanged,
    Deactivated,
    Closing,
}

/// 订阅凭据，用于取消订阅
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

pub type EventHandler = Arc<dyn Fn(&WindowEvent) + Send + Sync>;

/// 窗口通知中心
///
/// 处理函数在锁外调用，处理函数内部可以安全地取消订阅。
#[derive(Default)]
pub struct EventHub {
    next_id: AtomicU64,
    handlers: Mutex<HashMap<EventKind, Vec<(SubscriptionToken, EventHandler)>>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// 订阅某类通知
    pub fn subscribe(&self, kind: EventKind, handler: EventHandler) -> SubscriptionToken {
        let token = SubscriptionToken(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.entry(kind).or_default().push((token, handler));
        }
        token
    }

    /// 取消订阅，凭据不存在时返回 false
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let Ok(mut handlers) = self.handlers.lock() else {
            return false;
        };
        for list in handlers.values_mut() {
            if let Some(index) = list.iter().position(|(t, _)| *t == token) {
                list.remove(index);
                return true;
            }
        }
        false
    }

    /// 向所有订阅者广播通知
    pub fn emit(&self, event: &WindowEvent) {
        let targets: Vec<EventHandler> = match self.handlers.lock() {
            Ok(handlers) => handlers
                .get(&event.kind())
                .map(|list| list.iter().map(|(_, h)| h.clone()).collect())
                .unwrap_or_default(),
            Err(_) => return,
        };

        debug!("广播窗口通知 {:?} -> {} 个订阅者", event, targets.len());
        for handler in targets {
            handler(event);
        }
    }

    /// 当前订阅总数
    pub fn subscriber_count(&self) -> usize {
        self.handlers
            .lock()
            .map(|handlers| handlers.values().map(Vec::len).sum())
            .unwrap_or(0)
    }
}
