use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, join_all};
use tracing::debug;

/// 关闭快捷键处理函数，返回值表示是否已处理
pub type KeybindHandler = Arc<dyn Fn() -> BoxFuture<'static, bool> + Send + Sync>;

/// 关闭快捷键订阅凭据
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeybindToken(u64);

/// 全局“关闭窗口”快捷键事件源
pub trait CloseKeybindSource: Send + Sync {
    fn subscribe(&self, handler: KeybindHandler) -> KeybindToken;
    fn unsubscribe(&self, token: KeybindToken) -> bool;
}

/// 进程内的快捷键事件源
#[derive(Default)]
pub struct KeybindHub {
    next_id: AtomicU64,
    handlers: Mutex<Vec<(KeybindToken, KeybindHandler)>>,
}

impl KeybindHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// 触发关闭快捷键，等待所有处理函数完成
    ///
    /// 任一处理函数返回 true 即视为已处理。
    pub async fn raise(&self) -> bool {
        let handlers: Vec<KeybindHandler> = match self.handlers.lock() {
            Ok(handlers) => handlers.iter().map(|(_, h)| h.clone()).collect(),
            Err(_) => return false,
        };

        debug!("触发关闭快捷键 -> {} 个订阅者", handlers.len());
        let results = join_all(handlers.iter().map(|handler| handler())).await;
        results.into_iter().any(|handled| handled)
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.lock().map(|h| h.len()).unwrap_or(0)
    }
}

impl CloseKeybindSource for KeybindHub {
    fn subscribe(&self, handler: KeybindHandler) -> KeybindToken {
        let token = KeybindToken(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.push((token, handler));
        }
        token
    }

    fn unsubscribe(&self, token: KeybindToken) -> bool {
        let Ok(mut handlers) = self.handlers.lock() else {
            return false;
        };
        match handlers.iter().position(|(t, _)| *t == token) {
            Some(index) => {
                handlers.remove(index);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[tokio::test]
    async fn test_raise_without_subscribers() {
        let hub = KeybindHub::new();
        assert!(!hub.raise().await);
    }

    #[tokio::test]
    async fn test_raise_reports_handled() {
        let hub = KeybindHub::new();
        hub.subscribe(Arc::new(|| async { false }.boxed()));
        assert!(!hub.raise().await);

        let token = hub.subscribe(Arc::new(|| async { true }.boxed()));
        assert!(hub.raise().await);

        assert!(hub.unsubscribe(token));
        assert!(!hub.unsubscribe(token));
        assert_eq!(hub.subscriber_count(), 1);
    }
}
