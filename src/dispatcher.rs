use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

type Job = Box<dyn FnOnce() + Send>;
type Waker = Arc<dyn Fn() + Send + Sync>;

/// 派发错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("所属线程已停止处理任务")]
    Disconnected,
}

pub type DispatchResult<T> = Result<T, DispatchError>;

/// 线程亲和派发器
///
/// 记录创建它的线程，所有几何读写都必须在该线程上执行。
/// 其他线程的调用会被排入队列，调用方阻塞直到所属线程执行完毕并交回结果。
pub struct Dispatcher {
    owner: ThreadId,
    sender: mpsc::UnboundedSender<Job>,
    receiver: Mutex<mpsc::UnboundedReceiver<Job>>,
    waker: Mutex<Option<Waker>>,
}

impl Dispatcher {
    /// 以当前线程为所属线程创建派发器
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            owner: thread::current().id(),
            sender,
            receiver: Mutex::new(receiver),
            waker: Mutex::new(None),
        }
    }

    /// 设置入队后的唤醒回调（例如唤醒事件循环）
    pub fn set_waker<F>(&self, waker: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        if let Ok(mut slot) = self.waker.lock() {
            *slot = Some(Arc::new(waker));
        }
    }

    /// 当前线程是否为所属线程
    pub fn check_access(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// 在所属线程上同步执行闭包并返回结果
    pub fn invoke<F, R>(&self, f: F) -> DispatchResult<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        if self.check_access() {
            return Ok(f());
        }

        let reply = self.enqueue(f)?;
        futures::executor::block_on(reply).map_err(|_| DispatchError::Disconnected)
    }

    /// 异步版本：挂起当前任务直到所属线程执行完毕
    pub async fn invoke_async<F, R>(&self, f: F) -> DispatchResult<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        if self.check_access() {
            return Ok(f());
        }

        let reply = self.enqueue(f)?;
        reply.await.map_err(|_| DispatchError::Disconnected)
    }

    /// 执行所有排队的任务，只能在所属线程上调用
    pub fn run_pending(&self) -> usize {
        if !self.check_access() {
            warn!("run_pending 在非所属线程上被调用，已忽略");
            return 0;
        }

        let mut executed = 0;
        loop {
            // 执行任务时不持有接收端锁
            let job = match self.receiver.lock() {
                Ok(mut receiver) => match receiver.try_recv() {
                    Ok(job) => job,
                    Err(_) => break,
                },
                Err(_) => break,
            };
            job();
            executed += 1;
        }

        if executed > 0 {
            debug!("派发器执行了 {} 个排队任务", executed);
        }
        executed
    }

    fn enqueue<F, R>(&self, f: F) -> DispatchResult<oneshot::Receiver<R>>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job: Job = Box::new(move || {
            let _ = reply_tx.send(f());
        });

        self.sender.send(job).map_err(|_| DispatchError::Disconnected)?;
        self.wake();
        Ok(reply_rx)
    }

    fn wake(&self) {
        let waker = self.waker.lock().ok().and_then(|slot| slot.clone());
        if let Some(waker) = waker {
            waker();
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
