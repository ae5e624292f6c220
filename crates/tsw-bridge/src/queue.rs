//! 命令队列
//!
//! 传输线程（写入）与帧线程（读取）之间唯一的共享可变状态。
//!
//! # 锁策略
//!
//! - 写入方只在 `push_back` 期间持有互斥锁
//! - 读取方只在 `mem::take` 交换期间持有互斥锁
//!
//! 两侧的临界区都是常数时间，与队列深度无关。不存在并发读取，
//! 所以使用普通互斥锁（`parking_lot::Mutex`）而不是读写锁。

use crate::metrics::BridgeMetrics;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{trace, warn};
use tsw_protocol::ControlCommand;

/// 线程安全的 FIFO 命令队列
///
/// # Example
///
/// ```
/// use tsw_bridge::CommandQueue;
/// use tsw_protocol::ControlCommand;
///
/// let queue = CommandQueue::unbounded();
/// queue.enqueue(ControlCommand::direct("Throttle", 0.5));
/// queue.enqueue(ControlCommand::direct("Throttle", 0.7));
///
/// let drained = queue.drain_all();
/// assert_eq!(drained.len(), 2);
/// assert!(queue.drain_all().is_empty());
/// ```
#[derive(Debug)]
pub struct CommandQueue {
    inner: Mutex<VecDeque<ControlCommand>>,
    /// 深度上限；`None` 表示无上限
    max_depth: Option<usize>,
    /// 关闭后拒绝新命令（预帧钩子不可用时，避免队列无限增长）
    open: AtomicBool,
    metrics: Arc<BridgeMetrics>,
}

impl CommandQueue {
    pub fn new(max_depth: Option<usize>, metrics: Arc<BridgeMetrics>) -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            max_depth,
            open: AtomicBool::new(true),
            metrics,
        }
    }

    /// 无上限队列（独立指标）
    pub fn unbounded() -> Self {
        Self::new(None, Arc::new(BridgeMetrics::new()))
    }

    /// 入队
    ///
    /// 返回命令是否被接受（队列关闭时返回 `false`）。
    /// 队列达到上限时丢弃最旧的命令，新命令总是被接受。
    pub fn enqueue(&self, command: ControlCommand) -> bool {
        let evicted = {
            let mut queue = self.inner.lock();
            // 开关状态只在持锁时读写，关闭后不会再有命令残留
            if !self.is_open() {
                drop(queue);
                trace!("Queue closed, dropping command for {}", command.name);
                return false;
            }
            let evicted = match self.max_depth {
                Some(max) if queue.len() >= max => queue.pop_front(),
                _ => None,
            };
            queue.push_back(command);
            evicted
        };

        BridgeMetrics::incr(&self.metrics.commands_enqueued);
        if let Some(old) = evicted {
            BridgeMetrics::incr(&self.metrics.commands_overflowed);
            warn!(
                "Command queue full, dropped oldest command {}={}",
                old.name, old.value
            );
        }
        true
    }

    /// 取出当前所有命令（按入队顺序）
    ///
    /// 不等待新命令；队列为空时返回空 `Vec`。
    pub fn drain_all(&self) -> Vec<ControlCommand> {
        let drained = std::mem::take(&mut *self.inner.lock());
        Vec::from(drained)
    }

    /// 当前队列深度
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// 关闭队列并清空积压
    pub fn close(&self) {
        self.set_open(false);
    }

    /// 打开或关闭队列；关闭时清空积压
    pub fn set_open(&self, open: bool) {
        let mut queue = self.inner.lock();
        self.open.store(open, Ordering::Release);
        if !open {
            queue.clear();
        }
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn metrics(&self) -> &Arc<BridgeMetrics> {
        &self.metrics
    }
}
