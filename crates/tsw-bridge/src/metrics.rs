//! 桥接层运行指标
//!
//! 原子计数器，传输线程和帧线程都会写入，任何线程都可以读取快照，不引入锁竞争。

use std::sync::atomic::{AtomicU64, Ordering};

/// 桥接层实时指标
///
/// # 使用示例
///
/// ```rust
/// use tsw_bridge::BridgeMetrics;
/// use std::sync::Arc;
/// use std::sync::atomic::Ordering;
///
/// let metrics = Arc::new(BridgeMetrics::default());
/// metrics.messages_received.fetch_add(1, Ordering::Relaxed);
///
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.messages_received, 1);
/// ```
#[derive(Debug, Default)]
pub struct BridgeMetrics {
    /// 传输层交付的入站消息总数
    pub messages_received: AtomicU64,
    /// 解析失败被丢弃的入站消息数
    pub messages_rejected: AtomicU64,
    /// 入队的命令数
    pub commands_enqueued: AtomicU64,
    /// 队列达到上限时丢弃的最旧命令数
    pub commands_overflowed: AtomicU64,
    /// 同一帧内被更新值覆盖的命令数
    pub commands_superseded: AtomicU64,
    /// 成功进入应用阶段的批次数
    pub batches_applied: AtomicU64,
    /// 因缺少控制器/Pawn/可驾驶 Actor 而整体丢弃的批次数
    pub batches_discarded: AtomicU64,
    /// 找不到目标控件而跳过的条目数
    pub entries_skipped: AtomicU64,
    /// 完成 begin → set → end 的应用次数
    pub applies: AtomicU64,
    /// 转发给外部控制器的变更数
    pub echoes_forwarded: AtomicU64,
    /// 被回显过滤器拦截的变更数
    pub echoes_suppressed: AtomicU64,
    /// 出站通道满或关闭导致丢弃的消息数
    pub outbound_dropped: AtomicU64,
}

impl BridgeMetrics {
    /// 创建新的指标实例（所有计数器初始化为 0）
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn incr(counter: &AtomicU64) {
        Self::add(counter, 1);
    }

    /// 获取指标快照
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_received: self.messages_received.load(Ordering::Relaxed),
            messages_rejected: self.messages_rejected.load(Ordering::Relaxed),
            commands_enqueued: self.commands_enqueued.load(Ordering::Relaxed),
            commands_overflowed: self.commands_overflowed.load(Ordering::Relaxed),
            commands_superseded: self.commands_superseded.load(Ordering::Relaxed),
            batches_applied: self.batches_applied.load(Ordering::Relaxed),
            batches_discarded: self.batches_discarded.load(Ordering::Relaxed),
            entries_skipped: self.entries_skipped.load(Ordering::Relaxed),
            applies: self.applies.load(Ordering::Relaxed),
            echoes_forwarded: self.echoes_forwarded.load(Ordering::Relaxed),
            echoes_suppressed: self.echoes_suppressed.load(Ordering::Relaxed),
            outbound_dropped: self.outbound_dropped.load(Ordering::Relaxed),
        }
    }

    /// 重置所有计数器
    pub fn reset(&self) {
        for counter in [
            &self.messages_received,
            &self.messages_rejected,
            &self.commands_enqueued,
            &self.commands_overflowed,
            &self.commands_superseded,
            &self.batches_applied,
            &self.batches_discarded,
            &self.entries_skipped,
            &self.applies,
            &self.echoes_forwarded,
            &self.echoes_suppressed,
            &self.outbound_dropped,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// 指标快照（不可变）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub messages_received: u64,
    pub messages_rejected: u64,
    pub commands_enqueued: u64,
    pub commands_overflowed: u64,
    pub commands_superseded: u64,
    pub batches_applied: u64,
    pub batches_discarded: u64,
    pub entries_skipped: u64,
    pub applies: u64,
    pub echoes_forwarded: u64,
    pub echoes_suppressed: u64,
    pub outbound_dropped: u64,
}
