//! 出站桥接
//!
//! 把被判定为玩家操作的变更序列化为 `<identifier>,<value>`，交给出站通道。
//! Fire-and-forget：不重试、不等待确认；通道满或关闭时只计数丢弃。
//!
//! # 出站通道要求
//!
//! `OutboundSink::send` 在帧线程上调用，必须是非阻塞的（`try_send`）。
//!
//! ```rust
//! use tsw_bridge::outbound::OutboundSink;
//! use tsw_protocol::SyncControlMessage;
//! use crossbeam_channel::bounded;
//!
//! let (tx, rx) = bounded::<SyncControlMessage>(50);
//! tx.send_message(SyncControlMessage::new("Throttle", 0.5)).unwrap();
//! assert_eq!(rx.try_recv().unwrap().to_string(), "Throttle,0.5");
//! ```

use crate::echo::ChangeEvent;
use crate::error::OutboundError;
use crate::metrics::BridgeMetrics;
use crossbeam_channel::{Sender, TrySendError};
use std::sync::Arc;
use tracing::{trace, warn};
use tsw_protocol::SyncControlMessage;

/// 出站通道
pub trait OutboundSink: Send {
    /// 非阻塞投递一条同步消息
    fn send_message(&self, message: SyncControlMessage) -> Result<(), OutboundError>;
}

impl OutboundSink for Sender<SyncControlMessage> {
    fn send_message(&self, message: SyncControlMessage) -> Result<(), OutboundError> {
        self.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => OutboundError::Full,
            TrySendError::Disconnected(_) => OutboundError::Disconnected,
        })
    }
}

impl<S: OutboundSink + Sync + ?Sized> OutboundSink for Arc<S> {
    fn send_message(&self, message: SyncControlMessage) -> Result<(), OutboundError> {
        (**self).send_message(message)
    }
}

/// 出站桥接（帧线程）
pub struct OutboundBridge {
    sink: Box<dyn OutboundSink>,
    metrics: Arc<BridgeMetrics>,
}

impl OutboundBridge {
    pub fn new(sink: Box<dyn OutboundSink>, metrics: Arc<BridgeMetrics>) -> Self {
        Self { sink, metrics }
    }

    /// 转发一个玩家变更；返回是否成功交给出站通道
    pub fn forward(&self, event: &ChangeEvent) -> bool {
        let message = SyncControlMessage::new(event.identifier.as_str(), event.new_value);
        trace!("Syncing {}", message);

        match self.sink.send_message(message) {
            Ok(()) => {
                BridgeMetrics::incr(&self.metrics.echoes_forwarded);
                true
            },
            Err(e) => {
                BridgeMetrics::incr(&self.metrics.outbound_dropped);
                warn!("Dropping sync message for {}: {}", event.identifier, e);
                false
            },
        }
    }
}

impl std::fmt::Debug for OutboundBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutboundBridge").finish_non_exhaustive()
    }
}
