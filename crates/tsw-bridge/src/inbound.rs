//! 入站桥接
//!
//! 由传输层的接收回调调用（传输线程）。解析文本并入队，
//! 任何失败都只记录日志，不会向传输层返回错误，也不会 panic。

use crate::metrics::BridgeMetrics;
use crate::queue::CommandQueue;
use std::sync::Arc;
use tracing::{debug, trace};
use tsw_protocol::ControlCommand;

/// 入站桥接（可克隆，跨线程共享）
#[derive(Debug, Clone)]
pub struct InboundBridge {
    queue: Arc<CommandQueue>,
}

impl InboundBridge {
    pub fn new(queue: Arc<CommandQueue>) -> Self {
        Self { queue }
    }

    fn metrics(&self) -> &BridgeMetrics {
        self.queue.metrics()
    }

    /// 处理一条入站文本
    pub fn on_message_received(&self, text: &str) {
        BridgeMetrics::incr(&self.metrics().messages_received);

        match ControlCommand::parse(text) {
            Ok(command) => {
                trace!("Queueing command {}={}", command.name, command.value);
                self.queue.enqueue(command);
            },
            Err(e) => {
                BridgeMetrics::incr(&self.metrics().messages_rejected);
                debug!("Dropping inbound message {:?}: {}", text, e);
            },
        }
    }

    pub fn queue(&self) -> &Arc<CommandQueue> {
        &self.queue
    }
}
