//! Builder 模式实现
//!
//! 一次构造出共享同一个命令队列和指标的入站/帧线程两半。

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::frame::FrameBridge;
use crate::inbound::InboundBridge;
use crate::metrics::BridgeMetrics;
use crate::outbound::{OutboundBridge, OutboundSink};
use crate::queue::CommandQueue;
use std::sync::Arc;
use tracing::info;

/// 桥接层 Builder（链式构造）
///
/// # Example
///
/// ```
/// use tsw_bridge::{BridgeBuilder, BridgeConfig};
/// use crossbeam_channel::bounded;
/// use tsw_protocol::SyncControlMessage;
///
/// let (tx, _rx) = bounded::<SyncControlMessage>(50);
/// let (inbound, frame) = BridgeBuilder::new()
///     .config(BridgeConfig::default())
///     .sink(tx)
///     .build()
///     .unwrap();
///
/// inbound.on_message_received("direct_control,Throttle,0.5");
/// assert_eq!(frame.queue().len(), 1);
/// ```
#[derive(Default)]
pub struct BridgeBuilder {
    config: Option<BridgeConfig>,
    sink: Option<Box<dyn OutboundSink>>,
    metrics: Option<Arc<BridgeMetrics>>,
}

impl BridgeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置桥接配置（默认 `BridgeConfig::default()`）
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// 设置出站通道（必需）
    pub fn sink<S: OutboundSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// 共享外部指标实例
    pub fn metrics(mut self, metrics: Arc<BridgeMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// 构造入站与帧线程两半
    ///
    /// # 错误
    ///
    /// - `BridgeError::InvalidConfig`: 配置校验失败
    /// - `BridgeError::MissingSink`: 未设置出站通道
    pub fn build(self) -> Result<(InboundBridge, FrameBridge), BridgeError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let sink = self.sink.ok_or(BridgeError::MissingSink)?;
        let metrics = self.metrics.unwrap_or_default();

        let queue = Arc::new(CommandQueue::new(config.max_queue_depth, metrics.clone()));
        let outbound = OutboundBridge::new(sink, metrics);
        let frame = FrameBridge::new(&config, queue.clone(), outbound);

        info!(
            "Bridge ready (tick event: {}, queue depth: {:?})",
            config.tick_event_name, config.max_queue_depth
        );
        Ok((InboundBridge::new(queue), frame))
    }
}

impl std::fmt::Debug for BridgeBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeBuilder")
            .field("config", &self.config)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}
