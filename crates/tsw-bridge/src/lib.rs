//! TSW 控制器桥接层
//!
//! 在外部控制器与游戏的虚拟 HID 输入管线之间双向同步控件值：
//!
//! - 入站：传输线程收到 `direct_control,<name>,<value>` → 解析 → 入队
//! - 帧线程：每帧取出队列 → 同名命令只保留最后一个值 → 解析 `{SIDE}` → begin/set/end 写入控件
//! - 出站：控件值变更通知 → 回显过滤（只转发本地玩家的操作）→ `<identifier>,<value>`
//!
//! # 线程模型
//!
//! ```text
//! 传输线程 ──InboundBridge──▶ CommandQueue ◀──FrameBridge── 帧线程
//!                                                   │
//!                                   OutboundSink ◀──┘ (try_send)
//! ```
//!
//! `InboundBridge` 可以克隆并跨线程共享；`FrameBridge` 只能在帧线程上使用。
//!
//! # Example
//!
//! ```
//! use tsw_bridge::BridgeBuilder;
//! use crossbeam_channel::bounded;
//! use tsw_protocol::SyncControlMessage;
//!
//! let (tx, rx) = bounded::<SyncControlMessage>(50);
//! let (inbound, frame) = BridgeBuilder::new().sink(tx).build().unwrap();
//!
//! let transport = std::thread::spawn(move || {
//!     inbound.on_message_received("direct_control,Throttle,0.8");
//! });
//! transport.join().unwrap();
//!
//! // 帧线程上：frame.on_pre_frame(&host, "ReceiveTick")
//! assert_eq!(frame.queue().len(), 1);
//! # drop(rx);
//! ```

mod apply;
mod builder;
mod coalesce;
mod config;
mod error;
mod frame;
pub mod echo;
pub mod hooks;
pub mod host;
mod inbound;
pub mod metrics;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod outbound;
mod queue;
pub mod side;

pub use apply::{ApplyReport, CommandApplier, MissingContext};
pub use builder::BridgeBuilder;
pub use coalesce::{CoalescedBatch, FrameCoalescer};
pub use config::BridgeConfig;
pub use echo::{ChangeEvent, ChangeOrigin, EchoGuard};
pub use error::{BridgeError, OutboundError};
pub use frame::{FrameBridge, TickOutcome};
pub use hooks::{HookRegistry, HostHook, InstalledHooks};
pub use host::HostSimulation;
pub use inbound::InboundBridge;
pub use metrics::{BridgeMetrics, MetricsSnapshot};
pub use outbound::{OutboundBridge, OutboundSink};
pub use queue::CommandQueue;
pub use side::{ControlNameResolver, TrainSide};
