//! # TSW Protocol
//!
//! 控制器应用与游戏内桥接层之间的文本线协议定义（无运行时依赖）
//!
//! ## 模块
//!
//! - `direct_control`: 入站直接控制指令（`direct_control,<name>,<value>`）
//! - `sync_control`: 出站同步消息（`<identifier>,<value>`）
//!
//! ## 消息格式
//!
//! 所有消息均为 UTF-8 文本，字段以 `,` 分隔，每条消息对应一个逻辑命令。
//! 数值字段为十进制浮点字面量。

pub mod direct_control;
pub mod sync_control;

// 重新导出常用类型
pub use direct_control::{CommandKind, ControlCommand, DIRECT_CONTROL_TAG};
pub use sync_control::{NONE_IDENTIFIER, SYNC_CONTROL_TAG, SyncControlMessage};

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Too few fields: expected at least {expected}, got {actual}")]
    TooFewFields { expected: usize, actual: usize },

    #[error("Unknown message kind: {0:?}")]
    UnknownKind(String),

    #[error("Empty control name")]
    EmptyName,

    #[error("Invalid value for field {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },
}
