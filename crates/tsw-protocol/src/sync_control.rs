//! 同步消息（出站）
//!
//! 玩家在游戏内操作控件后，桥接层把 `<identifier>,<value>` 发回外部控制器，
//! 传输层在发送前加上 `sync_control` 标签。

use std::fmt;

/// 出站消息在传输层上的类型标签
pub const SYNC_CONTROL_TAG: &str = "sync_control";

/// 无控件时游戏返回的标识符（`FName` 的 `None`）
pub const NONE_IDENTIFIER: &str = "None";

/// 出站同步消息
///
/// `Display` 输出不带标签的 `<identifier>,<value>`；
/// [`SyncControlMessage::framed`] 输出传输层使用的完整文本。
///
/// # Example
///
/// ```
/// use tsw_protocol::SyncControlMessage;
///
/// let msg = SyncControlMessage::new("Throttle", 0.75);
/// assert_eq!(msg.to_string(), "Throttle,0.75");
/// assert_eq!(msg.framed(), "sync_control,Throttle,0.75");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncControlMessage {
    /// 游戏内控件自身的标识符
    pub identifier: String,
    /// 新值
    pub value: f32,
}

impl SyncControlMessage {
    pub fn new(identifier: impl Into<String>, value: f32) -> Self {
        Self {
            identifier: identifier.into(),
            value,
        }
    }

    /// 带 `sync_control` 标签的完整文本
    pub fn framed(&self) -> String {
        format!("{SYNC_CONTROL_TAG},{self}")
    }
}

impl fmt::Display for SyncControlMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.identifier, self.value)
    }
}
