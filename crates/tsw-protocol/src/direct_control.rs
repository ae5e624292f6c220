//! 直接控制指令（入站）
//!
//! 外部控制器通过传输层发送 `direct_control,<name>,<value>` 文本，
//! 要求游戏将某个控件设置为指定值。

use crate::ProtocolError;
use std::fmt;
use std::str::FromStr;

/// 直接控制指令的类型标签（第一个字段）
pub const DIRECT_CONTROL_TAG: &str = "direct_control";

/// 字段分隔符
pub const FIELD_SEPARATOR: char = ',';

/// 直接控制指令至少包含的字段数：标签、控件名、数值
const MIN_FIELDS: usize = 3;

/// 入站指令类型
///
/// 目前只有一种；其它标签的消息由传输层的其它消费者处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandKind {
    /// 设置控件值
    DirectControl,
}

impl CommandKind {
    /// 线协议中的标签字面量
    pub fn tag(self) -> &'static str {
        match self {
            CommandKind::DirectControl => DIRECT_CONTROL_TAG,
        }
    }
}

/// 一条已解析的控制指令
///
/// `name` 是原始控件名，可能包含朝向占位符（如 `Brake{SIDE}`），
/// 在应用阶段才会被解析为具体控件名。
///
/// # Example
///
/// ```
/// use tsw_protocol::ControlCommand;
///
/// let cmd: ControlCommand = "direct_control,Brake{SIDE},0.8".parse().unwrap();
/// assert_eq!(cmd.name, "Brake{SIDE}");
/// assert_eq!(cmd.value, 0.8);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlCommand {
    pub kind: CommandKind,
    pub name: String,
    pub value: f32,
}

impl ControlCommand {
    /// 创建直接控制指令
    pub fn direct(name: impl Into<String>, value: f32) -> Self {
        Self {
            kind: CommandKind::DirectControl,
            name: name.into(),
            value,
        }
    }

    /// 解析入站文本
    ///
    /// 规则：
    /// - 第一个字段必须是 `direct_control`
    /// - 至少 3 个字段；多余的尾部字段被忽略
    /// - 控件名原样保留，不能为空
    /// - 数值去除首尾空白后按 `f32` 解析，必须是有限值
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let mut fields = text.split(FIELD_SEPARATOR);

        // split 至少产生一个字段
        let tag = fields.next().unwrap_or_default();
        if tag != DIRECT_CONTROL_TAG {
            return Err(ProtocolError::UnknownKind(tag.to_string()));
        }

        let (name, raw_value) = match (fields.next(), fields.next()) {
            (Some(name), Some(value)) => (name, value),
            (name, _) => {
                return Err(ProtocolError::TooFewFields {
                    expected: MIN_FIELDS,
                    actual: 1 + usize::from(name.is_some()),
                });
            },
        };

        if name.is_empty() {
            return Err(ProtocolError::EmptyName);
        }

        let value = raw_value
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ProtocolError::InvalidValue {
                field: "value",
                value: raw_value.to_string(),
            })?;

        Ok(Self::direct(name, value))
    }
}

impl FromStr for ControlCommand {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.kind.tag(), self.name, self.value)
    }
}
