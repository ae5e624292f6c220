//! 桥接层错误类型定义
//!
//! 热路径（入站解析、帧内应用、回显过滤）不向调用方返回错误，
//! 这里的错误只出现在初始化阶段（配置、钩子注册）和出站投递。

use crate::hooks::HostHook;
use thiserror::Error;

/// 桥接层错误类型
#[derive(Error, Debug)]
pub enum BridgeError {
    /// 宿主不提供某个钩子（游戏版本不支持）
    #[error("Host hook unavailable: {hook:?} ({reason})")]
    HookUnavailable { hook: HostHook, reason: String },

    /// 配置无效
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// 配置文件读取失败
    #[error("Config IO error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// 配置文件解析失败
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// 未设置出站通道
    #[error("Outbound sink not configured")]
    MissingSink,
}

/// 出站投递错误
///
/// 出站是 fire-and-forget：调用方只计数并丢弃，不重试。
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundError {
    /// 出站通道已满
    #[error("Outbound channel full")]
    Full,

    /// 出站通道已关闭（传输层退出）
    #[error("Outbound channel closed")]
    Disconnected,
}
