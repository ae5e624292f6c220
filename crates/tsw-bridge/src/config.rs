//! 桥接层配置
//!
//! `BridgeConfig` 是纯数据（POD），可以从 TOML 加载；所有字段都有默认值。

use crate::error::BridgeError;
use crate::side::TrainSide;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 桥接层配置
///
/// # Example
///
/// ```
/// use tsw_bridge::BridgeConfig;
///
/// // 使用默认配置（占位符 `{SIDE}`，前端 `F`，后端 `B`）
/// let config = BridgeConfig::default();
/// assert_eq!(config.side_placeholder, "{SIDE}");
///
/// // 从 TOML 覆盖部分字段
/// let config = BridgeConfig::from_toml_str("max_queue_depth = 256").unwrap();
/// assert_eq!(config.max_queue_depth, Some(256));
/// assert_eq!(config.push_threshold, 0.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// 控件名中的朝向占位符
    pub side_placeholder: String,
    /// 前端驾驶室替换字面量
    pub front_literal: String,
    /// 后端驾驶室替换字面量
    pub back_literal: String,
    /// 未挂接座椅时使用的朝向
    pub default_side: TrainSide,
    /// 瞬时控件的按下阈值（严格大于才算按下）
    pub push_threshold: f32,
    /// 触发每帧处理的预帧事件名
    pub tick_event_name: String,
    /// 命令队列深度上限
    ///
    /// `None` 表示无上限；设置后队列满时丢弃最旧的命令。
    pub max_queue_depth: Option<usize>,
    /// 在桥接层自身写入期间，抑制同一控件的值变更通知
    pub suppress_in_apply_echo: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            side_placeholder: "{SIDE}".to_string(),
            front_literal: "F".to_string(),
            back_literal: "B".to_string(),
            default_side: TrainSide::Front,
            push_threshold: 0.5,
            tick_event_name: "ReceiveTick".to_string(),
            max_queue_depth: None,
            suppress_in_apply_echo: true,
        }
    }
}

impl BridgeConfig {
    /// 从 TOML 文本解析并校验
    pub fn from_toml_str(content: &str) -> Result<Self, BridgeError> {
        let config: BridgeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, BridgeError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.side_placeholder.is_empty() {
            return Err(BridgeError::InvalidConfig(
                "side_placeholder must not be empty".to_string(),
            ));
        }
        if self.front_literal.contains(&self.side_placeholder)
            || self.back_literal.contains(&self.side_placeholder)
        {
            return Err(BridgeError::InvalidConfig(
                "side literals must not contain the placeholder".to_string(),
            ));
        }
        if !self.push_threshold.is_finite() {
            return Err(BridgeError::InvalidConfig(
                "push_threshold must be finite".to_string(),
            ));
        }
        if self.tick_event_name.is_empty() {
            return Err(BridgeError::InvalidConfig(
                "tick_event_name must not be empty".to_string(),
            ));
        }
        if self.max_queue_depth == Some(0) {
            return Err(BridgeError::InvalidConfig(
                "max_queue_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = BridgeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.front_literal, "F");
        assert_eq!(config.back_literal, "B");
        assert_eq!(config.default_side, TrainSide::Front);
        assert_eq!(config.max_queue_depth, None);
        assert!(config.suppress_in_apply_echo);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BridgeConfig::from_toml_str(
            r#"
            default_side = "back"
            push_threshold = 0.25
            "#,
        )
        .unwrap();
        assert_eq!(config.default_side, TrainSide::Back);
        assert_eq!(config.push_threshold, 0.25);
        assert_eq!(config.tick_event_name, "ReceiveTick");
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(BridgeConfig::from_toml_str(r#"side_placeholder = """#).is_err());
        assert!(BridgeConfig::from_toml_str("max_queue_depth = 0").is_err());
        assert!(BridgeConfig::from_toml_str(r#"tick_event_name = """#).is_err());
        assert!(BridgeConfig::from_toml_str(r#"front_literal = "{SIDE}""#).is_err());
        assert!(matches!(
            BridgeConfig::from_toml_str("push_threshold = \"high\""),
            Err(BridgeError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_non_finite_threshold_rejected() {
        let config = BridgeConfig {
            push_threshold: f32::NAN,
            ..BridgeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BridgeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "back_literal = \"R\"").unwrap();
        let config = BridgeConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.back_literal, "R");

        assert!(matches!(
            BridgeConfig::load_from_file("/nonexistent/tsw-bridge.toml"),
            Err(BridgeError::ConfigIo(_))
        ));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = BridgeConfig {
            max_queue_depth: Some(64),
            ..BridgeConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(BridgeConfig::from_toml_str(&text).unwrap(), config);
    }
}
