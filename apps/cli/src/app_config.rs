//! 应用配置（`[bridge]` + `[transport]`）

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tsw_bridge::BridgeConfig;
use tsw_transport::TransportConfig;

/// 完整的应用配置，所有字段都可省略
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bridge: BridgeConfig,
    pub transport: TransportConfig,
}

impl AppConfig {
    /// 从文件加载；`path` 为 `None` 时使用默认配置
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.bridge.validate()?;
        self.transport.validate()?;
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("序列化配置失败")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_round_trips_through_toml() {
        let text = AppConfig::default().to_toml_string().unwrap();
        assert!(text.contains("[bridge]"));
        assert!(text.contains("[transport]"));
        assert_eq!(AppConfig::from_toml_str(&text).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[bridge]\npush_threshold = 0.75\n\n[transport]\nreconnect_interval_ms = 1000"
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.bridge.push_threshold, 0.75);
        assert_eq!(config.bridge.side_placeholder, "{SIDE}");
        assert_eq!(config.transport.reconnect_interval_ms, 1000);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(AppConfig::from_toml_str("[transport]\noutbound_capacity = 0").is_err());
        assert!(AppConfig::from_toml_str("[bridge]\ntick_event_name = \"\"").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
        assert_eq!(AppConfig::load(None).unwrap(), AppConfig::default());
    }
}
