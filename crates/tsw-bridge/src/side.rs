//! 驾驶室朝向与控件名解析
//!
//! 外部控制器只知道与朝向无关的控件名（如 `Brake{SIDE}`），
//! 具体控件名取决于玩家当前所坐的驾驶室一端。

use crate::config::BridgeConfig;
use serde::{Deserialize, Serialize};

/// 驾驶室朝向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainSide {
    /// 前端（默认）
    #[default]
    Front,
    /// 后端
    Back,
}

impl TrainSide {
    /// 根据座椅朝向标志推导朝向
    ///
    /// - `Some(true)`: 座椅反向，后端驾驶室
    /// - `Some(false)`: 前端驾驶室
    /// - `None`: 未挂接座椅，使用 `default`
    pub fn from_seat(reversed: Option<bool>, default: TrainSide) -> Self {
        match reversed {
            Some(true) => TrainSide::Back,
            Some(false) => TrainSide::Front,
            None => default,
        }
    }
}

/// 控件名解析器
///
/// 纯函数：把占位符替换为朝向字面量，没有占位符的名字原样返回。
///
/// # Example
///
/// ```
/// use tsw_bridge::{ControlNameResolver, TrainSide};
///
/// let resolver = ControlNameResolver::default();
/// assert_eq!(resolver.resolve("Brake{SIDE}", TrainSide::Front), "BrakeF");
/// assert_eq!(resolver.resolve("Brake{SIDE}", TrainSide::Back), "BrakeB");
/// assert_eq!(resolver.resolve("Throttle", TrainSide::Back), "Throttle");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlNameResolver {
    placeholder: String,
    front: String,
    back: String,
}

impl ControlNameResolver {
    pub fn new(
        placeholder: impl Into<String>,
        front: impl Into<String>,
        back: impl Into<String>,
    ) -> Self {
        Self {
            placeholder: placeholder.into(),
            front: front.into(),
            back: back.into(),
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(
            config.side_placeholder.as_str(),
            config.front_literal.as_str(),
            config.back_literal.as_str(),
        )
    }

    /// 占位符对应的字面量
    pub fn literal(&self, side: TrainSide) -> &str {
        match side {
            TrainSide::Front => &self.front,
            TrainSide::Back => &self.back,
        }
    }

    /// 名字是否包含占位符
    pub fn has_placeholder(&self, raw_name: &str) -> bool {
        raw_name.contains(&self.placeholder)
    }

    /// 解析具体控件名（替换所有出现的占位符）
    pub fn resolve(&self, raw_name: &str, side: TrainSide) -> String {
        if self.has_placeholder(raw_name) {
            raw_name.replace(&self.placeholder, self.literal(side))
        } else {
            raw_name.to_string()
        }
    }
}

impl Default for ControlNameResolver {
    fn default() -> Self {
        Self::from_config(&BridgeConfig::default())
    }
}
