//! `--cab` 参数解析
//!
//! 格式：逗号分隔的 `name[:momentary|:continuous]`，例如
//! `ThrottleAndBrake,BrakeF,BrakeB,HornF:momentary`。

use anyhow::{Result, bail};
use tsw_bridge::host::ControlCapability;
use tsw_bridge::mock::SimulatedCab;

/// 默认的模拟驾驶室控件
pub const DEFAULT_CAB: &str =
    "Throttle,Reverser,TrainBrakeF,TrainBrakeB,HornF:momentary,HornB:momentary";

/// 一个模拟控件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CabControl {
    pub name: String,
    pub capability: ControlCapability,
}

pub fn parse_cab(list: &str) -> Result<Vec<CabControl>> {
    let mut controls = Vec::new();
    for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (name, kind) = match item.split_once(':') {
            Some((name, kind)) => (name.trim(), kind.trim()),
            None => (item, "continuous"),
        };
        if name.is_empty() {
            bail!("控件名为空: {:?}", item);
        }
        let capability = match kind.to_ascii_lowercase().as_str() {
            "continuous" | "c" => ControlCapability::Continuous,
            "momentary" | "m" => ControlCapability::Momentary,
            other => bail!("未知控件类型 {:?}（可选 continuous / momentary）", other),
        };
        if controls.iter().any(|c: &CabControl| c.name == name) {
            bail!("控件重复: {}", name);
        }
        controls.push(CabControl {
            name: name.to_string(),
            capability,
        });
    }
    if controls.is_empty() {
        bail!("模拟驾驶室至少需要一个控件");
    }
    Ok(controls)
}

pub fn build_cab(controls: &[CabControl]) -> SimulatedCab {
    controls
        .iter()
        .fold(SimulatedCab::new(), |cab, control| {
            cab.with_component(&control.name, control.capability)
        })
}
