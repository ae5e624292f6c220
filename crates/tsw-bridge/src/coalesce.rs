//! 帧内合并
//!
//! 每帧把队列中的所有命令按原始控件名合并，同名命令只保留最后入队的值。

use crate::metrics::BridgeMetrics;
use crate::queue::CommandQueue;
use std::collections::HashMap;
use std::collections::hash_map;
use std::sync::Arc;
use tsw_protocol::ControlCommand;

/// 单帧合并结果：原始控件名 → 最新值
///
/// 迭代顺序不确定；不同控件之间互相独立。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoalescedBatch {
    entries: HashMap<String, f32>,
}

impl CoalescedBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按入队顺序折叠命令（后写覆盖先写）
    ///
    /// 返回合并结果和被覆盖的命令数。
    pub fn fold(commands: impl IntoIterator<Item = ControlCommand>) -> (Self, u64) {
        let mut batch = Self::new();
        let mut superseded = 0;
        for command in commands {
            if batch.insert(command.name, command.value).is_some() {
                superseded += 1;
            }
        }
        (batch, superseded)
    }

    /// 插入一个值，返回被覆盖的旧值
    pub fn insert(&mut self, name: String, value: f32) -> Option<f32> {
        self.entries.insert(name, value)
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.entries.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl IntoIterator for CoalescedBatch {
    type Item = (String, f32);
    type IntoIter = hash_map::IntoIter<String, f32>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// 帧合并器（帧线程）
#[derive(Debug, Clone)]
pub struct FrameCoalescer {
    queue: Arc<CommandQueue>,
}

impl FrameCoalescer {
    pub fn new(queue: Arc<CommandQueue>) -> Self {
        Self { queue }
    }

    /// 取出队列并合并为一个批次；队列为空时返回空批次
    pub fn next_batch(&self) -> CoalescedBatch {
        let commands = self.queue.drain_all();
        if commands.is_empty() {
            return CoalescedBatch::new();
        }

        let (batch, superseded) = CoalescedBatch::fold(commands);
        BridgeMetrics::add(&self.queue.metrics().commands_superseded, superseded);
        batch
    }
}
