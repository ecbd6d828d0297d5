//! # History 模块
//!
//! 对话历史记录，用于历史回看。
//!
//! ## 设计原则
//!
//! - 每个场景最多记录一次对话
//! - 通过按钮切换剧本时保留历史，回到主菜单时清空
//! - 所有数据可序列化

use serde::{Deserialize, Serialize};

/// 历史事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HistoryEvent {
    /// 对话事件
    Dialogue {
        /// 名字横幅
        speaker: String,
        /// 对话内容（已替换玩家名）
        content: String,
        /// 时间戳（Unix 秒）
        timestamp: u64,
    },

    /// 剧本切换
    ScenarioSwitch {
        /// 目标剧本文件名
        scenario: String,
        /// 时间戳
        timestamp: u64,
    },
}

impl HistoryEvent {
    /// 获取事件时间戳
    pub fn timestamp(&self) -> u64 {
        match self {
            HistoryEvent::Dialogue { timestamp, .. } => *timestamp,
            HistoryEvent::ScenarioSwitch { timestamp, .. } => *timestamp,
        }
    }

    /// 创建对话事件
    pub fn dialogue(speaker: impl Into<String>, content: impl Into<String>) -> Self {
        HistoryEvent::Dialogue {
            speaker: speaker.into(),
            content: content.into(),
            timestamp: current_timestamp(),
        }
    }

    /// 创建剧本切换事件
    pub fn scenario_switch(scenario: impl Into<String>) -> Self {
        HistoryEvent::ScenarioSwitch {
            scenario: scenario.into(),
            timestamp: current_timestamp(),
        }
    }

    /// 历史回看中显示的文本（`名字: 台词`）
    pub fn display_line(&self) -> Option<String> {
        match self {
            HistoryEvent::Dialogue {
                speaker, content, ..
            } => Some(format!("{speaker}: {content}")),
            HistoryEvent::ScenarioSwitch { .. } => None,
        }
    }
}

/// 历史记录容器
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    /// 事件列表（按时间顺序）
    events: Vec<HistoryEvent>,
    /// 最大记录数
    max_events: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// 创建新的历史记录
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            max_events: 1000,
        }
    }

    /// 设置最大记录数
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// 添加事件
    pub fn push(&mut self, event: HistoryEvent) {
        self.events.push(event);

        // 超过上限时移除最早的事件
        if self.events.len() > self.max_events {
            let overflow = self.events.len() - self.max_events;
            self.events.drain(..overflow);
        }
    }

    /// 获取所有事件
    pub fn events(&self) -> &[HistoryEvent] {
        &self.events
    }

    /// 获取对话事件数量
    pub fn dialogue_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, HistoryEvent::Dialogue { .. }))
            .count()
    }

    /// 历史回看文本（按时间顺序）
    pub fn dialogue_lines(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(HistoryEvent::display_line)
            .collect()
    }

    /// 清空历史
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// 获取事件总数
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// 获取当前时间戳（Unix 秒）
fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
