//! # State 模块
//!
//! 播放状态机的状态定义。
//!
//! ## 设计原则
//!
//! - 所有状态必须**显式建模**
//! - 选项菜单是否打开由场景内容派生，不作为独立状态存储
//! - 不允许隐式全局状态
//!
//! ## 状态转换
//!
//! ```text
//! MainMenu ──► ScenarioSelect ──(剧本 + 玩家名)──► Playing(s, 0)
//!    │  ◄──────── Back ────────┘                     │  ▲
//!    ├──► SaveSelect ──(存档有效)──► Playing(s, i) ──┘  │ 推进 / 按钮切换剧本
//!    ◄───────────────── ExitToMainMenu ─────────────────┘
//! ```

use serde::{Deserialize, Serialize};

/// 播放状态
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// 主菜单
    #[default]
    MainMenu,
    /// 选择剧本
    ScenarioSelect,
    /// 选择存档
    SaveSelect,
    /// 游戏中
    Playing {
        /// 剧本文件名
        scenario: String,
        /// 场景索引（0-based）
        scene_index: usize,
    },
}

impl PlaybackState {
    /// 是否在游戏中
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing { .. })
    }

    /// 状态名（用于错误信息和日志）
    pub fn name(&self) -> &'static str {
        match self {
            Self::MainMenu => "MainMenu",
            Self::ScenarioSelect => "ScenarioSelect",
            Self::SaveSelect => "SaveSelect",
            Self::Playing { .. } => "Playing",
        }
    }
}

/// 播放位置（存档内容）
///
/// 只有当 `scenario_name` 指向现存剧本时才有效。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackPosition {
    /// 剧本文件名
    pub scenario_name: String,
    /// 玩家名
    pub player_name: String,
    /// 场景索引（0-based）
    pub scene_index: usize,
}

impl PlaybackPosition {
    /// 创建播放位置
    pub fn new(
        scenario_name: impl Into<String>,
        player_name: impl Into<String>,
        scene_index: usize,
    ) -> Self {
        Self {
            scenario_name: scenario_name.into(),
            player_name: player_name.into(),
            scene_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_names() {
        assert_eq!(PlaybackState::default(), PlaybackState::MainMenu);
        assert!(!PlaybackState::SaveSelect.is_playing());

        let playing = PlaybackState::Playing {
            scenario: "main.sc".to_string(),
            scene_index: 2,
        };
        assert!(playing.is_playing());
        assert_eq!(playing.name(), "Playing");
    }
}
