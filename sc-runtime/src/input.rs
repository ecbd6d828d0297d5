//! # Input 模块
//!
//! 定义 Host 向引擎传递的输入事件。
//!
//! ## 设计说明
//!
//! - `RuntimeInput` 是 Host 采集用户操作后传递给引擎的语义化输入
//! - 引擎不处理键盘/鼠标事件本身：空格键和鼠标左键都映射为 `Advance`
//! - 时间流逝通过 `Engine::tick(dt)` 传入，不是输入事件

use serde::{Deserialize, Serialize};

use crate::save::SaveRecord;
use crate::scene::SpritePart;

/// Host 向引擎传递的输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RuntimeInput {
    /// 主菜单 → 选择剧本
    OpenScenarioSelect,

    /// 主菜单 → 选择存档
    OpenSaveSelect,

    /// 选择界面 → 主菜单
    Back,

    /// 开始新游戏
    ///
    /// 故事模式下 `scenario` 可以为 `None`，此时使用共享剧本。
    StartNewGame {
        scenario: Option<String>,
        player_name: String,
    },

    /// 读取存档
    LoadSave { record: SaveRecord },

    /// 推进到下一个场景（空格键 / 鼠标点击）
    Advance,

    /// 点击选项按钮（0-based）
    ActivateButton { index: usize },

    /// 切换暂停菜单（取消键）
    TogglePause,

    /// 回到主菜单
    ExitToMainMenu,

    /// 剧本编辑器操作
    Editor(EditorInput),
}

/// 剧本编辑器操作
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditorInput {
    /// 跳转到指定场景
    SelectScene { index: usize },
    /// 在末尾追加空白场景
    AppendBlankScene,
    /// 在末尾追加当前场景的副本
    DuplicateScene,
    /// 删除当前场景
    RemoveScene,
    /// 修改 NPC 台词（空白文本表示沉默）
    SetSpeakerLine { slot: usize, text: String },
    /// 修改 NPC 名字
    SetSpeakerName { slot: usize, name: String },
    /// 修改主角台词（空白文本表示沉默）
    SetMainLine { text: String },
    /// 修改按钮（空白文本表示无）
    SetButton {
        index: usize,
        label: String,
        target: String,
    },
    /// 修改背景（以下素材字段空白均表示无）
    SetBackground { name: String },
    /// 修改背景叠加层（高级布局）
    SetBackgroundOverlay { name: String },
    /// 修改全屏叠加层（高级布局）
    SetOverlay { name: String },
    /// 修改背景音乐
    SetMusic { name: String },
    /// 修改一次性音效
    SetSound { name: String },
    /// 修改 NPC 立绘
    SetSpeakerTexture {
        slot: usize,
        part: SpritePart,
        name: String,
    },
}

impl RuntimeInput {
    /// 创建开始游戏输入
    pub fn start(scenario: impl Into<String>, player_name: impl Into<String>) -> Self {
        Self::StartNewGame {
            scenario: Some(scenario.into()),
            player_name: player_name.into(),
        }
    }

    /// 创建按钮点击输入
    pub fn button(index: usize) -> Self {
        Self::ActivateButton { index }
    }

    /// 创建读档输入
    pub fn load(record: SaveRecord) -> Self {
        Self::LoadSave { record }
    }
}
