//! # Frame 模块
//!
//! 引擎每帧输出给表现层的完整描述。表现层只按名称解析素材并绘制/播放，
//! 不再回头查询场景数据。

use serde::{Deserialize, Serialize};

use crate::state::PlaybackState;
use crate::text::Focus;

/// 主菜单背景音乐名
pub const MENU_MUSIC_NAME: &str = "menu_background";

/// 一个 NPC 立绘
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteView {
    /// 槽位（0-based）
    pub slot: usize,
    /// 按绘制顺序的纹理名
    pub parts: Vec<String>,
    /// 是否为焦点
    pub focused: bool,
}

/// 一个可点击的按钮
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonView {
    /// 按钮索引（0-based）
    pub index: usize,
    /// 按钮文字
    pub label: String,
}

/// 一次性音效
///
/// `scene_serial` 区分相邻场景中的同名音效：序号变化即重新播放。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundCue {
    pub name: String,
    pub scene_serial: u64,
}

/// 单帧输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// 当前状态
    pub state: PlaybackState,
    /// 场景序号，每次进入新场景时递增
    pub scene_serial: u64,
    /// 背景
    pub background: Option<String>,
    /// 背景叠加层
    pub background_overlay: Option<String>,
    /// 全屏叠加层
    pub overlay: Option<String>,
    /// NPC 立绘
    pub sprites: Vec<SpriteView>,
    /// 焦点
    pub focus: Focus,
    /// 名字横幅（空字符串表示不显示）
    pub banner: String,
    /// 当前可见的台词
    pub text: String,
    /// 选项按钮
    pub buttons: Vec<ButtonView>,
    /// 选项菜单是否打开
    pub choice_menu_open: bool,
    /// 暂停菜单是否打开
    pub paused: bool,
    /// 背景音乐（None 表示停止）
    pub music: Option<String>,
    /// 一次性音效
    pub sound: Option<SoundCue>,
    /// 需要展示给玩家的提示
    pub status: Option<String>,
    /// 是否处于编辑器模式
    pub editor: bool,
}

impl Frame {
    /// 游戏外（菜单界面）的帧
    pub fn menu(state: PlaybackState, status: Option<String>, editor: bool) -> Self {
        Self {
            state,
            scene_serial: 0,
            background: None,
            background_overlay: None,
            overlay: None,
            sprites: Vec::new(),
            focus: Focus::Nobody,
            banner: String::new(),
            text: String::new(),
            buttons: Vec::new(),
            choice_menu_open: false,
            paused: false,
            music: Some(MENU_MUSIC_NAME.to_string()),
            sound: None,
            status,
            editor,
        }
    }

    /// 背景音乐是否应处于暂停
    pub fn music_paused(&self) -> bool {
        self.paused
    }
}
