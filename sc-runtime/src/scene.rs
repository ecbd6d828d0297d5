//! # Scene 模块
//!
//! 场景数据模型：一个场景就是一屏对话/选项内容。
//!
//! ## 设计原则
//!
//! - 所有素材/名称字段都是 `Option<String>`，`None` 表示“无”
//! - `NONE` 哨兵只存在于文本格式边界（见 [`crate::script`]），模型内部不做字符串比较
//! - `talking`、按钮是否存在等状态均为**派生值**，不缓存

use serde::{Deserialize, Serialize};

/// 每个场景的 NPC 槽位数量
pub const SPEAKER_COUNT: usize = 4;

/// 每个场景的选项按钮数量
pub const BUTTON_COUNT: usize = 4;

/// NPC 说话者槽位
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerSlot {
    /// 显示名称
    pub name: Option<String>,
    /// 立绘（简单布局）
    pub texture: Option<String>,
    /// 本场景台词（None 表示沉默）
    pub line: Option<String>,
    /// 分层立绘：左半身（高级布局）
    pub texture_left: Option<String>,
    /// 分层立绘：右半身（高级布局）
    pub texture_right: Option<String>,
    /// 分层立绘：头部（高级布局）
    pub texture_head: Option<String>,
}

impl SpeakerSlot {
    /// 是否在说话（当且仅当台词存在）
    pub fn talking(&self) -> bool {
        self.line.is_some()
    }

    /// 设置台词，空白文本视为沉默
    pub fn set_line(&mut self, text: &str) {
        self.line = non_blank(text);
    }

    /// 是否使用分层立绘
    pub fn has_layered_portrait(&self) -> bool {
        self.texture_left.is_some()
    }

    /// 指定部件的纹理字段
    pub fn texture_mut(&mut self, part: SpritePart) -> &mut Option<String> {
        match part {
            SpritePart::Body => &mut self.texture,
            SpritePart::Left => &mut self.texture_left,
            SpritePart::Right => &mut self.texture_right,
            SpritePart::Head => &mut self.texture_head,
        }
    }

    /// 按绘制顺序返回立绘纹理名
    ///
    /// 高级布局下若有左半身纹理，则依次绘制 左/右/头；否则只绘制单张立绘。
    /// 返回空列表表示该槽位不绘制。
    pub fn sprite_parts(&self, advanced: bool) -> Vec<&str> {
        if advanced && self.has_layered_portrait() {
            [&self.texture_left, &self.texture_right, &self.texture_head]
                .into_iter()
                .filter_map(|t| t.as_deref())
                .collect()
        } else {
            self.texture.as_deref().into_iter().collect()
        }
    }
}

/// 立绘部件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpritePart {
    /// 单张立绘
    #[default]
    Body,
    /// 左半身（高级布局）
    Left,
    /// 右半身（高级布局）
    Right,
    /// 头部（高级布局）
    Head,
}

impl SpritePart {
    /// 是否只在高级布局下存在
    pub fn is_layered(self) -> bool {
        !matches!(self, Self::Body)
    }
}

/// 主角槽位
///
/// 主角没有立绘，名字始终是运行时输入的玩家名。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainCharacterSlot {
    /// 本场景台词
    pub line: Option<String>,
}

impl MainCharacterSlot {
    /// 是否在说话
    pub fn talking(&self) -> bool {
        self.line.is_some()
    }

    /// 设置台词，空白文本视为沉默
    pub fn set_line(&mut self, text: &str) {
        self.line = non_blank(text);
    }
}

/// 选项按钮
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceButton {
    /// 按钮文字
    pub label: Option<String>,
    /// 目标剧本文件名（如 `chapter2.sc`）
    pub target: Option<String>,
}

impl ChoiceButton {
    /// 创建按钮
    pub fn new(label: impl Into<String>, target: Option<&str>) -> Self {
        Self {
            label: Some(label.into()),
            target: target.map(str::to_string),
        }
    }

    /// 按钮是否显示
    pub fn is_present(&self) -> bool {
        self.label.is_some()
    }

    /// 点击后是否切换剧本
    pub fn has_scenario_action(&self) -> bool {
        self.target.is_some()
    }
}

/// 场景
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// 背景
    pub background: Option<String>,
    /// 背景叠加层（高级布局）
    pub background_overlay: Option<String>,
    /// 背景音乐
    pub music: Option<String>,
    /// 一次性音效
    pub sound: Option<String>,
    /// NPC 槽位
    pub speakers: [SpeakerSlot; SPEAKER_COUNT],
    /// 主角槽位
    pub main_character: MainCharacterSlot,
    /// 选项按钮
    pub buttons: [ChoiceButton; BUTTON_COUNT],
    /// 全屏叠加层（高级布局）
    pub overlay: Option<String>,
}

impl Scene {
    /// 创建空白场景（所有字段为空）
    pub fn blank() -> Self {
        Self::default()
    }

    /// 当前场景是否弹出选项菜单
    pub fn has_choices(&self) -> bool {
        self.buttons.iter().any(ChoiceButton::is_present)
    }

    /// 是否有任何角色在说话
    pub fn anyone_talking(&self) -> bool {
        self.main_character.talking() || self.speakers.iter().any(SpeakerSlot::talking)
    }
}

fn non_blank(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_truth_table() {
        let absent = ChoiceButton::default();
        assert!(!absent.is_present());
        assert!(!absent.has_scenario_action());

        let dismiss = ChoiceButton::new("Continue", None);
        assert!(dismiss.is_present());
        assert!(!dismiss.has_scenario_action());

        let jump = ChoiceButton::new("Go", Some("chapter2.sc"));
        assert!(jump.is_present());
        assert!(jump.has_scenario_action());

        // 没有文字但带目标：不显示，但目标仍在
        let hidden = ChoiceButton {
            label: None,
            target: Some("chapter2.sc".to_string()),
        };
        assert!(!hidden.is_present());
        assert!(hidden.has_scenario_action());
    }

    #[test]
    fn test_talking_follows_line() {
        let mut slot = SpeakerSlot::default();
        assert!(!slot.talking());

        slot.set_line("Hello");
        assert!(slot.talking());

        // 编辑器中清空输入等同于沉默
        slot.set_line("   ");
        assert!(!slot.talking());
        assert_eq!(slot.line, None);
    }

    #[test]
    fn test_sprite_parts_by_layout() {
        let slot = SpeakerSlot {
            texture: Some("body".to_string()),
            texture_left: Some("left".to_string()),
            texture_head: Some("head".to_string()),
            ..Default::default()
        };

        assert_eq!(slot.sprite_parts(false), vec!["body"]);
        assert_eq!(slot.sprite_parts(true), vec!["left", "head"]);

        let plain = SpeakerSlot {
            texture: Some("body".to_string()),
            ..Default::default()
        };
        assert_eq!(plain.sprite_parts(true), vec!["body"]);
        assert!(SpeakerSlot::default().sprite_parts(true).is_empty());
    }

    #[test]
    fn test_has_choices() {
        let mut scene = Scene::blank();
        assert!(!scene.has_choices());

        scene.buttons[3] = ChoiceButton::new("Last", None);
        assert!(scene.has_choices());
    }
}
