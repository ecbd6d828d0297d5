//! # Parser 模块
//!
//! 容错的剧本解析器，单次前向遍历。
//!
//! ## 规则
//!
//! 只解释位于 `[scene_start]` 与 `[scene_end]` 之间的行，块外内容忽略。
//! 块内按行位置（从 0 开始）映射到固定字段组：
//!
//! | 位置 | 字段数要求 |
//! |---|---|
//! | 0 | 简单布局 3；高级布局 4（3 个字段时按简单布局读取） |
//! | 1-4 | ≥3；高级布局且 >5 时额外读取 左/右/头 |
//! | 5 | 恰好 1 |
//! | 6-9 | 恰好 2 |
//! | 10 | 恰好 1，仅高级布局 |
//!
//! 字段数不匹配的行被跳过，但位置计数照常前进；被跳过的字段保持 `None`。
//! 遇到 `[scene_end]` 时提交场景并重置位置计数。文件末尾未闭合的块被丢弃。
//!
//! 解析器在文件之间不保留状态。

mod helpers;


use crate::scene::{ChoiceButton, Scene};
use crate::script::{SCENE_END_MARKER, SCENE_START_MARKER, SceneLayout};

pub use helpers::{field_token, field_value, split_fields};

/// 主角台词所在的行位置
const MAIN_CHARACTER_STAGE: usize = 5;
/// 第一个按钮所在的行位置
const FIRST_BUTTON_STAGE: usize = 6;
/// 全屏叠加层所在的行位置
const OVERLAY_STAGE: usize = 10;

/// 被跳过的行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 行号（1-based）
    pub line_number: usize,
    /// 块内位置
    pub stage: usize,
    /// 实际字段数
    pub field_count: usize,
}

/// 解析报告
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    /// 完整闭合的场景
    pub scenes: Vec<Scene>,
    /// 因字段数不匹配被跳过的行
    pub skipped_lines: Vec<SkippedLine>,
    /// 文件末尾未闭合的块数
    pub unterminated_blocks: usize,
}

/// 剧本解析器
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    layout: SceneLayout,
}

impl Parser {
    /// 创建解析器
    pub fn new(layout: SceneLayout) -> Self {
        Self { layout }
    }

    /// 当前布局
    pub fn layout(&self) -> SceneLayout {
        self.layout
    }

    /// 解析剧本文本，返回场景列表
    pub fn parse(&self, text: &str) -> Vec<Scene> {
        self.parse_with_report(text).scenes
    }

    /// 解析剧本文本，同时返回被容错跳过的行
    pub fn parse_with_report(&self, text: &str) -> ParseReport {
        let mut report = ParseReport::default();
        let mut current: Option<(Scene, usize)> = None;

        for (idx, line) in text.lines().enumerate() {
            if line == SCENE_START_MARKER {
                // 块内重复的起始标记不重置进度
                if current.is_none() {
                    current = Some((Scene::blank(), 0));
                }
                continue;
            }

            if line == SCENE_END_MARKER {
                if let Some((scene, _)) = current.take() {
                    report.scenes.push(scene);
                }
                continue;
            }

            let Some((scene, stage)) = current.as_mut() else {
                continue;
            };

            let fields = split_fields(line);
            if !self.apply_line(scene, *stage, &fields) {
                report.skipped_lines.push(SkippedLine {
                    line_number: idx + 1,
                    stage: *stage,
                    field_count: fields.len(),
                });
            }
            *stage += 1;
        }

        if current.is_some() {
            report.unterminated_blocks += 1;
        }

        report
    }

    /// 将一行写入场景，返回该行是否被接受
    fn apply_line(&self, scene: &mut Scene, stage: usize, fields: &[&str]) -> bool {
        let advanced = self.layout.is_advanced();

        match stage {
            0 => match fields {
                [bg, overlay, music, sound] if advanced => {
                    scene.background = field_value(bg);
                    scene.background_overlay = field_value(overlay);
                    scene.music = field_value(music);
                    scene.sound = field_value(sound);
                    true
                }
                [bg, music, sound] => {
                    scene.background = field_value(bg);
                    scene.music = field_value(music);
                    scene.sound = field_value(sound);
                    true
                }
                _ => false,
            },
            1..=4 if fields.len() >= 3 => {
                let slot = &mut scene.speakers[stage - 1];
                slot.name = field_value(fields[0]);
                slot.texture = field_value(fields[1]);
                slot.line = field_value(fields[2]);

                if advanced && fields.len() > 5 {
                    slot.texture_left = field_value(fields[3]);
                    slot.texture_right = field_value(fields[4]);
                    slot.texture_head = field_value(fields[5]);
                }
                true
            }
            MAIN_CHARACTER_STAGE => match fields {
                [line] => {
                    scene.main_character.line = field_value(line);
                    true
                }
                _ => false,
            },
            6..=9 => match fields {
                [label, target] => {
                    scene.buttons[stage - FIRST_BUTTON_STAGE] = ChoiceButton {
                        label: field_value(label),
                        target: field_value(target),
                    };
                    true
                }
                _ => false,
            },
            OVERLAY_STAGE if advanced => match fields {
                [overlay] => {
                    scene.overlay = field_value(overlay);
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }
}
