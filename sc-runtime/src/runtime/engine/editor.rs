//! 剧本编辑器操作
//!
//! 编辑器直接修改已加载剧本的场景列表，保存由 Host 通过 writer 完成。
//!
//! 写入场景的文本必须能被解析器原样读回：不能含有字段分隔符、换行、
//! `NONE` 哨兵或场景块标记。素材名只能从已加载的纹理和音乐注册表中选择。

use super::Engine;
use crate::error::{RuntimeError, ScError, ScResult};
use crate::input::EditorInput;
use crate::scene::{BUTTON_COUNT, ChoiceButton, SPEAKER_COUNT, Scene};
use crate::script::{FIELD_SEPARATOR, NONE_TOKEN, SCENE_END_MARKER, SCENE_START_MARKER};
use crate::store::ScenarioSource;

/// 场景中的素材字段
#[derive(Clone, Copy)]
enum AssetField {
    Background,
    BackgroundOverlay,
    Overlay,
    Music,
    Sound,
}

impl AssetField {
    fn is_advanced_only(self) -> bool {
        matches!(self, Self::BackgroundOverlay | Self::Overlay)
    }

    fn is_audio(self) -> bool {
        matches!(self, Self::Music | Self::Sound)
    }

    fn slot(self, scene: &mut Scene) -> &mut Option<String> {
        match self {
            Self::Background => &mut scene.background,
            Self::BackgroundOverlay => &mut scene.background_overlay,
            Self::Overlay => &mut scene.overlay,
            Self::Music => &mut scene.music,
            Self::Sound => &mut scene.sound,
        }
    }
}

impl<S: ScenarioSource> Engine<S> {
    /// 当前剧本的全部场景（编辑器保存时使用）
    pub fn editing_scenes(&self) -> Option<&[Scene]> {
        self.active_scenario().map(|s| s.scenes())
    }

    pub(super) fn apply_editor(&mut self, op: EditorInput) -> ScResult<()> {
        if !self.config.editor_mode {
            return Err(rejected("编辑器未启用"));
        }
        self.expect_playing()?;

        let index = self.scene_index().unwrap_or_default();
        let len = self.active_scenario().map_or(0, |s| s.scenes().len());

        match op {
            EditorInput::SelectScene { index: target } => {
                if target >= len {
                    return Err(RuntimeError::InvalidSceneIndex { index: target, len }.into());
                }
                self.move_to_scene(target);
            }
            EditorInput::AppendBlankScene => {
                self.scenes_mut()?.push(Scene::blank());
            }
            EditorInput::DuplicateScene => {
                let scenes = self.scenes_mut()?;
                let copy = scenes.get(index).cloned().unwrap_or_else(Scene::blank);
                scenes.push(copy);
            }
            EditorInput::RemoveScene => {
                // 不允许删除最后一个场景，也不允许删空
                if len <= 1 || index + 1 >= len {
                    return Err(rejected("不能删除最后一个场景"));
                }
                self.scenes_mut()?.remove(index);
                self.move_to_scene(index);
            }
            EditorInput::SetSpeakerLine { slot, text } => {
                check_text(&text)?;
                self.scene_mut(index)?
                    .speakers
                    .get_mut(slot)
                    .ok_or_else(|| bad_slot(slot))?
                    .set_line(&text);
            }
            EditorInput::SetSpeakerName { slot, name } => {
                check_text(&name)?;
                let speaker = self
                    .scene_mut(index)?
                    .speakers
                    .get_mut(slot)
                    .ok_or_else(|| bad_slot(slot))?;
                speaker.name = non_blank(&name);
            }
            EditorInput::SetMainLine { text } => {
                check_text(&text)?;
                self.scene_mut(index)?.main_character.set_line(&text);
            }
            EditorInput::SetButton {
                index: button,
                label,
                target,
            } => {
                check_text(&label)?;
                check_text(&target)?;
                let target = non_blank(&target);
                if let Some(target) = &target
                    && self.store.find_index(target).is_none()
                {
                    return Err(rejected(&format!("目标剧本不存在: {target}")));
                }
                let slot = self
                    .scene_mut(index)?
                    .buttons
                    .get_mut(button)
                    .ok_or_else(|| {
                        rejected(&format!("按钮 {button} 超出范围（共 {BUTTON_COUNT} 个）"))
                    })?;
                *slot = ChoiceButton {
                    label: non_blank(&label),
                    target,
                };
            }
            EditorInput::SetBackground { name } => {
                self.set_asset(index, AssetField::Background, &name)?;
            }
            EditorInput::SetBackgroundOverlay { name } => {
                self.set_asset(index, AssetField::BackgroundOverlay, &name)?;
            }
            EditorInput::SetOverlay { name } => {
                self.set_asset(index, AssetField::Overlay, &name)?;
            }
            EditorInput::SetMusic { name } => {
                self.set_asset(index, AssetField::Music, &name)?;
            }
            EditorInput::SetSound { name } => {
                self.set_asset(index, AssetField::Sound, &name)?;
            }
            EditorInput::SetSpeakerTexture { slot, part, name } => {
                if part.is_layered() {
                    self.expect_advanced()?;
                }
                let value = self.checked_texture(&name)?;
                let speaker = self
                    .scene_mut(index)?
                    .speakers
                    .get_mut(slot)
                    .ok_or_else(|| bad_slot(slot))?;
                *speaker.texture_mut(part) = value;
            }
        }

        Ok(())
    }

    fn set_asset(&mut self, index: usize, field: AssetField, name: &str) -> ScResult<()> {
        if field.is_advanced_only() {
            self.expect_advanced()?;
        }
        let value = if field.is_audio() {
            self.checked_track(name)?
        } else {
            self.checked_texture(name)?
        };
        *field.slot(self.scene_mut(index)?) = value;
        Ok(())
    }

    /// 纹理名必须能在当前查找方式下解析
    fn checked_texture(&self, name: &str) -> ScResult<Option<String>> {
        check_text(name)?;
        let Some(name) = non_blank(name) else {
            return Ok(None);
        };
        if self.texture(Some(name.as_str())).is_none() {
            return Err(rejected(&format!("纹理不存在: {name}")));
        }
        Ok(Some(name))
    }

    /// 音轨名必须在音乐注册表中
    fn checked_track(&self, name: &str) -> ScResult<Option<String>> {
        check_text(name)?;
        let Some(name) = non_blank(name) else {
            return Ok(None);
        };
        if !self.music_catalog.contains(&name) {
            return Err(rejected(&format!("音轨不存在: {name}")));
        }
        Ok(Some(name))
    }

    fn expect_advanced(&self) -> ScResult<()> {
        if self.config.layout.is_advanced() {
            Ok(())
        } else {
            Err(rejected("该字段仅在高级布局下可用"))
        }
    }

    fn scenes_mut(&mut self) -> ScResult<&mut Vec<Scene>> {
        let active = self.active.ok_or(RuntimeError::NoScenarioSelected)?;
        let scenario = self
            .store
            .get_mut(active)
            .ok_or(RuntimeError::NoScenarioSelected)?;
        Ok(scenario.scenes_mut())
    }

    fn scene_mut(&mut self, index: usize) -> ScResult<&mut Scene> {
        let scenes = self.scenes_mut()?;
        let len = scenes.len();
        scenes
            .get_mut(index)
            .ok_or_else(|| RuntimeError::InvalidSceneIndex { index, len }.into())
    }
}

/// 拒绝写出后无法原样读回的文本
fn check_text(text: &str) -> ScResult<()> {
    if text.contains(FIELD_SEPARATOR) {
        return Err(rejected(&format!("文本不能包含 `{FIELD_SEPARATOR}`")));
    }
    if text.contains(['\n', '\r']) {
        return Err(rejected("文本不能换行"));
    }
    let trimmed = text.trim();
    if [NONE_TOKEN, SCENE_START_MARKER, SCENE_END_MARKER].contains(&trimmed) {
        return Err(rejected(&format!("`{trimmed}` 是保留字")));
    }
    Ok(())
}

fn rejected(message: &str) -> ScError {
    RuntimeError::EditorRejected {
        message: message.to_string(),
    }
    .into()
}

fn bad_slot(slot: usize) -> ScError {
    rejected(&format!("槽位 {slot} 超出范围（共 {SPEAKER_COUNT} 个）"))
}

fn non_blank(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
