//! # Engine 模块
//!
//! 剧本播放状态机。
//!
//! ## 执行模型
//!
//! ```text
//! handle(input) -> ScResult<()>     状态转换（被拒绝时返回错误，并记为玩家可见的提示）
//! tick(dt)      -> Frame            推进逐字显示、记录历史、输出本帧描述
//! ```
//!
//! 引擎拥有剧本仓库与内容来源，所有运行模式（布局、纹理查找方式、编辑器）
//! 在创建时通过 [`EngineConfig`] 传入。

mod editor;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::assets::{AssetResolver, SHARED_SCENARIO_NAME, TextureLookup};
use crate::error::{RuntimeError, ScResult};
use crate::history::{History, HistoryEvent};
use crate::input::RuntimeInput;
use crate::runtime::frame::{ButtonView, Frame, SoundCue, SpriteView};
use crate::save::{SaveError, SaveRecord};
use crate::scene::Scene;
use crate::script::{Parser, SceneLayout};
use crate::state::{PlaybackPosition, PlaybackState};
use crate::store::{LoadReport, Scenario, ScenarioDescriptor, ScenarioSource, ScenarioStore};
use crate::text::{DialogueView, Focus, TextReveal, resolve_dialogue};

/// 文字速度下限
pub const MIN_TEXT_SPEED: u32 = 1;
/// 文字速度上限
pub const MAX_TEXT_SPEED: u32 = 100;
/// 默认文字速度
pub const DEFAULT_TEXT_SPEED: u32 = 30;

/// 引擎配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 场景字段布局
    pub layout: SceneLayout,
    /// 纹理查找方式
    pub texture_lookup: TextureLookup,
    /// 是否启用剧本编辑器
    pub editor_mode: bool,
    /// 是否逐字显示台词
    pub animated_text: bool,
    /// 逐字显示速度（1-100）
    pub text_speed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            layout: SceneLayout::Simple,
            texture_lookup: TextureLookup::PerScenario,
            editor_mode: false,
            animated_text: true,
            text_speed: DEFAULT_TEXT_SPEED,
        }
    }
}

impl EngineConfig {
    /// 设置布局
    pub fn with_layout(mut self, layout: SceneLayout) -> Self {
        self.layout = layout;
        self
    }

    /// 设置纹理查找方式
    pub fn with_texture_lookup(mut self, lookup: TextureLookup) -> Self {
        self.texture_lookup = lookup;
        self
    }

    /// 启用/禁用编辑器
    pub fn with_editor(mut self, enabled: bool) -> Self {
        self.editor_mode = enabled;
        self
    }

    /// 设置逐字显示（速度会被限制在 1-100）
    pub fn with_text_animation(mut self, animated: bool, speed: u32) -> Self {
        self.animated_text = animated;
        self.text_speed = speed.clamp(MIN_TEXT_SPEED, MAX_TEXT_SPEED);
        self
    }
}

/// 剧本播放引擎
pub struct Engine<S: ScenarioSource> {
    config: EngineConfig,
    parser: Parser,
    resolver: AssetResolver,
    source: S,
    store: ScenarioStore<S::Texture>,
    state: PlaybackState,
    /// 当前剧本在仓库中的索引
    active: Option<usize>,
    player_name: String,
    paused: bool,
    reveal: TextReveal,
    history: History,
    /// 当前场景的对话是否已写入历史
    recorded_dialogue: bool,
    scene_serial: u64,
    status: Option<String>,
    load_reports: Vec<(String, LoadReport)>,
    /// 编辑器可选的音轨名（与 Host 的音乐注册表一致）
    music_catalog: BTreeSet<String>,
}

impl<S: ScenarioSource> Engine<S> {
    /// 创建引擎
    ///
    /// # 参数
    ///
    /// - `config`: 运行模式
    /// - `source`: 剧本内容来源
    /// - `descriptors`: 扫描得到的剧本列表
    pub fn new(config: EngineConfig, source: S, descriptors: Vec<ScenarioDescriptor>) -> Self {
        Self {
            parser: Parser::new(config.layout),
            resolver: AssetResolver::new(config.texture_lookup),
            config,
            source,
            store: ScenarioStore::new(descriptors),
            state: PlaybackState::MainMenu,
            active: None,
            player_name: String::new(),
            paused: false,
            reveal: TextReveal::new(),
            history: History::new(),
            recorded_dialogue: false,
            scene_serial: 0,
            status: None,
            load_reports: Vec::new(),
            music_catalog: BTreeSet::new(),
        }
    }

    /// 设置编辑器可选的音轨名
    ///
    /// Host 扫描音乐目录后调用，重新扫描时整体替换。
    pub fn set_music_catalog<I, N>(&mut self, names: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.music_catalog = names.into_iter().map(Into::into).collect();
    }

    // =========================================================================
    // 查询
    // =========================================================================

    /// 引擎配置
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 当前状态
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// 剧本仓库
    pub fn store(&self) -> &ScenarioStore<S::Texture> {
        &self.store
    }

    /// 内容来源
    pub fn source(&self) -> &S {
        &self.source
    }

    /// 玩家名
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// 对话历史
    pub fn history(&self) -> &History {
        &self.history
    }

    /// 暂停菜单是否打开
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// 当前提示
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// 当前剧本
    pub fn active_scenario(&self) -> Option<&Scenario<S::Texture>> {
        self.store.get(self.active?)
    }

    /// 当前场景索引
    pub fn scene_index(&self) -> Option<usize> {
        match self.state {
            PlaybackState::Playing { scene_index, .. } => Some(scene_index),
            _ => None,
        }
    }

    /// 当前场景
    pub fn current_scene(&self) -> Option<&Scene> {
        let index = self.scene_index()?;
        self.active_scenario()?.scenes().get(index)
    }

    /// 选项菜单是否打开（每次调用都从场景内容重新计算）
    pub fn choice_menu_open(&self) -> bool {
        !self.paused && self.current_scene().is_some_and(Scene::has_choices)
    }

    /// 当前台词是否已全部显示（未启用逐字显示时总是 true）
    pub fn text_complete(&self) -> bool {
        if !self.config.animated_text {
            return true;
        }
        self.current_scene()
            .map(|scene| resolve_dialogue(scene, &self.player_name))
            .is_none_or(|view| self.reveal.is_complete(&view.text))
    }

    /// 当前播放位置（用于存档）
    pub fn position(&self) -> Option<PlaybackPosition> {
        match &self.state {
            PlaybackState::Playing {
                scenario,
                scene_index,
            } => Some(PlaybackPosition::new(
                scenario.as_str(),
                self.player_name.as_str(),
                *scene_index,
            )),
            _ => None,
        }
    }

    /// 解析纹理名
    pub fn texture(&self, name: Option<&str>) -> Option<&S::Texture> {
        self.resolver.texture(&self.store, self.active, name)
    }

    /// 取出自上次调用以来的加载报告 (剧本文件名, 报告)
    pub fn take_load_reports(&mut self) -> Vec<(String, LoadReport)> {
        std::mem::take(&mut self.load_reports)
    }

    // =========================================================================
    // 仓库维护
    // =========================================================================

    /// 用新的扫描结果替换剧本列表（游戏中不允许）
    pub fn rescan(&mut self, descriptors: Vec<ScenarioDescriptor>) -> ScResult<()> {
        if self.state.is_playing() {
            return Err(self.mismatch("MainMenu").into());
        }
        self.store.replace(descriptors);
        Ok(())
    }

    /// 释放全部已加载内容，当前剧本随即重新加载
    pub fn unload_all(&mut self) {
        self.store.unload_all();
        if let Some(index) = self.active {
            self.ensure_loaded(index);
        }
    }

    // =========================================================================
    // 输入处理
    // =========================================================================

    /// 处理输入
    ///
    /// 被拒绝的操作返回错误，错误信息同时作为提示出现在后续帧中。
    /// 越过最后一个场景的推进不是错误，只是没有效果。
    pub fn handle(&mut self, input: RuntimeInput) -> ScResult<()> {
        let result = self.dispatch(input);
        if let Err(e) = &result {
            self.status = Some(e.to_string());
        }
        result
    }

    fn dispatch(&mut self, input: RuntimeInput) -> ScResult<()> {
        match input {
            RuntimeInput::OpenScenarioSelect => {
                self.expect_state(&PlaybackState::MainMenu)?;
                self.go_to_menu(PlaybackState::ScenarioSelect);
                Ok(())
            }
            RuntimeInput::OpenSaveSelect => {
                self.expect_state(&PlaybackState::MainMenu)?;
                self.go_to_menu(PlaybackState::SaveSelect);
                Ok(())
            }
            RuntimeInput::Back => match self.state {
                PlaybackState::ScenarioSelect | PlaybackState::SaveSelect => {
                    self.go_to_menu(PlaybackState::MainMenu);
                    Ok(())
                }
                _ => Err(self.mismatch("ScenarioSelect | SaveSelect").into()),
            },
            RuntimeInput::StartNewGame {
                scenario,
                player_name,
            } => self.start_new_game(scenario, &player_name),
            RuntimeInput::LoadSave { record } => self.load_save(&record),
            RuntimeInput::Advance => self.advance(),
            RuntimeInput::ActivateButton { index } => self.activate_button(index),
            RuntimeInput::TogglePause => {
                self.expect_playing()?;
                self.paused = !self.paused;
                Ok(())
            }
            RuntimeInput::ExitToMainMenu => {
                self.exit_to_main_menu();
                Ok(())
            }
            RuntimeInput::Editor(op) => self.apply_editor(op),
        }
    }

    fn start_new_game(&mut self, scenario: Option<String>, player_name: &str) -> ScResult<()> {
        self.expect_state(&PlaybackState::ScenarioSelect)?;

        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(RuntimeError::BlankPlayerName.into());
        }

        // 故事模式只播放共享剧本
        let scenario = match self.config.texture_lookup {
            TextureLookup::Shared => SHARED_SCENARIO_NAME.to_string(),
            TextureLookup::PerScenario => scenario.ok_or(RuntimeError::NoScenarioSelected)?,
        };

        let index = self
            .store
            .find_index(&scenario)
            .ok_or(RuntimeError::ScenarioNotFound { name: scenario })?;
        self.load_playable(index)?;

        self.player_name = player_name.to_string();
        self.enter_scenario(index, 0);
        Ok(())
    }

    fn load_save(&mut self, record: &SaveRecord) -> ScResult<()> {
        self.expect_state(&PlaybackState::SaveSelect)?;

        let position = record.to_position()?;
        let index = self
            .store
            .find_index(&position.scenario_name)
            .ok_or_else(|| SaveError::UnknownScenario(position.scenario_name.clone()))?;

        let len = self.load_playable(index)?;
        if position.scene_index >= len {
            return Err(SaveError::SceneOutOfRange {
                index: position.scene_index,
                len,
            }
            .into());
        }

        self.player_name = position.player_name;
        self.enter_scenario(index, position.scene_index);
        Ok(())
    }

    fn advance(&mut self) -> ScResult<()> {
        self.expect_playing()?;

        // 编辑器中只能通过场景列表切换
        if self.config.editor_mode || self.paused || self.choice_menu_open() {
            return Ok(());
        }

        self.step_forward();
        Ok(())
    }

    fn activate_button(&mut self, index: usize) -> ScResult<()> {
        self.expect_playing()?;
        if self.paused {
            return Err(RuntimeError::StateMismatch {
                expected: "Playing".to_string(),
                actual: "PauseMenuOpen".to_string(),
            }
            .into());
        }

        let button = self
            .current_scene()
            .and_then(|scene| scene.buttons.get(index))
            .filter(|button| button.is_present())
            .cloned()
            .ok_or(RuntimeError::InvalidButton { index })?;

        match button.target {
            Some(target) => {
                let target_index = self
                    .store
                    .find_index(&target)
                    .ok_or_else(|| RuntimeError::ScenarioNotFound {
                        name: target.clone(),
                    })?;
                self.load_playable(target_index)?;

                // 软切换：保留历史
                self.history.push(HistoryEvent::scenario_switch(target));
                self.enter_scenario(target_index, 0);
            }
            None => {
                // 无目标的按钮等同一次推进信号
                if !self.config.editor_mode {
                    self.step_forward();
                }
            }
        }

        Ok(())
    }

    fn exit_to_main_menu(&mut self) {
        self.state = PlaybackState::MainMenu;
        self.active = None;
        self.paused = false;
        self.history.clear();
        self.reset_transient();
        self.status = None;
    }

    // =========================================================================
    // 帧输出
    // =========================================================================

    /// 推进一帧并输出本帧描述
    ///
    /// `dt` 为距上一帧的秒数。
    pub fn tick(&mut self, dt: f32) -> Frame {
        let Some(view) = self
            .current_scene()
            .map(|scene| resolve_dialogue(scene, &self.player_name))
        else {
            return Frame::menu(
                self.state.clone(),
                self.status.clone(),
                self.config.editor_mode,
            );
        };

        if self.config.animated_text {
            self.reveal
                .step(&view.text, dt, self.config.text_speed, self.paused);
        }

        if !self.recorded_dialogue && !view.banner.is_empty() && !view.text.is_empty() {
            self.history
                .push(HistoryEvent::dialogue(view.banner.as_str(), view.text.as_str()));
            self.recorded_dialogue = true;
        }

        self.scene_frame(view)
    }

    fn scene_frame(&self, view: DialogueView) -> Frame {
        let advanced = self.config.layout.is_advanced();
        let choice_menu_open = self.choice_menu_open();
        let Some(scene) = self.current_scene() else {
            return Frame::menu(self.state.clone(), self.status.clone(), self.config.editor_mode);
        };

        let sprites = scene
            .speakers
            .iter()
            .enumerate()
            .filter_map(|(slot, speaker)| {
                let parts = speaker.sprite_parts(advanced);
                (!parts.is_empty()).then(|| SpriteView {
                    slot,
                    parts: parts.into_iter().map(str::to_string).collect(),
                    focused: view.focus == Focus::Speaker(slot),
                })
            })
            .collect();

        let buttons = if choice_menu_open {
            scene
                .buttons
                .iter()
                .enumerate()
                .filter_map(|(index, button)| {
                    button.label.as_ref().map(|label| ButtonView {
                        index,
                        label: label.clone(),
                    })
                })
                .collect()
        } else {
            Vec::new()
        };

        let text = if self.config.animated_text {
            self.reveal.visible(&view.text).to_string()
        } else {
            view.text.clone()
        };

        Frame {
            state: self.state.clone(),
            scene_serial: self.scene_serial,
            background: scene.background.clone(),
            background_overlay: scene.background_overlay.clone().filter(|_| advanced),
            overlay: scene.overlay.clone().filter(|_| advanced),
            sprites,
            focus: view.focus,
            banner: view.banner,
            text,
            buttons,
            choice_menu_open,
            paused: self.paused,
            music: scene.music.clone(),
            sound: scene.sound.clone().map(|name| SoundCue {
                name,
                scene_serial: self.scene_serial,
            }),
            status: self.status.clone(),
            editor: self.config.editor_mode,
        }
    }

    // =========================================================================
    // 内部辅助
    // =========================================================================

    fn expect_state(&self, expected: &PlaybackState) -> Result<(), RuntimeError> {
        if &self.state == expected {
            Ok(())
        } else {
            Err(self.mismatch(expected.name()))
        }
    }

    fn expect_playing(&self) -> Result<(), RuntimeError> {
        if self.state.is_playing() {
            Ok(())
        } else {
            Err(self.mismatch("Playing"))
        }
    }

    fn mismatch(&self, expected: &str) -> RuntimeError {
        RuntimeError::StateMismatch {
            expected: expected.to_string(),
            actual: self.state.name().to_string(),
        }
    }

    fn go_to_menu(&mut self, state: PlaybackState) {
        self.state = state;
        self.status = None;
    }

    /// 加载剧本（故事模式下同时加载共享剧本），返回场景数
    fn load_playable(&mut self, index: usize) -> ScResult<usize> {
        self.ensure_loaded(index);

        let scenario = self
            .store
            .get(index)
            .ok_or(RuntimeError::NoScenarioSelected)?;
        let len = scenario.scenes().len();
        if len == 0 {
            return Err(RuntimeError::EmptyScenario {
                name: scenario.descriptor.file_name.clone(),
            }
            .into());
        }
        Ok(len)
    }

    fn ensure_loaded(&mut self, index: usize) {
        let mut indices = vec![index];
        if let Some(shared) = self.resolver.texture_scenario(&self.store, Some(index))
            && shared != index
        {
            indices.push(shared);
        }

        for index in indices {
            if let Some(report) = self.store.ensure_loaded(index, &self.parser, &self.source)
                && report.performed
                && let Some(scenario) = self.store.get(index)
            {
                self.load_reports
                    .push((scenario.descriptor.file_name.clone(), report));
            }
        }
    }

    fn enter_scenario(&mut self, index: usize, scene_index: usize) {
        let scenario = self
            .store
            .get(index)
            .map(|s| s.descriptor.file_name.clone())
            .unwrap_or_default();

        self.active = Some(index);
        self.state = PlaybackState::Playing {
            scenario,
            scene_index,
        };
        self.paused = false;
        self.status = None;
        self.reset_transient();
    }

    /// 移动到下一个场景；已是最后一个场景时不做任何事
    fn step_forward(&mut self) {
        let len = self.active_scenario().map_or(0, |s| s.scenes().len());
        if let Some(index) = self.scene_index()
            && index + 1 < len
        {
            self.move_to_scene(index + 1);
        }
    }

    fn move_to_scene(&mut self, new_index: usize) {
        if let PlaybackState::Playing { scene_index, .. } = &mut self.state {
            *scene_index = new_index;
        }
        self.reset_transient();
    }

    /// 清除与单个场景绑定的临时状态
    fn reset_transient(&mut self) {
        self.reveal.reset();
        self.recorded_dialogue = false;
        self.scene_serial += 1;
    }
}
