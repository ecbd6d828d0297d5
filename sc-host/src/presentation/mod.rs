//! # Presentation 模块
//!
//! 把引擎输出的 [`Frame`] 转换为绘制调用和音频操作。
//!
//! ## 设计原则
//!
//! - 引擎只给出“想要什么”（素材名），这里把名称解析为句柄
//! - 找不到的素材什么都不画/不播
//! - 音频按意图做差分：名称变化才重新播放，变为 `None` 时停止
//!
//! ## 绘制顺序
//!
//! 1. 背景
//! 2. 背景叠加层
//! 3. NPC 立绘（按槽位）
//! 4. 名字横幅与台词
//! 5. 选项按钮
//! 6. 全屏叠加层
//! 7. 暂停菜单
//! 8. 提示信息

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::resources::TextureHandle;
use crate::translation::Translations;
use sc_runtime::{AssetResolver, ButtonView, Frame, MusicRegistry, PlaybackState, SoundCue};

/// 绘制后端
pub trait RenderBackend {
    /// 开始一帧
    fn begin_frame(&mut self, state: &PlaybackState);
    /// 背景
    fn draw_background(&mut self, texture: &TextureHandle);
    /// 背景叠加层
    fn draw_background_overlay(&mut self, texture: &TextureHandle);
    /// NPC 立绘，`parts` 按绘制顺序排列
    fn draw_sprite(&mut self, slot: usize, parts: &[&TextureHandle], focused: bool);
    /// 名字横幅与台词
    fn draw_dialogue(&mut self, banner: &str, text: &str);
    /// 选项按钮
    fn draw_choices(&mut self, buttons: &[ButtonView]);
    /// 全屏叠加层
    fn draw_overlay(&mut self, texture: &TextureHandle);
    /// 暂停菜单
    fn draw_pause_menu(&mut self);
    /// 提示信息
    fn draw_status(&mut self, message: &str);
    /// 结束一帧
    fn end_frame(&mut self);

    /// 开场画面，`alpha` 为开发者名的透明度
    fn draw_intro(&mut self, developer: &str, alpha: f32);
    /// 列表面板（剧本、存档、历史、帮助），立即显示
    fn show_list(&mut self, title: &str, items: &[String]);
}

/// 音频后端
pub trait AudioBackend {
    /// 开始播放背景音乐（循环）
    fn play_music(&mut self, name: &str, path: &Path, volume: f32);
    /// 停止并释放背景音乐
    fn stop_music(&mut self);
    /// 暂停/恢复背景音乐
    fn set_music_paused(&mut self, paused: bool);
    /// 播放一次性音效
    fn play_sound(&mut self, name: &str, path: &Path, volume: f32);
    /// 停止音效
    fn stop_sound(&mut self);
}

/// 表现层驱动
///
/// 记录上一帧的音频意图，只在意图变化时调用音频后端。
pub struct PresentationDriver<R, A> {
    render: R,
    audio: A,
    /// 音乐/音效按名称在全局注册表中解析
    resolver: AssetResolver,
    music_volume: f32,
    sound_volume: f32,
    /// 当前正在播放的背景音乐名
    current_music: Option<String>,
    music_paused: bool,
    /// 当前的音效
    current_sound: Option<SoundCue>,
}

impl<R: RenderBackend, A: AudioBackend> PresentationDriver<R, A> {
    /// 创建表现层驱动
    pub fn new(render: R, audio: A) -> Self {
        Self {
            render,
            audio,
            resolver: AssetResolver::default(),
            music_volume: 1.0,
            sound_volume: 1.0,
            current_music: None,
            music_paused: false,
            current_sound: None,
        }
    }

    /// 设置音量（0.0 - 1.0）
    pub fn with_volumes(mut self, music: f32, sound: f32) -> Self {
        self.music_volume = music.clamp(0.0, 1.0);
        self.sound_volume = sound.clamp(0.0, 1.0);
        self
    }

    /// 绘制后端
    pub fn render(&self) -> &R {
        &self.render
    }

    /// 绘制后端（可变）
    pub fn render_mut(&mut self) -> &mut R {
        &mut self.render
    }

    /// 音频后端
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// 当前正在播放的背景音乐名
    pub fn current_music(&self) -> Option<&str> {
        self.current_music.as_deref()
    }

    /// 呈现一帧
    ///
    /// `textures` 按名称解析纹理，`music` 是全局音乐注册表。
    pub fn present<'a>(
        &mut self,
        frame: &Frame,
        textures: impl Fn(&str) -> Option<&'a TextureHandle>,
        music: &MusicRegistry<PathBuf>,
    ) {
        self.draw(frame, &textures);
        self.update_music(frame, music);
        self.update_sound(frame, music);
    }

    fn draw<'a>(&mut self, frame: &Frame, textures: &impl Fn(&str) -> Option<&'a TextureHandle>) {
        let lookup = |name: &Option<String>| name.as_deref().and_then(textures);

        self.render.begin_frame(&frame.state);

        if let Some(texture) = lookup(&frame.background) {
            self.render.draw_background(texture);
        }
        if let Some(texture) = lookup(&frame.background_overlay) {
            self.render.draw_background_overlay(texture);
        }

        for sprite in &frame.sprites {
            // 任何一层缺失都只是少画这一层
            let parts: Vec<&TextureHandle> =
                sprite.parts.iter().filter_map(|name| textures(name.as_str())).collect();
            if !parts.is_empty() {
                self.render.draw_sprite(sprite.slot, &parts, sprite.focused);
            }
        }

        if frame.state.is_playing() {
            self.render.draw_dialogue(&frame.banner, &frame.text);
        }
        if frame.choice_menu_open {
            self.render.draw_choices(&frame.buttons);
        }
        if let Some(texture) = lookup(&frame.overlay) {
            self.render.draw_overlay(texture);
        }
        if frame.paused {
            self.render.draw_pause_menu();
        }
        if let Some(status) = &frame.status {
            self.render.draw_status(status);
        }

        self.render.end_frame();
    }

    fn update_music(&mut self, frame: &Frame, music: &MusicRegistry<PathBuf>) {
        if frame.music != self.current_music {
            let name = frame.music.as_deref();
            match (name, self.resolver.music(music, name)) {
                (Some(name), Some(path)) => {
                    self.audio.play_music(name, path, self.music_volume);
                }
                (Some(name), None) => {
                    debug!(music = %name, "背景音乐未找到");
                    self.audio.stop_music();
                }
                (None, _) => self.audio.stop_music(),
            }
            self.current_music = frame.music.clone();
            self.music_paused = false;
        }

        let paused = frame.music_paused();
        if paused != self.music_paused && self.current_music.is_some() {
            self.audio.set_music_paused(paused);
        }
        self.music_paused = paused;
    }

    fn update_sound(&mut self, frame: &Frame, music: &MusicRegistry<PathBuf>) {
        if frame.sound == self.current_sound {
            return;
        }

        match &frame.sound {
            Some(cue) => match self.resolver.music(music, Some(cue.name.as_str())) {
                Some(path) => self.audio.play_sound(&cue.name, path, self.sound_volume),
                None => debug!(sound = %cue.name, "音效未找到"),
            },
            None => self.audio.stop_sound(),
        }
        self.current_sound = frame.sound.clone();
    }
}

/// 控制台绘制后端
///
/// 把每帧组织成文字，只在内容变化时输出，适合无窗口运行。
pub struct ConsoleRenderer<W: Write> {
    out: W,
    translations: Translations,
    language: Option<String>,
    buffer: Vec<String>,
    last_output: Vec<String>,
    intro_shown: bool,
}

impl<W: Write> ConsoleRenderer<W> {
    /// 创建控制台绘制后端
    pub fn new(out: W) -> Self {
        Self {
            out,
            translations: Translations::new(),
            language: None,
            buffer: Vec::new(),
            last_output: Vec::new(),
            intro_shown: false,
        }
    }

    /// 设置菜单文字的翻译
    pub fn with_translations(mut self, translations: Translations, language: Option<String>) -> Self {
        self.translations = translations;
        self.language = language;
        self
    }

    /// 输出目标
    pub fn output(&self) -> &W {
        &self.out
    }

    /// 最近一次输出的内容
    pub fn last_output(&self) -> &[String] {
        &self.last_output
    }

    fn tr<'a>(&'a self, text: &'a str) -> &'a str {
        self.translations.translate(self.language.as_deref(), text)
    }

    fn push(&mut self, line: String) {
        self.buffer.push(line);
    }

    fn write_lines<'l>(&mut self, lines: impl IntoIterator<Item = &'l String>) {
        for line in lines {
            if let Err(e) = writeln!(self.out, "{line}") {
                warn!(error = %e, "控制台输出失败");
                return;
            }
        }
        if let Err(e) = self.out.flush() {
            warn!(error = %e, "控制台输出失败");
        }
    }
}

impl<W: Write> RenderBackend for ConsoleRenderer<W> {
    fn begin_frame(&mut self, state: &PlaybackState) {
        self.buffer.clear();
        let header = match state {
            PlaybackState::MainMenu => self.tr("Main menu").to_string(),
            PlaybackState::ScenarioSelect => self.tr("Select scenario").to_string(),
            PlaybackState::SaveSelect => self.tr("Select save").to_string(),
            PlaybackState::Playing {
                scenario,
                scene_index,
            } => format!("{scenario} #{}", scene_index + 1),
        };
        self.push(format!("== {header} =="));
    }

    fn draw_background(&mut self, texture: &TextureHandle) {
        self.push(format!("[background] {}", texture.name));
    }

    fn draw_background_overlay(&mut self, texture: &TextureHandle) {
        self.push(format!("[background overlay] {}", texture.name));
    }

    fn draw_sprite(&mut self, slot: usize, parts: &[&TextureHandle], focused: bool) {
        let names: Vec<&str> = parts.iter().map(|t| t.name.as_str()).collect();
        let marker = if focused { "*" } else { " " };
        self.push(format!("[sprite {}]{marker} {}", slot + 1, names.join(" + ")));
    }

    fn draw_dialogue(&mut self, banner: &str, text: &str) {
        if !banner.is_empty() {
            self.push(format!("<{banner}>"));
        }
        if !text.is_empty() {
            self.push(format!("  {text}"));
        }
    }

    fn draw_choices(&mut self, buttons: &[ButtonView]) {
        for button in buttons {
            self.push(format!("  ({}) {}", button.index + 1, button.label));
        }
    }

    fn draw_overlay(&mut self, texture: &TextureHandle) {
        self.push(format!("[overlay] {}", texture.name));
    }

    fn draw_pause_menu(&mut self) {
        let caption = self.tr("Paused").to_string();
        self.push(format!("-- {caption} --"));
    }

    fn draw_status(&mut self, message: &str) {
        self.push(format!("! {message}"));
    }

    fn end_frame(&mut self) {
        if self.buffer == self.last_output {
            return;
        }

        let lines = std::mem::take(&mut self.buffer);
        self.write_lines(&lines);
        self.last_output = lines;
    }

    fn draw_intro(&mut self, developer: &str, alpha: f32) {
        // 控制台只在开发者名完全显现时输出一次
        if self.intro_shown || alpha < 1.0 {
            return;
        }
        self.intro_shown = true;
        let lines = [format!("~ {developer} ~")];
        self.write_lines(&lines);
    }

    fn show_list(&mut self, title: &str, items: &[String]) {
        let mut lines = vec![format!("-- {} --", self.tr(title))];
        if items.is_empty() {
            lines.push(format!("  ({})", self.tr("empty")));
        }
        lines.extend(items.iter().map(|item| format!("  {item}")));
        self.write_lines(&lines);
        // 列表打断了画面，下一帧完整重绘
        self.last_output.clear();
    }
}

/// 只记录日志的音频后端
#[derive(Debug, Default)]
pub struct LogAudio {
    playing: Option<String>,
}

impl LogAudio {
    /// 创建音频后端
    pub fn new() -> Self {
        Self::default()
    }

    /// 正在播放的背景音乐
    pub fn playing(&self) -> Option<&str> {
        self.playing.as_deref()
    }
}

impl AudioBackend for LogAudio {
    fn play_music(&mut self, name: &str, path: &Path, volume: f32) {
        info!(music = %name, path = %path.display(), volume, "播放背景音乐");
        self.playing = Some(name.to_string());
    }

    fn stop_music(&mut self) {
        if let Some(name) = self.playing.take() {
            info!(music = %name, "停止背景音乐");
        }
    }

    fn set_music_paused(&mut self, paused: bool) {
        debug!(paused, "背景音乐暂停状态");
    }

    fn play_sound(&mut self, name: &str, path: &Path, volume: f32) {
        info!(sound = %name, path = %path.display(), volume, "播放音效");
    }

    fn stop_sound(&mut self) {
        debug!("停止音效");
    }
}

#[cfg(test)]
mod tests;
