//! # App 模块
//!
//! 应用状态与主循环逻辑。
//!
//! ## 每条命令的处理流程
//!
//! 1. [`App::execute`] 把命令转换为引擎输入（或宿主自己的操作）
//! 2. [`App::settle`] 推进时间直到台词完整显示，然后呈现最后一帧
//! 3. 场景变化时写自动存档，并把状态发布给在线状态线程

mod commands;

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::HostResult;
use crate::intro::IntroFade;
use crate::library::{GameDirs, ScenarioLibrary};
use crate::presence::{PresenceHandle, PresenceSnapshot};
use crate::presentation::{AudioBackend, PresentationDriver, RenderBackend};
use crate::resources::FsScenarioSource;
use crate::save_manager::SaveManager;
use sc_runtime::{Engine, Frame, MusicRegistry, PlaybackState, SaveRecord};

pub use commands::Flow;

/// 固定帧间隔（秒）
pub const FRAME_TIME: f32 = 1.0 / 60.0;

/// 单次 settle 的帧数上限
const MAX_SETTLE_FRAMES: usize = 100_000;

/// 应用状态
pub struct App<R, A> {
    /// 应用配置
    config: AppConfig,
    editor: bool,
    library: ScenarioLibrary,
    saves: SaveManager,
    /// 全局音乐注册表
    music: MusicRegistry<PathBuf>,
    engine: Engine<FsScenarioSource>,
    driver: PresentationDriver<R, A>,
    intro: IntroFade,
    presence: Option<PresenceHandle>,
    /// 上次自动存档时的场景序号
    last_serial: u64,
}

impl<R: RenderBackend, A: AudioBackend> App<R, A> {
    /// 创建应用，扫描游戏目录
    pub fn new(config: AppConfig, editor: bool, render: R, audio: A) -> HostResult<Self> {
        let dirs = GameDirs::from_config(&config);
        dirs.ensure_all()?;

        let library = ScenarioLibrary::new(dirs);
        let saves = SaveManager::new(&library.dirs().saves);
        let music = library.scan_music();
        let mut engine = Engine::new(
            config.engine_config(editor),
            FsScenarioSource::new(),
            library.scan_scenarios(),
        );
        engine.set_music_catalog(music.names());
        let driver = PresentationDriver::new(render, audio)
            .with_volumes(config.audio.music_gain(), config.audio.sound_gain());

        info!(
            game = %config.game_name,
            editor,
            layout = ?config.layout(),
            "应用初始化完成"
        );

        Ok(Self {
            config,
            editor,
            library,
            saves,
            music,
            engine,
            driver,
            intro: IntroFade::new(),
            presence: None,
            last_serial: 0,
        })
    }

    /// 连接在线状态线程
    pub fn with_presence(mut self, presence: PresenceHandle) -> Self {
        self.presence = Some(presence);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn engine(&self) -> &Engine<FsScenarioSource> {
        &self.engine
    }

    pub fn driver(&self) -> &PresentationDriver<R, A> {
        &self.driver
    }

    pub fn saves(&self) -> &SaveManager {
        &self.saves
    }

    pub fn library(&self) -> &ScenarioLibrary {
        &self.library
    }

    pub fn intro(&self) -> &IntroFade {
        &self.intro
    }

    /// 播放开场动画直到结束
    pub fn run_intro(&mut self, skip: bool) {
        if skip {
            self.intro.skip();
        }
        while !self.intro.is_finished() {
            self.intro.update(FRAME_TIME);
            self.driver
                .render_mut()
                .draw_intro(&self.config.game_developer, self.intro.alpha());
        }
        debug!("开场动画结束");
        self.publish_presence();
    }

    /// 推进时间直到当前台词完整显示，然后呈现一帧
    ///
    /// 暂停时逐字显示停止，只推进一帧。
    pub fn settle(&mut self) -> Frame {
        let mut frame = self.engine.tick(FRAME_TIME);
        let mut frames = 1;
        while !self.engine.is_paused()
            && !self.engine.text_complete()
            && frames < MAX_SETTLE_FRAMES
        {
            frame = self.engine.tick(FRAME_TIME);
            frames += 1;
        }

        let engine = &self.engine;
        self.driver
            .present(&frame, |name| engine.texture(Some(name)), &self.music);

        self.log_load_reports();
        self.autosave(&frame);
        self.publish_presence();
        frame
    }

    fn log_load_reports(&mut self) {
        for (scenario, report) in self.engine.take_load_reports() {
            info!(
                scenario = %scenario,
                scenes = report.scene_count,
                textures = report.texture_count,
                "剧本加载完成"
            );
            if report.skipped_lines > 0 {
                debug!(scenario = %scenario, skipped = report.skipped_lines, "跳过了格式不正确的行");
            }
            for warning in &report.warnings {
                warn!(scenario = %scenario, "{warning}");
            }
        }
    }

    fn autosave(&mut self, frame: &Frame) {
        if frame.scene_serial == self.last_serial {
            return;
        }
        self.last_serial = frame.scene_serial;

        if !self.config.game.auto_save || self.editor {
            return;
        }
        if let Some(position) = self.engine.position()
            && let Err(e) = self.saves.autosave(&SaveRecord::from_position(&position))
        {
            warn!(error = %e, "自动存档失败");
        }
    }

    fn publish_presence(&self) {
        let Some(presence) = &self.presence else {
            return;
        };

        let scenario = match self.engine.state() {
            PlaybackState::Playing { scenario, .. } => Some(scenario.clone()),
            _ => None,
        };
        presence.publish(PresenceSnapshot {
            game_started: scenario.is_some(),
            intro_finished: self.intro.is_finished(),
            scenario,
            editor: self.editor,
        });
    }
}
