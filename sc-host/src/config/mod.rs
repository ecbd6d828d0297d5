//! # Config 模块
//!
//! 运行时配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use sc_runtime::{
    EngineConfig, MAX_TEXT_SPEED, MIN_TEXT_SPEED, SceneLayout, TextureLookup,
};

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 游戏根目录
    #[serde(default = "default_game_root")]
    pub game_root: PathBuf,

    /// 子目录名（相对于 game_root）
    #[serde(default)]
    pub directories: DirectoryConfig,

    /// 游戏名（窗口标题）
    #[serde(default = "default_game_name")]
    pub game_name: String,

    /// 开发者名（片头显示）
    #[serde(default = "default_game_developer")]
    pub game_developer: String,

    /// 是否使用高级场景布局
    #[serde(default)]
    pub advanced_scenes: bool,

    /// 故事模式：跳过剧本选择，只播放 `main.sc`，纹理统一从 `main.sc` 查找
    #[serde(default)]
    pub story_mode: bool,

    /// 在线状态配置
    #[serde(default)]
    pub presence: PresenceConfig,

    /// 游戏设置
    #[serde(default)]
    pub game: GameSettings,

    /// 音频配置
    #[serde(default)]
    pub audio: AudioConfig,
}

/// 子目录配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default = "default_scenarios_dir")]
    pub scenarios: String,
    #[serde(default = "default_textures_dir")]
    pub textures: String,
    #[serde(default = "default_sounds_dir")]
    pub sounds: String,
    #[serde(default = "default_saves_dir")]
    pub saves: String,
    #[serde(default = "default_translations_dir")]
    pub translations: String,
}

/// 在线状态配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceConfig {
    /// 是否启用
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// 应用 ID
    #[serde(default)]
    pub app_id: String,

    /// 大图标的键名
    #[serde(default = "default_logo_key")]
    pub logo_key: String,
}

/// 游戏设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    /// 是否逐字显示台词
    #[serde(default = "default_true")]
    pub animated_text: bool,

    /// 逐字显示速度 (1 - 100)
    #[serde(default = "default_text_speed")]
    pub text_speed: u32,

    /// 场景切换时自动存档
    #[serde(default)]
    pub auto_save: bool,

    /// 菜单语言（translations 目录下的语言名，None 表示不翻译）
    #[serde(default)]
    pub menu_language: Option<String>,
}

/// 音频配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// 背景音乐音量 (0 - 100)
    #[serde(default = "default_music_volume")]
    pub music_volume: u32,

    /// 音效音量 (0 - 100)
    #[serde(default = "default_sound_volume")]
    pub sound_volume: u32,
}

impl AudioConfig {
    /// 背景音乐音量 (0.0 - 1.0)
    pub fn music_gain(&self) -> f32 {
        self.music_volume.min(100) as f32 / 100.0
    }

    /// 音效音量 (0.0 - 1.0)
    pub fn sound_gain(&self) -> f32 {
        self.sound_volume.min(100) as f32 / 100.0
    }
}

// 默认值函数
fn default_game_root() -> PathBuf {
    PathBuf::from("game")
}

fn default_scenarios_dir() -> String {
    "scenarios".to_string()
}

fn default_textures_dir() -> String {
    "textures".to_string()
}

fn default_sounds_dir() -> String {
    "sounds".to_string()
}

fn default_saves_dir() -> String {
    "saves".to_string()
}

fn default_translations_dir() -> String {
    "translations".to_string()
}

fn default_game_name() -> String {
    "Visual Novel".to_string()
}

fn default_game_developer() -> String {
    "Unknown Developer".to_string()
}

fn default_logo_key() -> String {
    "logo".to_string()
}

fn default_text_speed() -> u32 {
    sc_runtime::DEFAULT_TEXT_SPEED
}

fn default_music_volume() -> u32 {
    80
}

fn default_sound_volume() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game_root: default_game_root(),
            directories: DirectoryConfig::default(),
            game_name: default_game_name(),
            game_developer: default_game_developer(),
            advanced_scenes: false,
            story_mode: false,
            presence: PresenceConfig::default(),
            game: GameSettings::default(),
            audio: AudioConfig::default(),
        }
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            scenarios: default_scenarios_dir(),
            textures: default_textures_dir(),
            sounds: default_sounds_dir(),
            saves: default_saves_dir(),
            translations: default_translations_dir(),
        }
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            app_id: String::new(),
            logo_key: default_logo_key(),
        }
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            animated_text: true,
            text_speed: default_text_speed(),
            auto_save: false,
            menu_language: None,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            music_volume: default_music_volume(),
            sound_volume: default_sound_volume(),
        }
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并打印警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!(path = %path.display(), "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TEXT_SPEED..=MAX_TEXT_SPEED).contains(&self.game.text_speed) {
            return Err(ConfigError::ValidationFailed(format!(
                "文字速度必须在 {MIN_TEXT_SPEED} - {MAX_TEXT_SPEED} 之间"
            )));
        }

        if self.audio.music_volume > 100 {
            return Err(ConfigError::ValidationFailed(
                "背景音乐音量必须在 0 - 100 之间".to_string(),
            ));
        }

        if self.audio.sound_volume > 100 {
            return Err(ConfigError::ValidationFailed(
                "音效音量必须在 0 - 100 之间".to_string(),
            ));
        }

        let dirs = &self.directories;
        for name in [
            &dirs.scenarios,
            &dirs.textures,
            &dirs.sounds,
            &dirs.saves,
            &dirs.translations,
        ] {
            if name.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "子目录名不能为空".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// 剧本目录
    pub fn scenarios_dir(&self) -> PathBuf {
        self.game_root.join(&self.directories.scenarios)
    }

    /// 纹理目录
    pub fn textures_dir(&self) -> PathBuf {
        self.game_root.join(&self.directories.textures)
    }

    /// 音频目录
    pub fn sounds_dir(&self) -> PathBuf {
        self.game_root.join(&self.directories.sounds)
    }

    /// 存档目录
    pub fn saves_dir(&self) -> PathBuf {
        self.game_root.join(&self.directories.saves)
    }

    /// 翻译目录
    pub fn translations_dir(&self) -> PathBuf {
        self.game_root.join(&self.directories.translations)
    }

    /// 场景布局（故事模式默认使用高级布局）
    pub fn layout(&self) -> SceneLayout {
        SceneLayout::from_flag(self.advanced_scenes || self.story_mode)
    }

    /// 纹理查找方式
    pub fn texture_lookup(&self) -> TextureLookup {
        if self.story_mode {
            TextureLookup::Shared
        } else {
            TextureLookup::PerScenario
        }
    }

    /// 生成引擎配置
    pub fn engine_config(&self, editor: bool) -> EngineConfig {
        EngineConfig::default()
            .with_layout(self.layout())
            .with_texture_lookup(self.texture_lookup())
            .with_editor(editor)
            .with_text_animation(self.game.animated_text, self.game.text_speed)
    }
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    IoError(String),
    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
