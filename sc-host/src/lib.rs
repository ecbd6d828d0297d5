//! # Host 层
//!
//! 剧本引擎的宿主层实现：文件系统、表现层驱动、在线状态与命令行主循环。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 扫描游戏目录（剧本、纹理、音乐、存档、翻译）
//! - 把引擎输出的帧转换为绘制调用和音频操作
//! - 存档读写
//! - 输入采集
//! - 在线状态后台线程
//!
//! Host 层不包含剧本逻辑，只负责把 sc-runtime 的输出变成实际效果。

pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod intro;
pub mod library;
pub mod presence;
pub mod presentation;
pub mod resources;
pub mod save_manager;
pub mod translation;

pub use app::{App, FRAME_TIME, Flow};
pub use config::{AppConfig, AudioConfig, ConfigError, DirectoryConfig, GameSettings, PresenceConfig};
pub use error::{HostError, HostResult};
pub use input::{EditCommand, HostCommand};
pub use intro::IntroFade;
pub use library::{GameDirs, ScenarioLibrary};
pub use presence::{LogPresence, PresenceActivity, PresenceHandle, PresenceService, PresenceSnapshot};
pub use presentation::{AudioBackend, ConsoleRenderer, LogAudio, PresentationDriver, RenderBackend};
pub use resources::{FsScenarioSource, ResourceError, TextureHandle};
pub use save_manager::{SaveInfo, SaveManager};
pub use translation::{Language, Translations};
