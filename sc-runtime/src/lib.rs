//! # SC Runtime
//!
//! 剧本驱动的视觉小说引擎核心运行时库。
//!
//! ## 架构概述
//!
//! `sc-runtime` 是纯逻辑核心，不依赖任何 IO 或渲染引擎。
//! 剧本内容通过 [`ScenarioSource`] 由宿主层提供，引擎以 **帧描述** 与宿主通信：
//!
//! ```text
//! Host                          Runtime
//!   │                              │
//!   │──── RuntimeInput ──────────►│ handle()
//!   │                              │
//!   │──── dt ────────────────────►│ tick()
//!   │◄─── Frame ──────────────────│
//!   │                              │
//! ```
//!
//! ## 核心类型
//!
//! - [`Engine`]：播放状态机，拥有剧本仓库与运行配置
//! - [`RuntimeInput`]：Host 向引擎传递的输入
//! - [`Frame`]：引擎每帧输出的画面与音频意图
//! - [`Scene`]：一个场景的全部字段
//!
//! ## 使用示例
//!
//! ```ignore
//! use sc_runtime::{Engine, EngineConfig, RuntimeInput};
//!
//! let mut engine = Engine::new(EngineConfig::default(), source, descriptors);
//! engine.handle(RuntimeInput::OpenScenarioSelect)?;
//! engine.handle(RuntimeInput::start("main.sc", "Alex"))?;
//!
//! loop {
//!     let frame = engine.tick(dt);
//!     host.present(&frame);
//!     for input in host.poll_inputs() {
//!         let _ = engine.handle(input);
//!     }
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`script`]：剧本文本格式（解析与写出）
//! - [`scene`]：场景数据模型
//! - [`store`]：剧本仓库与内容来源
//! - [`assets`]：纹理/音乐名称解析
//! - [`text`]：对话焦点、玩家名替换与逐字显示
//! - [`state`]：播放状态
//! - [`input`]：输入定义
//! - [`history`]：对话历史
//! - [`save`]：存档记录
//! - [`error`]：错误类型定义
//! - [`runtime`]：播放引擎与帧输出

pub mod assets;
pub mod error;
pub mod history;
pub mod input;
pub mod runtime;
pub mod save;
pub mod scene;
pub mod script;
pub mod state;
pub mod store;
pub mod text;

// 重导出核心类型
pub use assets::{AssetResolver, MusicRegistry, SHARED_SCENARIO_NAME, TextureLookup};
pub use error::{RuntimeError, ScError, ScResult};
pub use history::{History, HistoryEvent};
pub use input::{EditorInput, RuntimeInput};
pub use runtime::engine::{DEFAULT_TEXT_SPEED, MAX_TEXT_SPEED, MIN_TEXT_SPEED};
pub use runtime::{ButtonView, Engine, EngineConfig, Frame, MENU_MUSIC_NAME, SoundCue, SpriteView};
pub use save::{SaveError, SaveRecord, SaveVersion};
pub use scene::{
    BUTTON_COUNT, ChoiceButton, MainCharacterSlot, SPEAKER_COUNT, Scene, SpeakerSlot, SpritePart,
};
pub use script::{ParseReport, Parser, SceneLayout, SkippedLine, blank_scenario, write_scenario};
pub use state::{PlaybackPosition, PlaybackState};
pub use store::{LoadReport, Scenario, ScenarioDescriptor, ScenarioSource, ScenarioStore};
pub use text::{DialogueView, Focus, TextReveal, resolve_dialogue, substitute_player_name};
