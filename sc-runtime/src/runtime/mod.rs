//! # Runtime 模块
//!
//! 剧本播放引擎核心，负责状态转换和帧输出。
//!
//! ## 模块结构
//!
//! - [`engine`]：播放状态机
//! - [`frame`]：每帧输出给表现层的描述

pub mod engine;
pub mod frame;

pub use engine::{Engine, EngineConfig};
pub use frame::{ButtonView, Frame, MENU_MUSIC_NAME, SoundCue, SpriteView};
