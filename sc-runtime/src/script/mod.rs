//! # Script 模块
//!
//! 剧本文本格式（`.sc`）的解析与写出。
//!
//! ## 文本格式
//!
//! ```text
//! [scene_start]
//! bg:[bg_overlay]:music:sound          ← 第 0 行
//! name:texture:line[:left:right:head]  ← 第 1-4 行，NPC 1-4
//! main line                            ← 第 5 行，主角台词
//! label:target                         ← 第 6-9 行，按钮 1-4
//! overlay                              ← 第 10 行，仅高级布局
//! [scene_end]
//! ```
//!
//! 字段以 `:` 分隔，缺省值写作 `NONE`。方括号内的字段只在高级布局下出现。
//!
//! ## 模块结构
//!
//! - [`parser`]：容错解析器
//! - [`writer`]：与解析器对称的写出器

pub mod parser;
pub mod writer;

use serde::{Deserialize, Serialize};

pub use parser::{ParseReport, Parser, SkippedLine};
pub use writer::{blank_scenario, write_scenario};

/// 场景块起始标记
pub const SCENE_START_MARKER: &str = "[scene_start]";

/// 场景块结束标记
pub const SCENE_END_MARKER: &str = "[scene_end]";

/// 缺省值哨兵
pub const NONE_TOKEN: &str = "NONE";

/// 字段分隔符
pub const FIELD_SEPARATOR: char = ':';

/// 场景字段布局
///
/// 进程级开关，解析器和写出器必须使用同一布局。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneLayout {
    /// 简单布局：单张立绘，无叠加层
    #[default]
    Simple,
    /// 高级布局：分层立绘 + 背景叠加层 + 全屏叠加层
    Advanced,
}

impl SceneLayout {
    /// 根据开关选择布局
    pub fn from_flag(advanced: bool) -> Self {
        if advanced { Self::Advanced } else { Self::Simple }
    }

    /// 是否为高级布局
    pub fn is_advanced(self) -> bool {
        matches!(self, Self::Advanced)
    }
}
