//! # Error 模块
//!
//! 定义 sc-runtime 中使用的错误类型。
//!
//! 剧本内容的格式问题不是错误（由解析器容错处理），这里只描述会被拒绝的操作。

use thiserror::Error;

use crate::save::SaveError;

/// 运行时错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// 状态不匹配
    #[error("当前状态不允许此操作：期望 {expected}，实际 {actual}")]
    StateMismatch { expected: String, actual: String },

    /// 剧本不存在
    #[error("剧本 '{name}' 不存在")]
    ScenarioNotFound { name: String },

    /// 剧本没有任何场景
    #[error("剧本 '{name}' 没有可播放的场景")]
    EmptyScenario { name: String },

    /// 未选择剧本
    #[error("未选择剧本")]
    NoScenarioSelected,

    /// 玩家名为空
    #[error("玩家名不能为空")]
    BlankPlayerName,

    /// 无效的按钮
    #[error("按钮 {index} 不可用")]
    InvalidButton { index: usize },

    /// 无效的场景索引
    #[error("无效的场景索引 {index}，有效范围是 0..{len}")]
    InvalidSceneIndex { index: usize, len: usize },

    /// 编辑器操作被拒绝
    #[error("编辑器操作被拒绝: {message}")]
    EditorRejected { message: String },
}

/// sc-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScError {
    /// 运行时错误
    #[error("运行时错误: {0}")]
    Runtime(#[from] RuntimeError),

    /// 存档错误
    #[error("存档错误: {0}")]
    Save(#[from] SaveError),
}

/// Result 类型别名
pub type ScResult<T> = Result<T, ScError>;
