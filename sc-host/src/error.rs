//! # Host Error 模块
//!
//! 宿主层的错误类型。引擎拒绝的操作不在此列，它们以提示的形式出现在画面上。

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use sc_runtime::{SaveError, ScError};

/// 宿主层错误
#[derive(Error, Debug)]
pub enum HostError {
    /// 文件操作失败
    #[error("文件操作失败: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 存档错误
    #[error(transparent)]
    Save(#[from] SaveError),

    /// 引擎拒绝了操作
    #[error(transparent)]
    Runtime(#[from] ScError),

    /// 剧本已存在
    #[error("剧本已存在: {0}")]
    ScenarioExists(String),

    /// 剧本名无效
    #[error("无效的剧本名: '{0}'")]
    InvalidScenarioName(String),

    /// 无法识别的命令
    #[error("无法识别的命令: {0}")]
    InvalidCommand(String),

    /// 编辑器未启用
    #[error("该命令需要 --scenario-editor")]
    EditorDisabled,

    /// 当前没有正在播放的剧本
    #[error("当前没有正在播放的剧本")]
    NotPlaying,
}

impl HostError {
    /// 包装 IO 错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result 类型别名
pub type HostResult<T> = Result<T, HostError>;
