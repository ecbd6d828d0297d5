//! # Save 模块
//!
//! 存档记录的数据模型。
//!
//! ## 设计原则
//!
//! - 存档是一个 JSON 键值对象：`scenario_name`、`player_name`、`scenario_scene`
//! - 三个键必须全部存在且非空，缺失的场景索引不使用默认值
//! - 带版本号，用于检测不兼容的格式
//! - 剧本是否存在由引擎在读档时检查

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::PlaybackPosition;

/// 存档格式版本
///
/// 版本号含义：
/// - MAJOR: 不兼容的格式变更
/// - MINOR: 向后兼容的新字段
pub const SAVE_VERSION_MAJOR: u32 = 1;
pub const SAVE_VERSION_MINOR: u32 = 0;

/// 存档版本信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveVersion {
    pub major: u32,
    pub minor: u32,
}

impl SaveVersion {
    /// 当前版本
    pub fn current() -> Self {
        Self {
            major: SAVE_VERSION_MAJOR,
            minor: SAVE_VERSION_MINOR,
        }
    }

    /// 检查是否兼容（major 必须相同）
    pub fn is_compatible(&self) -> bool {
        self.major == SAVE_VERSION_MAJOR
    }
}

impl Default for SaveVersion {
    fn default() -> Self {
        Self::current()
    }
}

impl std::fmt::Display for SaveVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// 存档记录
///
/// 字段按原样反序列化，校验推迟到 [`SaveRecord::to_position`]。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRecord {
    /// 存档格式版本
    #[serde(default)]
    pub version: SaveVersion,
    /// 剧本文件名
    #[serde(default)]
    pub scenario_name: String,
    /// 玩家名
    #[serde(default)]
    pub player_name: String,
    /// 场景索引
    #[serde(default)]
    pub scenario_scene: Option<usize>,
}

impl SaveRecord {
    /// 由播放位置创建存档记录
    pub fn from_position(position: &PlaybackPosition) -> Self {
        Self {
            version: SaveVersion::current(),
            scenario_name: position.scenario_name.clone(),
            player_name: position.player_name.clone(),
            scenario_scene: Some(position.scene_index),
        }
    }

    /// 校验并转换为播放位置
    pub fn to_position(&self) -> Result<PlaybackPosition, SaveError> {
        if self.scenario_name.is_empty() {
            return Err(SaveError::MissingField("scenario_name"));
        }
        if self.player_name.is_empty() {
            return Err(SaveError::MissingField("player_name"));
        }
        let scene_index = self
            .scenario_scene
            .ok_or(SaveError::MissingField("scenario_scene"))?;

        Ok(PlaybackPosition::new(
            self.scenario_name.as_str(),
            self.player_name.as_str(),
            scene_index,
        ))
    }

    /// 序列化为 JSON 字符串
    pub fn to_json(&self) -> Result<String, SaveError> {
        serde_json::to_string_pretty(self).map_err(|e| SaveError::SerializationFailed(e.to_string()))
    }

    /// 从 JSON 字符串反序列化
    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        let record: SaveRecord = serde_json::from_str(json)
            .map_err(|e| SaveError::DeserializationFailed(e.to_string()))?;

        if !record.version.is_compatible() {
            return Err(SaveError::IncompatibleVersion {
                save_version: record.version.to_string(),
                current_version: SaveVersion::current().to_string(),
            });
        }

        Ok(record)
    }
}

/// 存档错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SaveError {
    /// 缺少必需字段
    #[error("存档缺少字段: {0}")]
    MissingField(&'static str),
    /// 引用的剧本不存在
    #[error("存档引用的剧本 '{0}' 不存在")]
    UnknownScenario(String),
    /// 场景索引越界
    #[error("存档的场景索引 {index} 超出剧本范围（共 {len} 个场景）")]
    SceneOutOfRange { index: usize, len: usize },
    /// 序列化失败
    #[error("序列化失败: {0}")]
    SerializationFailed(String),
    /// 反序列化失败
    #[error("反序列化失败: {0}")]
    DeserializationFailed(String),
    /// 版本不兼容
    #[error("存档版本不兼容: 存档版本 {save_version} vs 当前版本 {current_version}")]
    IncompatibleVersion {
        save_version: String,
        current_version: String,
    },
    /// 文件操作失败
    #[error("文件操作失败: {0}")]
    IoError(String),
    /// 存档不存在
    #[error("存档不存在: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_version_compatibility() {
        assert!(SaveVersion::current().is_compatible());
        assert!(SaveVersion { major: 1, minor: 7 }.is_compatible());
        assert!(!SaveVersion { major: 2, minor: 0 }.is_compatible());
    }

    #[test]
    fn test_record_round_trip() {
        let position = PlaybackPosition::new("main.sc", "Alex", 3);
        let json = SaveRecord::from_position(&position).to_json().unwrap();
        assert!(json.contains("\"scenario_scene\": 3"));

        let loaded = SaveRecord::from_json(&json).unwrap();
        assert_eq!(loaded.to_position().unwrap(), position);
    }

    #[test]
    fn test_missing_fields_rejected() {
        let record = SaveRecord::from_json(r#"{ "player_name": "Alex", "scenario_scene": 1 }"#).unwrap();
        assert_eq!(
            record.to_position(),
            Err(SaveError::MissingField("scenario_name"))
        );

        let record = SaveRecord::from_json(
            r#"{ "scenario_name": "main.sc", "player_name": "", "scenario_scene": 1 }"#,
        )
        .unwrap();
        assert_eq!(
            record.to_position(),
            Err(SaveError::MissingField("player_name"))
        );

        // 场景索引不使用默认值
        let record =
            SaveRecord::from_json(r#"{ "scenario_name": "main.sc", "player_name": "Alex" }"#).unwrap();
        assert_eq!(
            record.to_position(),
            Err(SaveError::MissingField("scenario_scene"))
        );
    }

    #[test]
    fn test_incompatible_version_error() {
        let json = r#"{
            "version": { "major": 99, "minor": 0 },
            "scenario_name": "main.sc",
            "player_name": "Alex",
            "scenario_scene": 0
        }"#;

        let result = SaveRecord::from_json(json);
        assert!(matches!(result, Err(SaveError::IncompatibleVersion { .. })));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SaveRecord::from_json("[scenario]"),
            Err(SaveError::DeserializationFailed(_))
        ));
        // 负数索引无法解析为 usize
        assert!(matches!(
            SaveRecord::from_json(r#"{ "scenario_scene": -1 }"#),
            Err(SaveError::DeserializationFailed(_))
        ));
    }
}
