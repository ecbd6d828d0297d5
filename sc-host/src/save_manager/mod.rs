//! # SaveManager 模块
//!
//! 存档文件管理，负责存档的读写和列举。
//!
//! ## 文件布局
//!
//! ```text
//! saves/
//! ├── autosave.savegame
//! ├── main 2026-01-02 18-30-00.savegame
//! └── ...
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info};

use crate::library::files_with_extensions;
use sc_runtime::{SaveError, SaveRecord};

/// 存档文件扩展名
pub const SAVE_EXTENSION: &str = "savegame";

/// 自动存档名
pub const AUTOSAVE_NAME: &str = "autosave";

/// 存档管理器
pub struct SaveManager {
    /// 存档目录
    saves_dir: PathBuf,
}

impl SaveManager {
    /// 创建存档管理器
    ///
    /// # 参数
    ///
    /// - `saves_dir`: 存档目录路径
    pub fn new(saves_dir: impl AsRef<Path>) -> Self {
        let saves_dir = saves_dir.as_ref().to_path_buf();
        Self { saves_dir }
    }

    /// 确保存档目录存在
    pub fn ensure_dir(&self) -> Result<(), SaveError> {
        if !self.saves_dir.exists() {
            fs::create_dir_all(&self.saves_dir)
                .map_err(|e| SaveError::IoError(format!("无法创建存档目录: {}", e)))?;
        }
        Ok(())
    }

    /// 获取存档文件路径
    pub fn save_path(&self, name: &str) -> PathBuf {
        self.saves_dir
            .join(format!("{}.{SAVE_EXTENSION}", sanitize_save_name(name)))
    }

    /// 保存存档，返回文件路径
    pub fn save(&self, name: &str, record: &SaveRecord) -> Result<PathBuf, SaveError> {
        self.ensure_dir()?;

        let path = self.save_path(name);
        let json = record.to_json()?;
        fs::write(&path, json)
            .map_err(|e| SaveError::IoError(format!("无法写入存档文件: {}", e)))?;

        info!(path = %path.display(), "存档保存成功");
        Ok(path)
    }

    /// 写入自动存档
    pub fn autosave(&self, record: &SaveRecord) -> Result<PathBuf, SaveError> {
        let path = self.save(AUTOSAVE_NAME, record)?;
        debug!(scene = ?record.scenario_scene, "自动存档");
        Ok(path)
    }

    /// 读取存档
    pub fn load(&self, name: &str) -> Result<SaveRecord, SaveError> {
        let path = self.save_path(name);

        if !path.exists() {
            return Err(SaveError::NotFound(path.to_string_lossy().to_string()));
        }

        let json = fs::read_to_string(&path)
            .map_err(|e| SaveError::IoError(format!("无法读取存档文件: {}", e)))?;
        let record = SaveRecord::from_json(&json)?;

        info!(path = %path.display(), "存档读取成功");
        Ok(record)
    }

    /// 删除存档
    pub fn delete(&self, name: &str) -> Result<(), SaveError> {
        let path = self.save_path(name);

        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| SaveError::IoError(format!("无法删除存档文件: {}", e)))?;
            info!(path = %path.display(), "存档删除成功");
        }

        Ok(())
    }

    /// 检查存档是否存在
    pub fn exists(&self, name: &str) -> bool {
        self.save_path(name).exists()
    }

    /// 列出所有存档名（按文件名排序）
    pub fn list_saves(&self) -> Vec<String> {
        files_with_extensions(&self.saves_dir, &[SAVE_EXTENSION])
            .into_iter()
            .filter_map(|path| Some(path.file_stem()?.to_string_lossy().to_string()))
            .collect()
    }

    /// 获取存档信息（不合法的存档返回 None）
    pub fn get_save_info(&self, name: &str) -> Option<SaveInfo> {
        let record = self.load(name).ok()?;
        let position = record.to_position().ok()?;
        Some(SaveInfo {
            name: name.to_string(),
            scenario_name: position.scenario_name,
            player_name: position.player_name,
            scene_index: position.scene_index,
        })
    }
}

/// 默认存档名：`<剧本名> <日期> <时间>`
pub fn default_save_name(scenario_name: &str) -> String {
    let stem = Path::new(scenario_name)
        .file_stem()
        .map_or_else(|| scenario_name.to_string(), |s| s.to_string_lossy().to_string());
    format!("{stem} {}", Local::now().format("%Y-%m-%d %H-%M-%S"))
}

/// 把存档名中不能出现在文件名里的字符替换为 `_`
fn sanitize_save_name(name: &str) -> String {
    let name: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();

    if name.is_empty() || name.chars().all(|c| c == '.') {
        AUTOSAVE_NAME.to_string()
    } else {
        name
    }
}

/// 存档信息（用于存档列表显示）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveInfo {
    pub name: String,
    pub scenario_name: String,
    pub player_name: String,
    pub scene_index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_runtime::PlaybackPosition;

    fn record(scenario: &str, scene: usize) -> SaveRecord {
        SaveRecord::from_position(&PlaybackPosition::new(scenario, "Alex", scene))
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::new(dir.path().join("saves"));

        let path = manager.save("first", &record("main.sc", 3)).unwrap();
        assert_eq!(path, dir.path().join("saves").join("first.savegame"));
        assert!(manager.exists("first"));

        let loaded = manager.load("first").unwrap();
        assert_eq!(loaded, record("main.sc", 3));
    }

    #[test]
    fn test_save_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::new(dir.path());

        let result = manager.load("missing");
        assert!(matches!(result, Err(SaveError::NotFound(_))));
    }

    #[test]
    fn test_list_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::new(dir.path());

        for name in ["b", "a", "c"] {
            manager.save(name, &record("main.sc", 0)).unwrap();
        }
        fs::write(dir.path().join("readme.txt"), "ignored").unwrap();
        assert_eq!(manager.list_saves(), vec!["a", "b", "c"]);

        manager.delete("b").unwrap();
        assert_eq!(manager.list_saves(), vec!["a", "c"]);
        // 删除不存在的存档不是错误
        manager.delete("b").unwrap();
    }

    #[test]
    fn test_save_info_skips_invalid_saves() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::new(dir.path());

        manager.autosave(&record("main.sc", 2)).unwrap();
        fs::write(
            manager.save_path("broken"),
            r#"{ "scenario_name": "main.sc", "player_name": "Alex" }"#,
        )
        .unwrap();

        let info = manager.get_save_info(AUTOSAVE_NAME).unwrap();
        assert_eq!(info.scenario_name, "main.sc");
        assert_eq!(info.scene_index, 2);
        assert_eq!(manager.get_save_info("broken"), None);
    }

    #[test]
    fn test_save_names_are_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::new(dir.path());

        assert_eq!(
            manager.save_path("../evil"),
            dir.path().join(".._evil.savegame")
        );
        assert_eq!(manager.save_path("  "), dir.path().join("autosave.savegame"));
    }

    #[test]
    fn test_default_save_name() {
        let name = default_save_name("chapter2.sc");
        assert!(name.starts_with("chapter2 "));
        assert!(!name.contains(':'));
    }
}
