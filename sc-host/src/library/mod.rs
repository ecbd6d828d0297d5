//! # Library 模块
//!
//! 游戏目录的扫描与剧本文件管理。
//!
//! ## 目录布局
//!
//! ```text
//! game/
//! ├── scenarios/      *.sc
//! ├── textures/<stem>/*.png
//! ├── sounds/         *.mp3 / *.ogg（全局音乐注册表）
//! ├── saves/          *.savegame
//! └── translations/   *.lang
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::AppConfig;
use crate::error::{HostError, HostResult};
use sc_runtime::{MusicRegistry, ScenarioDescriptor, Scene, SceneLayout, blank_scenario, write_scenario};

/// 剧本文件扩展名
pub const SCENARIO_EXTENSION: &str = "sc";

/// 支持的音频扩展名
pub const MUSIC_EXTENSIONS: [&str; 2] = ["mp3", "ogg"];

/// 游戏目录集合
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDirs {
    pub scenarios: PathBuf,
    pub textures: PathBuf,
    pub sounds: PathBuf,
    pub saves: PathBuf,
    pub translations: PathBuf,
}

impl GameDirs {
    /// 由配置生成目录集合
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            scenarios: config.scenarios_dir(),
            textures: config.textures_dir(),
            sounds: config.sounds_dir(),
            saves: config.saves_dir(),
            translations: config.translations_dir(),
        }
    }

    /// 创建缺失的目录
    pub fn ensure_all(&self) -> HostResult<()> {
        for dir in [
            &self.scenarios,
            &self.textures,
            &self.sounds,
            &self.saves,
            &self.translations,
        ] {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| HostError::io(dir, e))?;
                debug!(dir = %dir.display(), "创建目录");
            }
        }
        Ok(())
    }
}

/// 剧本库
#[derive(Debug, Clone)]
pub struct ScenarioLibrary {
    dirs: GameDirs,
}

impl ScenarioLibrary {
    /// 创建剧本库
    pub fn new(dirs: GameDirs) -> Self {
        Self { dirs }
    }

    /// 目录集合
    pub fn dirs(&self) -> &GameDirs {
        &self.dirs
    }

    /// 扫描剧本目录，返回按文件名排序的描述列表
    pub fn scan_scenarios(&self) -> Vec<ScenarioDescriptor> {
        let descriptors: Vec<ScenarioDescriptor> = files_with_extensions(
            &self.dirs.scenarios,
            &[SCENARIO_EXTENSION],
        )
        .into_iter()
        .filter_map(|path| {
            let file_name = path.file_name()?.to_string_lossy().to_string();
            Some(self.descriptor_for(&file_name, path))
        })
        .collect();

        info!(count = descriptors.len(), "剧本扫描完成");
        descriptors
    }

    /// 扫描音频目录，建立全局音乐注册表（名称为去掉扩展名的文件名）
    pub fn scan_music(&self) -> MusicRegistry<PathBuf> {
        let registry: MusicRegistry<PathBuf> =
            files_with_extensions(&self.dirs.sounds, &MUSIC_EXTENSIONS)
                .into_iter()
                .filter_map(|path| {
                    let name = path.file_stem()?.to_string_lossy().to_string();
                    Some((name, path))
                })
                .collect();

        info!(count = registry.len(), "音乐扫描完成");
        registry
    }

    /// 新建剧本文件（写入一个空白场景），同时创建纹理目录
    ///
    /// 名称可以省略 `.sc` 扩展名。已存在的剧本不会被覆盖。
    pub fn create_scenario(&self, name: &str, layout: SceneLayout) -> HostResult<ScenarioDescriptor> {
        let file_name = normalize_scenario_name(name)?;
        let path = self.dirs.scenarios.join(&file_name);
        if path.exists() {
            return Err(HostError::ScenarioExists(file_name));
        }

        fs::create_dir_all(&self.dirs.scenarios)
            .map_err(|e| HostError::io(&self.dirs.scenarios, e))?;
        fs::write(&path, blank_scenario(layout)).map_err(|e| HostError::io(&path, e))?;

        let descriptor = self.descriptor_for(&file_name, path);
        fs::create_dir_all(&descriptor.textures_dir)
            .map_err(|e| HostError::io(&descriptor.textures_dir, e))?;

        info!(scenario = %file_name, "新建剧本");
        Ok(descriptor)
    }

    /// 把编辑后的场景写回剧本文件
    pub fn save_scenario(
        &self,
        file_name: &str,
        scenes: &[Scene],
        layout: SceneLayout,
    ) -> HostResult<PathBuf> {
        let path = self.dirs.scenarios.join(file_name);
        fs::write(&path, write_scenario(scenes, layout)).map_err(|e| HostError::io(&path, e))?;
        info!(scenario = %file_name, scenes = scenes.len(), "剧本已保存");
        Ok(path)
    }

    fn descriptor_for(&self, file_name: &str, file_path: PathBuf) -> ScenarioDescriptor {
        let stem = Path::new(file_name)
            .file_stem()
            .map_or_else(|| file_name.to_string(), |s| s.to_string_lossy().to_string());
        ScenarioDescriptor::new(
            file_name,
            file_path,
            self.dirs.textures.join(&stem),
            self.dirs.sounds.join(&stem),
        )
    }
}

/// 规范化剧本名：补全扩展名，拒绝空名和路径
pub fn normalize_scenario_name(name: &str) -> HostResult<String> {
    let name = name.trim();
    let invalid = name.is_empty()
        || name.contains(['/', '\\', ':'])
        || name == format!(".{SCENARIO_EXTENSION}");
    if invalid {
        return Err(HostError::InvalidScenarioName(name.to_string()));
    }

    let suffix = format!(".{SCENARIO_EXTENSION}");
    if name.ends_with(&suffix) {
        Ok(name.to_string())
    } else {
        Ok(format!("{name}{suffix}"))
    }
}

/// 列出目录下（不递归）指定扩展名的文件，按文件名排序
pub(crate) fn files_with_extensions(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "目录不存在");
        return Vec::new();
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension().is_some_and(|ext| {
                extensions
                    .iter()
                    .any(|wanted| ext.eq_ignore_ascii_case(wanted))
            })
        })
        .collect()
}
