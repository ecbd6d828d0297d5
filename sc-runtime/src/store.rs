//! # Store 模块
//!
//! 剧本仓库：保存扫描得到的全部剧本描述，并在首次需要时加载场景与纹理。
//!
//! ## 设计原则
//!
//! - 描述列表只在重新扫描时整体替换
//! - 加载是幂等的：已加载的剧本不会重复读取
//! - 纹理随剧本一起持有，`unload_all` 统一释放
//! - 读取失败不是错误：剧本以空场景列表继续，原因记入 [`LoadReport`]

use std::collections::HashMap;
use std::fmt::Display;
use std::path::PathBuf;

use crate::scene::Scene;
use crate::script::Parser;

/// 剧本描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioDescriptor {
    /// 文件名（如 `main.sc`），剧本的唯一标识
    pub file_name: String,
    /// 剧本文件路径
    pub file_path: PathBuf,
    /// 纹理目录（`textures/<stem>/`）
    pub textures_dir: PathBuf,
    /// 音频目录（`sounds/<stem>/`）
    pub sounds_dir: PathBuf,
    /// 是否已加载
    pub loaded: bool,
}

impl ScenarioDescriptor {
    /// 创建未加载的描述
    pub fn new(
        file_name: impl Into<String>,
        file_path: impl Into<PathBuf>,
        textures_dir: impl Into<PathBuf>,
        sounds_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            file_path: file_path.into(),
            textures_dir: textures_dir.into(),
            sounds_dir: sounds_dir.into(),
            loaded: false,
        }
    }

    /// 不含扩展名的文件名
    pub fn stem(&self) -> &str {
        self.file_name
            .rsplit_once('.')
            .map_or(self.file_name.as_str(), |(stem, _)| stem)
    }
}

/// 剧本内容来源
///
/// 由 Host 实现（文件系统等），Runtime 本身不做 IO。
pub trait ScenarioSource {
    /// 纹理句柄类型
    type Texture;
    /// 读取错误类型
    type Error: Display;

    /// 读取剧本全文
    fn read_scenario(&self, descriptor: &ScenarioDescriptor) -> Result<String, Self::Error>;

    /// 加载剧本纹理目录下的全部纹理，返回 (名称, 句柄)
    fn load_textures(
        &self,
        descriptor: &ScenarioDescriptor,
    ) -> Result<Vec<(String, Self::Texture)>, Self::Error>;
}

/// 单次加载的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// 是否实际执行了加载（已加载时为 false）
    pub performed: bool,
    /// 场景数量
    pub scene_count: usize,
    /// 纹理数量
    pub texture_count: usize,
    /// 被容错跳过的行数
    pub skipped_lines: usize,
    /// 读取失败信息
    pub warnings: Vec<String>,
}

/// 已登记的剧本
#[derive(Debug)]
pub struct Scenario<T> {
    /// 描述
    pub descriptor: ScenarioDescriptor,
    scenes: Vec<Scene>,
    textures: HashMap<String, T>,
}

impl<T> Scenario<T> {
    fn new(descriptor: ScenarioDescriptor) -> Self {
        Self {
            descriptor,
            scenes: Vec::new(),
            textures: HashMap::new(),
        }
    }

    /// 场景列表
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// 可编辑的场景列表（编辑器使用）
    pub fn scenes_mut(&mut self) -> &mut Vec<Scene> {
        &mut self.scenes
    }

    /// 按名称查找纹理
    pub fn texture(&self, name: &str) -> Option<&T> {
        self.textures.get(name)
    }

    /// 纹理数量
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn unload(&mut self) {
        self.scenes.clear();
        self.textures.clear();
        self.descriptor.loaded = false;
    }
}

/// 剧本仓库
#[derive(Debug)]
pub struct ScenarioStore<T> {
    scenarios: Vec<Scenario<T>>,
}

impl<T> Default for ScenarioStore<T> {
    fn default() -> Self {
        Self {
            scenarios: Vec::new(),
        }
    }
}

impl<T> ScenarioStore<T> {
    /// 由扫描结果创建仓库
    pub fn new(descriptors: Vec<ScenarioDescriptor>) -> Self {
        Self {
            scenarios: descriptors.into_iter().map(Scenario::new).collect(),
        }
    }

    /// 用新的扫描结果整体替换
    pub fn replace(&mut self, descriptors: Vec<ScenarioDescriptor>) {
        *self = Self::new(descriptors);
    }

    /// 剧本数量
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// 全部剧本描述
    pub fn descriptors(&self) -> impl Iterator<Item = &ScenarioDescriptor> {
        self.scenarios.iter().map(|s| &s.descriptor)
    }

    /// 按文件名查找剧本索引
    pub fn find_index(&self, file_name: &str) -> Option<usize> {
        self.scenarios
            .iter()
            .position(|s| s.descriptor.file_name == file_name)
    }

    /// 获取剧本
    pub fn get(&self, index: usize) -> Option<&Scenario<T>> {
        self.scenarios.get(index)
    }

    /// 获取可变剧本
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Scenario<T>> {
        self.scenarios.get_mut(index)
    }

    /// 确保剧本已加载
    ///
    /// 索引越界时返回 `None`；已加载时不做任何事。
    pub fn ensure_loaded<S>(
        &mut self,
        index: usize,
        parser: &Parser,
        source: &S,
    ) -> Option<LoadReport>
    where
        S: ScenarioSource<Texture = T>,
    {
        let scenario = self.scenarios.get_mut(index)?;
        if scenario.descriptor.loaded {
            return Some(LoadReport::default());
        }

        let mut report = LoadReport {
            performed: true,
            ..Default::default()
        };

        match source.load_textures(&scenario.descriptor) {
            Ok(textures) => scenario.textures = textures.into_iter().collect(),
            Err(e) => report.warnings.push(format!("纹理加载失败: {e}")),
        }

        match source.read_scenario(&scenario.descriptor) {
            Ok(text) => {
                let parsed = parser.parse_with_report(&text);
                report.skipped_lines = parsed.skipped_lines.len();
                scenario.scenes = parsed.scenes;
            }
            Err(e) => report.warnings.push(format!("剧本读取失败: {e}")),
        }

        scenario.descriptor.loaded = true;
        report.scene_count = scenario.scenes.len();
        report.texture_count = scenario.textures.len();
        Some(report)
    }

    /// 释放全部已加载内容
    pub fn unload_all(&mut self) {
        for scenario in &mut self.scenarios {
            scenario.unload();
        }
    }
}


#[cfg(test)]
mod tests {
    use super::memory::MemorySource;
    use super::*;
    use crate::script::SceneLayout;

    const ONE_SCENE: &str = "[scene_start]\nbg:NONE:NONE\n[scene_end]\n";

    fn source() -> MemorySource {
        MemorySource::default()
            .with_scenario("main.sc", ONE_SCENE)
            .with_scenario("side.sc", &ONE_SCENE.repeat(2))
            .with_textures("main.sc", &["bg", "monika"])
    }

    #[test]
    fn test_find_index() {
        let source = source();
        let store: ScenarioStore<String> = ScenarioStore::new(source.descriptors());

        assert_eq!(store.len(), 2);
        assert_eq!(store.find_index("main.sc"), Some(0));
        assert_eq!(store.find_index("side.sc"), Some(1));
        assert_eq!(store.find_index("missing.sc"), None);
    }

    #[test]
    fn test_ensure_loaded_is_idempotent() {
        let source = source();
        let parser = Parser::new(SceneLayout::Simple);
        let mut store = ScenarioStore::new(source.descriptors());

        let report = store.ensure_loaded(0, &parser, &source).unwrap();
        assert!(report.performed);
        assert_eq!(report.scene_count, 1);
        assert_eq!(report.texture_count, 2);

        let again = store.ensure_loaded(0, &parser, &source).unwrap();
        assert!(!again.performed);
        assert_eq!(source.reads.get(), 1);

        let scenario = store.get(0).unwrap();
        assert!(scenario.descriptor.loaded);
        assert_eq!(scenario.texture("bg").map(String::as_str), Some("main.sc/bg"));
        assert!(scenario.texture("missing").is_none());
    }

    #[test]
    fn test_unreadable_scenario_loads_empty() {
        let source = source();
        let parser = Parser::new(SceneLayout::Simple);
        let mut descriptors = source.descriptors();
        descriptors.push(ScenarioDescriptor::new(
            "gone.sc",
            "scenarios/gone.sc",
            "textures/gone",
            "sounds/gone",
        ));
        let mut store = ScenarioStore::new(descriptors);

        let report = store.ensure_loaded(2, &parser, &source).unwrap();
        assert_eq!(report.scene_count, 0);
        assert_eq!(report.warnings.len(), 1);
        assert!(store.get(2).unwrap().descriptor.loaded);

        assert!(store.ensure_loaded(9, &parser, &source).is_none());
    }

    #[test]
    fn test_unload_all() {
        let source = source();
        let parser = Parser::new(SceneLayout::Simple);
        let mut store = ScenarioStore::new(source.descriptors());
        store.ensure_loaded(0, &parser, &source);
        store.ensure_loaded(1, &parser, &source);

        store.unload_all();

        for index in 0..store.len() {
            let scenario = store.get(index).unwrap();
            assert!(!scenario.descriptor.loaded);
            assert!(scenario.scenes().is_empty());
            assert_eq!(scenario.texture_count(), 0);
        }

        // 卸载后可以重新加载
        let report = store.ensure_loaded(1, &parser, &source).unwrap();
        assert_eq!(report.scene_count, 2);
    }

    #[test]
    fn test_descriptor_stem() {
        let d = ScenarioDescriptor::new("chapter.one.sc", "a", "b", "c");
        assert_eq!(d.stem(), "chapter.one");
        let d = ScenarioDescriptor::new("noext", "a", "b", "c");
        assert_eq!(d.stem(), "noext");
    }
}
