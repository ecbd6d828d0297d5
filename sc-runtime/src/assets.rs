//! # Assets 模块
//!
//! 将场景中的符号名解析为素材句柄。
//!
//! - 纹理：按当前剧本查找，或在故事模式下固定查找共享剧本
//! - 音乐：全局扁平注册表，不区分剧本
//!
//! 名称为 `None` 或未找到时返回 `None`，调用方应当“什么都不画/不播”。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::store::ScenarioStore;

/// 故事模式下纹理统一来源的剧本
pub const SHARED_SCENARIO_NAME: &str = "main.sc";

/// 纹理查找方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureLookup {
    /// 在当前剧本的纹理中查找
    #[default]
    PerScenario,
    /// 始终在 [`SHARED_SCENARIO_NAME`] 的纹理中查找
    Shared,
}

/// 素材解析器
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetResolver {
    lookup: TextureLookup,
}

impl AssetResolver {
    /// 创建解析器
    pub fn new(lookup: TextureLookup) -> Self {
        Self { lookup }
    }

    /// 纹理查找方式
    pub fn lookup(&self) -> TextureLookup {
        self.lookup
    }

    /// 纹理实际来源的剧本索引
    pub fn texture_scenario<T>(
        &self,
        store: &ScenarioStore<T>,
        active: Option<usize>,
    ) -> Option<usize> {
        match self.lookup {
            TextureLookup::PerScenario => active,
            TextureLookup::Shared => store.find_index(SHARED_SCENARIO_NAME),
        }
    }

    /// 解析纹理
    pub fn texture<'a, T>(
        &self,
        store: &'a ScenarioStore<T>,
        active: Option<usize>,
        name: Option<&str>,
    ) -> Option<&'a T> {
        let name = name?;
        let index = self.texture_scenario(store, active)?;
        store.get(index)?.texture(name)
    }

    /// 解析音乐
    pub fn music<'a, M>(&self, registry: &'a MusicRegistry<M>, name: Option<&str>) -> Option<&'a M> {
        registry.get(name?)
    }
}

/// 全局音乐注册表（名称 → 句柄）
#[derive(Debug, Clone)]
pub struct MusicRegistry<M> {
    tracks: HashMap<String, M>,
}

impl<M> Default for MusicRegistry<M> {
    fn default() -> Self {
        Self {
            tracks: HashMap::new(),
        }
    }
}

impl<M> MusicRegistry<M> {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记音轨，同名覆盖并返回旧值
    pub fn insert(&mut self, name: impl Into<String>, track: M) -> Option<M> {
        self.tracks.insert(name.into(), track)
    }

    /// 按名称查找
    pub fn get(&self, name: &str) -> Option<&M> {
        self.tracks.get(name)
    }

    /// 音轨数量
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// 全部音轨名（已排序）
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tracks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<M> FromIterator<(String, M)> for MusicRegistry<M> {
    fn from_iter<I: IntoIterator<Item = (String, M)>>(iter: I) -> Self {
        Self {
            tracks: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{Parser, SceneLayout};
    use crate::store::memory::MemorySource;

    fn loaded_store() -> ScenarioStore<String> {
        let source = MemorySource::default()
            .with_scenario("chapter.sc", "")
            .with_scenario("main.sc", "")
            .with_textures("main.sc", &["shared_bg"])
            .with_textures("chapter.sc", &["local_bg"]);
        let parser = Parser::new(SceneLayout::Simple);
        let mut store = ScenarioStore::new(source.descriptors());
        for index in 0..store.len() {
            store.ensure_loaded(index, &parser, &source);
        }
        store
    }

    #[test]
    fn test_per_scenario_lookup() {
        let store = loaded_store();
        let resolver = AssetResolver::new(TextureLookup::PerScenario);
        let chapter = store.find_index("chapter.sc");

        assert_eq!(
            resolver.texture(&store, chapter, Some("local_bg")).map(String::as_str),
            Some("chapter.sc/local_bg")
        );
        assert!(resolver.texture(&store, chapter, Some("shared_bg")).is_none());
        assert!(resolver.texture(&store, chapter, None).is_none());
        assert!(resolver.texture(&store, None, Some("local_bg")).is_none());
    }

    #[test]
    fn test_shared_lookup_ignores_active_scenario() {
        let store = loaded_store();
        let resolver = AssetResolver::new(TextureLookup::Shared);
        let chapter = store.find_index("chapter.sc");

        assert_eq!(
            resolver.texture(&store, chapter, Some("shared_bg")).map(String::as_str),
            Some("main.sc/shared_bg")
        );
        assert!(resolver.texture(&store, chapter, Some("local_bg")).is_none());
        assert!(resolver.texture(&store, None, Some("shared_bg")).is_some());
    }

    #[test]
    fn test_music_lookup() {
        let registry: MusicRegistry<u32> =
            [("theme".to_string(), 1), ("rain".to_string(), 2)].into_iter().collect();
        let resolver = AssetResolver::default();

        assert_eq!(resolver.music(&registry, Some("rain")), Some(&2));
        assert_eq!(resolver.music(&registry, Some("unknown")), None);
        assert_eq!(resolver.music(&registry, None), None);
        assert_eq!(registry.names(), vec!["rain", "theme"]);
    }
}
