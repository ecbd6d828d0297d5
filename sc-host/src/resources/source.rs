//! # Resource Source 模块
//!
//! 文件系统剧本来源。
//!
//! ## 目录约定
//!
//! ```text
//! <scenarios>/<name>.sc          剧本文件
//! <textures>/<stem>/*.png        剧本专属纹理，纹理名为去掉扩展名的文件名
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::ResourceError;
use sc_runtime::{ScenarioDescriptor, ScenarioSource};

/// 纹理文件扩展名
pub const TEXTURE_EXTENSION: &str = "png";

/// 纹理句柄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureHandle {
    /// 纹理名
    pub name: String,
    /// 图片路径
    pub path: PathBuf,
    /// 宽度（像素）
    pub width: u32,
    /// 高度（像素）
    pub height: u32,
}

/// 文件系统剧本来源
#[derive(Debug, Clone, Copy, Default)]
pub struct FsScenarioSource;

impl FsScenarioSource {
    /// 创建文件系统剧本来源
    pub fn new() -> Self {
        Self
    }

    fn load_texture(path: &Path) -> Option<TextureHandle> {
        let name = path.file_stem()?.to_string_lossy().to_string();
        match image::image_dimensions(path) {
            Ok((width, height)) => Some(TextureHandle {
                name,
                path: path.to_path_buf(),
                width,
                height,
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "纹理无法解码，已跳过");
                None
            }
        }
    }
}

impl ScenarioSource for FsScenarioSource {
    type Texture = TextureHandle;
    type Error = ResourceError;

    fn read_scenario(&self, descriptor: &ScenarioDescriptor) -> Result<String, ResourceError> {
        let path = &descriptor.file_path;
        if !path.exists() {
            return Err(ResourceError::NotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        std::fs::read_to_string(path).map_err(|e| ResourceError::LoadFailed {
            path: path.to_string_lossy().to_string(),
            kind: "scenario".to_string(),
            message: e.to_string(),
        })
    }

    fn load_textures(
        &self,
        descriptor: &ScenarioDescriptor,
    ) -> Result<Vec<(String, TextureHandle)>, ResourceError> {
        let dir = &descriptor.textures_dir;
        if !dir.is_dir() {
            // 没有纹理目录的剧本只是没有图片
            debug!(dir = %dir.display(), "纹理目录不存在");
            return Ok(Vec::new());
        }

        let mut textures = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ResourceError::LoadFailed {
                path: dir.to_string_lossy().to_string(),
                kind: "texture".to_string(),
                message: e.to_string(),
            })?;

            let path = entry.path();
            let is_texture = entry.file_type().is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(TEXTURE_EXTENSION));
            if !is_texture {
                continue;
            }

            if let Some(texture) = Self::load_texture(path) {
                textures.push((texture.name.clone(), texture));
            }
        }

        Ok(textures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(root: &Path) -> ScenarioDescriptor {
        ScenarioDescriptor::new(
            "main.sc",
            root.join("scenarios/main.sc"),
            root.join("textures/main"),
            root.join("sounds/main"),
        )
    }

    #[test]
    fn test_read_missing_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let result = FsScenarioSource::new().read_scenario(&descriptor(dir.path()));
        assert!(matches!(result, Err(ResourceError::NotFound { .. })));
    }

    #[test]
    fn test_missing_texture_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let textures = FsScenarioSource::new()
            .load_textures(&descriptor(dir.path()))
            .unwrap();
        assert!(textures.is_empty());
    }

    #[test]
    fn test_load_textures_reads_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let textures_dir = dir.path().join("textures/main");
        std::fs::create_dir_all(&textures_dir).unwrap();

        image::RgbaImage::new(4, 3)
            .save(textures_dir.join("park.png"))
            .unwrap();
        std::fs::write(textures_dir.join("broken.png"), b"not an image").unwrap();
        std::fs::write(textures_dir.join("notes.txt"), b"ignored").unwrap();

        let textures = FsScenarioSource::new()
            .load_textures(&descriptor(dir.path()))
            .unwrap();

        assert_eq!(textures.len(), 1);
        let (name, handle) = &textures[0];
        assert_eq!(name, "park");
        assert_eq!((handle.width, handle.height), (4, 3));
        assert_eq!(handle.path, textures_dir.join("park.png"));
    }
}
