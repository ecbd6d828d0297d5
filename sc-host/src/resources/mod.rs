//! # Resources 模块
//!
//! 文件系统上的剧本与纹理读取。
//!
//! 纹理只读取图片尺寸并保存路径，像素数据由渲染后端按需加载。

mod error;
mod source;

pub use error::ResourceError;
pub use source::{FsScenarioSource, TEXTURE_EXTENSION, TextureHandle};
