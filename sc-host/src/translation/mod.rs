//! # Translation 模块
//!
//! 菜单文字的翻译表（`*.lang`）。
//!
//! ## 文件格式
//!
//! ```text
//! Русский            ← 第 0 行：语言名
//! ru_RU.UTF-8        ← 第 1 行：区域/代码页
//! Main menu=Главное меню
//! ...
//! ```
//!
//! 前两行不能包含 `=`，其余每行必须恰好包含一个 `=`，不符合的行被忽略。
//! 缺少语言名、代码页或没有任何词条的文件无效。

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::library::files_with_extensions;

/// 翻译文件扩展名
pub const LANGUAGE_EXTENSION: &str = "lang";

/// 单个语言
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    /// 语言名
    pub name: String,
    /// 区域/代码页
    pub codepage: String,
    strings: HashMap<String, String>,
}

impl Language {
    /// 解析翻译文件内容，无效时返回 `None`
    pub fn parse(text: &str) -> Option<Self> {
        let mut name = None;
        let mut codepage = None;
        let mut strings = HashMap::new();

        for (index, line) in text.lines().enumerate() {
            let parts: Vec<&str> = line.split('=').collect();
            match (index, parts.as_slice()) {
                (0, [value]) => name = Some(value.to_string()),
                (1, [value]) => codepage = Some(value.to_string()),
                (i, [original, translation]) if i > 1 => {
                    strings.insert(original.to_string(), translation.to_string());
                }
                _ => {}
            }
        }

        if strings.is_empty() {
            return None;
        }

        Some(Self {
            name: name?,
            codepage: codepage?,
            strings,
        })
    }

    /// 翻译文字，没有词条时返回原文
    pub fn translate<'a>(&'a self, original: &'a str) -> &'a str {
        self.strings
            .get(original)
            .map_or(original, String::as_str)
    }

    /// 词条数量
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// 是否没有词条
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// 全部已加载的语言
#[derive(Debug, Clone, Default)]
pub struct Translations {
    languages: Vec<Language>,
}

impl Translations {
    /// 创建空翻译表
    pub fn new() -> Self {
        Self::default()
    }

    /// 加载目录下的全部 `*.lang` 文件，无效文件被跳过
    pub fn load_dir(dir: &Path) -> Self {
        let mut translations = Self::new();

        for path in files_with_extensions(dir, &[LANGUAGE_EXTENSION]) {
            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "翻译文件读取失败");
                    continue;
                }
            };

            match Language::parse(&text) {
                Some(language) => translations.add(language),
                None => debug!(path = %path.display(), "无效的翻译文件，已跳过"),
            }
        }

        info!(count = translations.languages.len(), "翻译加载完成");
        translations
    }

    /// 添加语言
    pub fn add(&mut self, language: Language) {
        self.languages.push(language);
    }

    /// 全部语言名
    pub fn names(&self) -> Vec<&str> {
        self.languages.iter().map(|l| l.name.as_str()).collect()
    }

    /// 按名称查找语言
    pub fn find(&self, name: &str) -> Option<&Language> {
        self.languages.iter().find(|l| l.name == name)
    }

    /// 用指定语言翻译，语言不存在或没有词条时返回原文
    pub fn translate<'a>(&'a self, language: Option<&str>, original: &'a str) -> &'a str {
        match language.and_then(|name| self.find(name)) {
            Some(language) => language.translate(original),
            None => original,
        }
    }
}
