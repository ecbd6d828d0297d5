//! # 辅助解析函数
//!
//! 字段切分与 `NONE` 哨兵转换。

use crate::script::{FIELD_SEPARATOR, NONE_TOKEN};

/// 按 `:` 切分一行
///
/// 与逐段读取的语义一致：末尾的空段被丢弃，空行得到零个字段。
///
/// - `"a::b"` → `["a", "", "b"]`
/// - `"a:"` → `["a"]`
/// - `""` → `[]`
pub fn split_fields(line: &str) -> Vec<&str> {
    let mut fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

/// 文本字段转模型值：`NONE` → `None`
pub fn field_value(raw: &str) -> Option<String> {
    if raw == NONE_TOKEN {
        None
    } else {
        Some(raw.to_string())
    }
}

/// 模型值转文本字段：`None` → `NONE`
pub fn field_token(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NONE_TOKEN)
}
