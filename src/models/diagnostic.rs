//! 诊断信息与编辑器标注
//!
//! - `Diagnostic`：从编译器 / 解释器输出中解析出的结构化错误（行号从 1 开始）
//! - `Annotation`：编辑器行内提示（行列从 0 开始）
//! - `Marker`：编辑器整行高亮

use serde::{Deserialize, Serialize};

/// 行尾哨兵值，表示"直到行尾"（编辑器端的安全整数上限）
pub const END_OF_LINE: u64 = (1 << 53) - 1;

/// 错误标记的样式名
pub const ERROR_MARKER_CLASS: &str = "error-marker";

/// 严重级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// 按编译器输出中的类型文字判断级别
    ///
    /// 只有严格等于 `warning` 才是警告，其余（如 `fatal error`）一律视为错误
    pub fn from_kind(kind: &str) -> Self {
        if kind == "warning" {
            Severity::Warning
        } else {
            Severity::Error
        }
    }
}

/// 结构化诊断信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: String,
    pub row: u32,
    pub column: u32,
    pub severity: Severity,
    pub message: String,
}

/// 编辑器行内提示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub row: u32,
    pub column: u32,
    #[serde(rename = "type")]
    pub severity: Severity,
    pub text: String,
}

/// 编辑器整行高亮
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub start_row: u32,
    pub start_col: u64,
    pub end_row: u32,
    pub end_col: u64,
    pub class_name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Marker {
    /// 覆盖整行的错误标记
    pub fn full_line(row: u32) -> Self {
        Self {
            start_row: row,
            start_col: 0,
            end_row: row,
            end_col: END_OF_LINE,
            class_name: ERROR_MARKER_CLASS.to_string(),
            kind: "text".to_string(),
        }
    }
}
