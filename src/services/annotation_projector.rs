//! 标注投影 - 业务能力层
//!
//! 把 1 起始的诊断信息转换成编辑器使用的 0 起始标注和整行标记

use crate::models::diagnostic::{Annotation, Diagnostic, Marker, Severity};

/// 无法定位时的兜底提示
pub const GENERIC_ERROR_TEXT: &str = "Compilation/Runtime Error";

/// 诊断 → 行内提示（行列减一，最小为 0）
pub fn to_annotation(diagnostic: &Diagnostic) -> Annotation {
    Annotation {
        row: diagnostic.row.saturating_sub(1),
        column: diagnostic.column.saturating_sub(1),
        severity: diagnostic.severity,
        text: diagnostic.message.clone(),
    }
}

/// 诊断 → 整行错误标记
pub fn to_marker(diagnostic: &Diagnostic) -> Marker {
    Marker::full_line(diagnostic.row.saturating_sub(1))
}

pub fn project(diagnostics: &[Diagnostic]) -> (Vec<Annotation>, Vec<Marker>) {
    (
        diagnostics.iter().map(to_annotation).collect(),
        diagnostics.iter().map(to_marker).collect(),
    )
}

/// 兜底：没有任何匹配时，用输出的第一行在第 0 行生成一条错误提示
pub fn synthesize(output: &str) -> (Annotation, Marker) {
    let first_line = output.lines().next().unwrap_or_default();
    let text = if first_line.is_empty() {
        GENERIC_ERROR_TEXT.to_string()
    } else {
        first_line.to_string()
    };
    (
        Annotation {
            row: 0,
            column: 0,
            severity: Severity::Error,
            text,
        },
        Marker::full_line(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::diagnostic::END_OF_LINE;

    fn diagnostic(row: u32, column: u32, severity: Severity) -> Diagnostic {
        Diagnostic {
            file: "main.cpp".to_string(),
            row,
            column,
            severity,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_rows_and_columns_are_clamped() {
        let first = to_annotation(&diagnostic(1, 1, Severity::Error));
        assert_eq!((first.row, first.column), (0, 0));

        let zero = to_annotation(&diagnostic(0, 0, Severity::Error));
        assert_eq!((zero.row, zero.column), (0, 0));

        let later = to_annotation(&diagnostic(2, 14, Severity::Error));
        assert_eq!((later.row, later.column), (1, 13));
    }

    #[test]
    fn test_warning_is_kept() {
        let annotation = to_annotation(&diagnostic(3, 1, Severity::Warning));
        assert_eq!(annotation.severity, Severity::Warning);
        assert_eq!(annotation.text, "boom");
    }

    #[test]
    fn test_marker_spans_whole_line() {
        let marker = to_marker(&diagnostic(5, 9, Severity::Error));
        assert_eq!(marker.start_row, 4);
        assert_eq!(marker.end_row, 4);
        assert_eq!(marker.start_col, 0);
        assert_eq!(marker.end_col, END_OF_LINE);
        assert_eq!(marker.class_name, "error-marker");
    }

    #[test]
    fn test_synthesize_uses_first_line() {
        let (annotation, marker) = synthesize("ld: cannot find -lfoo\ncollect2: error\n");
        assert_eq!(annotation.row, 0);
        assert_eq!(annotation.text, "ld: cannot find -lfoo");
        assert_eq!(marker.start_row, 0);

        let (annotation, _) = synthesize("\nsecond");
        assert_eq!(annotation.text, GENERIC_ERROR_TEXT);
    }

    #[test]
    fn test_marker_serializes_for_editor() {
        let value = serde_json::to_value(to_marker(&diagnostic(1, 1, Severity::Error))).unwrap();
        assert_eq!(value["className"], "error-marker");
        assert_eq!(value["type"], "text");
        assert_eq!(value["endCol"], serde_json::json!(END_OF_LINE));
    }
}
