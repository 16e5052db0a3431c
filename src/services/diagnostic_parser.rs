//! 诊断解析服务 - 业务能力层
//!
//! 把编译器 / 解释器的原始文本输出解析成结构化的 `Diagnostic` 列表。
//!
//! ## 匹配策略
//!
//! 按固定顺序逐个尝试匹配器，**第一个得到结果的匹配器胜出**，
//! 之后的匹配器不再调用，也不会合并多个匹配器的结果：
//!
//! 1. C/C++：`file:row:col: error|fatal error|warning: message`
//! 2. Java：`file:row: error|warning: message`
//! 3. Python：`File "file", line row`
//! 4. 通用运行时：整行只有 `file:row[:col]`
//! 5. TypeScript：`file(row,col): error|warning TSxxxx: message`
//! 6. SQL：`Error: near line row: message`
//! 7. SQL 兜底：`Error: message`

use regex::{Captures, Regex};
use tracing::debug;

use crate::models::diagnostic::{Diagnostic, Severity};

/// SQL 错误没有文件名，统一使用该名称
pub const SQL_SCRIPT_FILE: &str = "script.sql";
pub const PYTHON_ERROR_MESSAGE: &str = "Python error";
pub const RUNTIME_ERROR_MESSAGE: &str = "JavaScript runtime error";

/// 单个匹配器：正则 + 把一次捕获转换成诊断信息的函数
struct Matcher {
    name: &'static str,
    regex: Regex,
    build: fn(&Captures) -> Option<Diagnostic>,
}

impl Matcher {
    fn new(
        name: &'static str,
        pattern: &str,
        build: fn(&Captures) -> Option<Diagnostic>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            regex: Regex::new(pattern)?,
            build,
        })
    }

    /// 对全文做全局匹配，没有任何结果时返回 None
    fn run(&self, text: &str) -> Option<Vec<Diagnostic>> {
        let found: Vec<Diagnostic> = self
            .regex
            .captures_iter(text)
            .filter_map(|caps| (self.build)(&caps))
            .collect();
        if found.is_empty() {
            None
        } else {
            Some(found)
        }
    }
}

/// 诊断解析器
///
/// 正则在构造时编译一次，之后可重复使用
pub struct DiagnosticParser {
    matchers: Vec<Matcher>,
}

impl DiagnosticParser {
    /// 创建解析器（匹配器顺序即优先级）
    pub fn new() -> Result<Self, regex::Error> {
        let matchers = vec![
            Matcher::new(
                "c_cpp",
                r"(?mR)^(.+?):([0-9]+):([0-9]+):\s+(error|fatal error|warning):\s+(.*)$",
                build_c_style,
            )?,
            Matcher::new(
                "java",
                r"(?mR)^(.+?):([0-9]+):\s+(error|warning):\s+(.*)$",
                build_java_style,
            )?,
            Matcher::new(
                "python",
                r#"(?mR)File\s+"(.+?)",\s+line\s+([0-9]+)"#,
                build_python_style,
            )?,
            Matcher::new(
                "runtime",
                r"(?mR)^(.+?):([0-9]+)(?::[0-9]+)?$",
                build_runtime_style,
            )?,
            Matcher::new(
                "typescript",
                r"(?mR)^(.+?)\(([0-9]+),([0-9]+)\):\s+(error|warning)\s+TS[0-9]+:\s+(.*)$",
                build_typescript_style,
            )?,
            Matcher::new(
                "sql_near_line",
                r"(?mR)Error:\s+near\s+line\s+([0-9]+):\s+(.*)$",
                build_sql_near_line,
            )?,
            Matcher::new("sql", r"(?mR)Error:\s+(.*)$", build_sql_generic)?,
        ];
        Ok(Self { matchers })
    }

    /// 解析文本，返回第一个命中的匹配器的全部结果；都未命中时返回空列表
    pub fn parse(&self, text: &str) -> Vec<Diagnostic> {
        for matcher in &self.matchers {
            if let Some(found) = matcher.run(text) {
                debug!("诊断匹配器 {} 命中 {} 条", matcher.name, found.len());
                return found;
            }
        }
        Vec::new()
    }
}

// ========== 各语言的转换函数 ==========

fn number(caps: &Captures, index: usize) -> Option<u32> {
    caps.get(index)?.as_str().parse().ok()
}

fn text(caps: &Captures, index: usize) -> String {
    caps.get(index)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn build_c_style(caps: &Captures) -> Option<Diagnostic> {
    let kind = caps.get(4)?.as_str();
    Some(Diagnostic {
        file: text(caps, 1),
        row: number(caps, 2)?,
        column: number(caps, 3)?,
        severity: if kind.contains("error") {
            Severity::Error
        } else {
            Severity::Warning
        },
        message: text(caps, 5),
    })
}

fn build_java_style(caps: &Captures) -> Option<Diagnostic> {
    Some(Diagnostic {
        file: text(caps, 1),
        row: number(caps, 2)?,
        column: 0,
        severity: Severity::from_kind(caps.get(3)?.as_str()),
        message: text(caps, 4),
    })
}

fn build_python_style(caps: &Captures) -> Option<Diagnostic> {
    Some(Diagnostic {
        file: text(caps, 1),
        row: number(caps, 2)?,
        column: 0,
        severity: Severity::Error,
        message: PYTHON_ERROR_MESSAGE.to_string(),
    })
}

fn build_runtime_style(caps: &Captures) -> Option<Diagnostic> {
    Some(Diagnostic {
        file: text(caps, 1),
        row: number(caps, 2)?,
        column: 0,
        severity: Severity::Error,
        message: RUNTIME_ERROR_MESSAGE.to_string(),
    })
}

fn build_typescript_style(caps: &Captures) -> Option<Diagnostic> {
    Some(Diagnostic {
        file: text(caps, 1),
        row: number(caps, 2)?,
        column: number(caps, 3)?,
        severity: Severity::from_kind(caps.get(4)?.as_str()),
        message: text(caps, 5),
    })
}

fn build_sql_near_line(caps: &Captures) -> Option<Diagnostic> {
    Some(Diagnostic {
        file: SQL_SCRIPT_FILE.to_string(),
        row: number(caps, 1)?,
        column: 0,
        severity: Severity::Error,
        message: text(caps, 2),
    })
}

fn build_sql_generic(caps: &Captures) -> Option<Diagnostic> {
    Some(Diagnostic {
        file: SQL_SCRIPT_FILE.to_string(),
        row: 1,
        column: 0,
        severity: Severity::Error,
        message: text(caps, 1),
    })
}
