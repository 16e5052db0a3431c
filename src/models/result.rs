use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::models::diagnostic::{Annotation, Diagnostic, Marker};

/// 评测状态（id 1-2 为排队 / 运行中，>= 3 为已结束）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeStatus {
    pub id: u32,
    #[serde(default)]
    pub description: String,
}

impl JudgeStatus {
    pub const IN_QUEUE: u32 = 1;
    pub const PROCESSING: u32 = 2;
    pub const ACCEPTED: u32 = 3;
    pub const WRONG_ANSWER: u32 = 4;
    pub const TIME_LIMIT_EXCEEDED: u32 = 5;
    pub const COMPILATION_ERROR: u32 = 6;
    pub const INTERNAL_ERROR: u32 = 13;
    pub const EXEC_FORMAT_ERROR: u32 = 14;

    pub fn new(id: u32, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.id >= Self::ACCEPTED
    }

    pub fn verdict(&self) -> CaseVerdict {
        match self.id {
            0..=2 => CaseVerdict::Pending,
            Self::ACCEPTED => CaseVerdict::Accepted,
            Self::WRONG_ANSWER => CaseVerdict::WrongAnswer,
            Self::TIME_LIMIT_EXCEEDED => CaseVerdict::TimeLimitExceeded,
            Self::COMPILATION_ERROR => CaseVerdict::CompilationError,
            7..=12 => CaseVerdict::RuntimeError,
            _ => CaseVerdict::InternalError,
        }
    }
}

/// 单个测试用例的判定分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseVerdict {
    Pending,
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    CompilationError,
    /// SIGSEGV / SIGFPE / NZEC 等运行时错误，只影响该用例
    RuntimeError,
    InternalError,
}

/// 评测服务原始返回（文本字段为 base64 编码）
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSubmissionResult {
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub compile_output: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub expected_output: Option<String>,
    #[serde(default)]
    pub status: Option<JudgeStatus>,
    #[serde(default, deserialize_with = "deserialize_metric")]
    pub time: Option<f64>,
    #[serde(default)]
    pub memory: Option<u64>,
    #[serde(default)]
    pub finished_at: Option<String>,
}

impl RawSubmissionResult {
    /// 解码所有文本字段，诊断信息留空
    ///
    /// 不修改自身，同一份原始结果多次解码得到相同结果
    pub fn decode(&self) -> Result<ExecutionResult, TransportError> {
        Ok(ExecutionResult {
            stdout: decode_field("stdout", self.stdout.as_deref())?,
            stderr: decode_field("stderr", self.stderr.as_deref())?,
            compile_output: decode_field("compile_output", self.compile_output.as_deref())?,
            message: decode_field("message", self.message.as_deref())?,
            expected_output: decode_field("expected_output", self.expected_output.as_deref())?,
            status: self.status.clone(),
            time: self.time,
            memory: self.memory,
            finished_at: self.finished_at.clone(),
            diagnostics: Vec::new(),
            annotations: Vec::new(),
            markers: Vec::new(),
        })
    }
}

/// 解码后的执行结果，与测试用例按下标一一对应
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
    pub message: Option<String>,
    pub expected_output: Option<String>,
    pub status: Option<JudgeStatus>,
    pub time: Option<f64>,
    pub memory: Option<u64>,
    pub finished_at: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
    pub annotations: Vec<Annotation>,
    pub markers: Vec<Marker>,
}

impl ExecutionResult {
    pub fn is_terminal(&self) -> bool {
        self.status.as_ref().is_some_and(JudgeStatus::is_terminal)
    }

    pub fn status_id(&self) -> Option<u32> {
        self.status.as_ref().map(|s| s.id)
    }

    pub fn verdict(&self) -> CaseVerdict {
        self.status
            .as_ref()
            .map_or(CaseVerdict::Pending, JudgeStatus::verdict)
    }

    /// 是否带有编辑器标注（解析得到的或兜底生成的）
    pub fn has_diagnostics(&self) -> bool {
        !self.annotations.is_empty()
    }

    /// 展示给用户的错误输出：优先 stderr，其次编译输出
    pub fn error_output(&self) -> Option<&str> {
        self.stderr
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.compile_output.as_deref().filter(|s| !s.is_empty()))
    }
}

fn decode_field(field: &'static str, raw: Option<&str>) -> Result<Option<String>, TransportError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    // 评测服务每 60 个字符插入一个换行
    let compact: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Ok(None);
    }
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|source| TransportError::Decode { field, source })?;
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

// 评测服务的 time 字段可能是字符串（"0.002"）也可能是数字
fn deserialize_metric<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct MetricVisitor;

    impl<'de> Visitor<'de> for MetricVisitor {
        type Value = Option<f64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number, a numeric string or null")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value as f64))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value as f64))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| E::custom(format!("invalid metric: {}", value)))
        }
    }

    deserializer.deserialize_any(MetricVisitor)
}
