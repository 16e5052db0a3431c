use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 测试用例
///
/// `None` 表示"未提供"，发送给评测服务时为 `null`；`Some("")` 表示空输入，
/// 评测服务对两者的处理不同。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(default)]
    pub stdin: Option<String>,
    #[serde(default)]
    pub expected_output: Option<String>,
}

impl TestCase {
    pub fn new(stdin: Option<&str>, expected_output: Option<&str>) -> Self {
        Self {
            stdin: stdin.map(str::to_string),
            expected_output: expected_output.map(str::to_string),
        }
    }

    /// 新增用例时使用的空模板
    pub fn empty() -> Self {
        Self::new(Some(""), Some(""))
    }
}

/// 一次运行请求：同一份源代码 + 若干测试用例
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSubmission {
    pub source_code: String,
    pub language_id: Option<u32>,
    pub test_cases: Vec<TestCase>,
}

impl SourceSubmission {
    pub fn new(source_code: impl Into<String>, language_id: u32, test_cases: Vec<TestCase>) -> Self {
        Self {
            source_code: source_code.into(),
            language_id: Some(language_id),
            test_cases,
        }
    }
}

/// 评测服务为每个测试用例返回的 token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionToken(pub String);

impl SubmissionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SubmissionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubmissionToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// 批量提交请求中的单项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchItem<'a> {
    pub source_code: &'a str,
    pub language_id: u32,
    pub stdin: Option<&'a str>,
    pub expected_output: Option<&'a str>,
}

/// 批量提交请求体
#[derive(Debug, Serialize)]
pub struct BatchRequest<'a> {
    pub submissions: Vec<BatchItem<'a>>,
}

/// 批量提交响应中的单项
#[derive(Debug, Clone, Deserialize)]
pub struct BatchToken {
    pub token: SubmissionToken,
}
