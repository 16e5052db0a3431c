use serde::{Deserialize, Serialize};

use crate::models::language::Language;
use crate::models::submission::TestCase;

/// 题目运行配置（来自题库）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProblemRun {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub source_template: Option<String>,
    /// 题目指定的语言 ID
    #[serde(default)]
    pub language_id: Option<u32>,
    /// 允许使用的语言名称，空表示全部
    #[serde(default)]
    pub allowed_languages: Vec<String>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl ProblemRun {
    /// 解析允许的语言，无法识别的名称会被忽略；列表为空时返回全部语言
    pub fn allowed(&self) -> Vec<Language> {
        let parsed: Vec<Language> = self
            .allowed_languages
            .iter()
            .filter_map(|name| {
                let lang = Language::from_name(name);
                if lang.is_none() {
                    tracing::warn!("忽略无法识别的语言: {}", name);
                }
                lang
            })
            .collect();
        if parsed.is_empty() {
            Language::ALL.to_vec()
        } else {
            parsed
        }
    }

    pub fn language(&self) -> Option<Language> {
        self.language_id.and_then(Language::from_id)
    }
}
