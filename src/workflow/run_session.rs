//! 运行会话
//!
//! 封装"当前代码 + 语言 + 测试用例 + 上一次运行的结果"。
//! 会话由调用方持有，运行时以 `&mut` 传给编排层，同一会话不可能同时进行两次运行。

use serde::Serialize;
use std::fmt::Display;

use crate::error::{AppError, ValidationError};
use crate::models::diagnostic::{Annotation, Marker, Severity};
use crate::models::language::Language;
use crate::models::problem::ProblemRun;
use crate::models::result::{CaseVerdict, ExecutionResult};
use crate::models::submission::TestCase;

/// 运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Submitting,
    PollingFirst,
    PollingRemaining,
    /// 第一个用例带有诊断信息，其余用例未轮询
    DoneWithDiagnostics,
    Done,
    Failed,
}

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunErrorKind {
    Validation,
    Transport,
    Compilation,
    Timeout,
    Unknown,
}

/// 一次运行的错误信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunError {
    pub kind: RunErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl RunError {
    pub fn compilation(first: &ExecutionResult) -> Self {
        Self {
            kind: RunErrorKind::Compilation,
            message: "Compilation Error".to_string(),
            stderr: Some(first.error_output().unwrap_or("Compilation Error").to_string()),
            status: None,
        }
    }
}

impl From<&AppError> for RunError {
    fn from(err: &AppError) -> Self {
        let kind = match err {
            AppError::Validation(_) => RunErrorKind::Validation,
            AppError::Transport(_) => RunErrorKind::Transport,
            AppError::PollLimitExceeded { .. } => RunErrorKind::Timeout,
            _ => RunErrorKind::Unknown,
        };
        Self {
            kind,
            message: err.to_string(),
            stderr: None,
            status: err.http_status(),
        }
    }
}

impl Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

/// 运行会话
#[derive(Debug, Clone)]
pub struct RunSession {
    code: String,
    language: Language,
    allowed_languages: Vec<Language>,
    test_cases: Vec<TestCase>,
    active_test_case: usize,
    state: RunState,
    loading: bool,
    results: Vec<ExecutionResult>,
    error: Option<RunError>,
    annotations: Vec<Annotation>,
    markers: Vec<Marker>,
}

impl Default for RunSession {
    fn default() -> Self {
        Self {
            code: String::new(),
            language: Language::JavaScript,
            allowed_languages: Language::ALL.to_vec(),
            test_cases: Vec::new(),
            active_test_case: 0,
            state: RunState::Idle,
            loading: false,
            results: Vec::new(),
            error: None,
            annotations: Vec::new(),
            markers: Vec::new(),
        }
    }
}

impl RunSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用题目配置创建会话
    pub fn from_problem(problem: &ProblemRun) -> Self {
        let mut session = Self::new();
        session.initialize(problem);
        session
    }

    /// 用题目配置重置会话
    ///
    /// 语言优先使用题目指定的语言（需在允许列表中），否则使用第一个允许的语言
    pub fn initialize(&mut self, problem: &ProblemRun) {
        self.allowed_languages = problem.allowed();
        self.language = problem
            .language()
            .filter(|lang| self.allowed_languages.contains(lang))
            .or_else(|| self.allowed_languages.first().copied())
            .unwrap_or(Language::JavaScript);
        self.code = problem
            .source_template
            .clone()
            .filter(|code| !code.is_empty())
            .unwrap_or_else(|| self.language.default_code().to_string());
        self.test_cases = if problem.test_cases.is_empty() {
            vec![TestCase::empty()]
        } else {
            problem.test_cases.clone()
        };
        self.active_test_case = 0;
        self.state = RunState::Idle;
        self.loading = false;
        self.results.clear();
        self.error = None;
        self.annotations.clear();
        self.markers.clear();
    }

    // ========== 代码与语言 ==========

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    /// 恢复为当前语言的默认代码，并清除标注
    pub fn reset_code(&mut self) {
        self.code = self.language.default_code().to_string();
        self.annotations.clear();
        self.markers.clear();
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn allowed_languages(&self) -> &[Language] {
        &self.allowed_languages
    }

    /// 切换语言；代码为空或仍是旧语言的默认代码时换成新语言的默认代码
    pub fn set_language(&mut self, language: Language) -> Result<(), ValidationError> {
        if !self.allowed_languages.contains(&language) {
            return Err(ValidationError::LanguageNotAllowed(language.key().to_string()));
        }
        if self.code.is_empty() || self.code == self.language.default_code() {
            self.code = language.default_code().to_string();
        }
        self.language = language;
        Ok(())
    }

    /// 按名称切换语言
    pub fn set_language_by_name(&mut self, name: &str) -> Result<(), ValidationError> {
        let language = Language::from_name(name)
            .ok_or_else(|| ValidationError::UnsupportedLanguage(name.to_string()))?;
        self.set_language(language)
    }

    /// 更新允许的语言；当前语言不再允许时切换到第一个允许的语言
    pub fn set_allowed_languages(&mut self, languages: Vec<Language>) {
        self.allowed_languages = languages;
        if !self.allowed_languages.contains(&self.language) {
            self.language = self
                .allowed_languages
                .first()
                .copied()
                .unwrap_or(Language::JavaScript);
            self.code = self.language.default_code().to_string();
        }
    }

    // ========== 测试用例 ==========

    pub fn test_cases(&self) -> &[TestCase] {
        &self.test_cases
    }

    /// 替换全部测试用例，并清空结果和错误
    pub fn set_test_cases(&mut self, test_cases: Vec<TestCase>) {
        self.test_cases = test_cases;
        self.active_test_case = 0;
        self.results.clear();
        self.error = None;
    }

    pub fn add_test_case(&mut self) {
        self.test_cases.push(TestCase::empty());
    }

    /// 删除一个测试用例，至少保留一个；对应下标的结果一并删除
    pub fn remove_test_case(&mut self, index: usize) -> bool {
        if self.test_cases.len() <= 1 || index >= self.test_cases.len() {
            return false;
        }
        self.test_cases.remove(index);
        if self.active_test_case >= self.test_cases.len() {
            self.active_test_case = self.test_cases.len() - 1;
        }
        if index < self.results.len() {
            self.results.remove(index);
        }
        true
    }

    pub fn update_test_case(&mut self, index: usize, test_case: TestCase) -> bool {
        match self.test_cases.get_mut(index) {
            Some(slot) => {
                *slot = test_case;
                true
            }
            None => false,
        }
    }

    pub fn active_test_case(&self) -> usize {
        self.active_test_case
    }

    pub fn set_active_test_case(&mut self, index: usize) {
        if index < self.test_cases.len() {
            self.active_test_case = index;
        }
    }

    // ========== 运行状态 ==========

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn results(&self) -> &[ExecutionResult] {
        &self.results
    }

    pub fn error(&self) -> Option<&RunError> {
        self.error.as_ref()
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn clear_results(&mut self) {
        self.results.clear();
        self.error = None;
    }

    /// 通过（Accepted）的用例数
    pub fn passed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.verdict() == CaseVerdict::Accepted)
            .count()
    }

    // ========== 状态迁移（由编排层调用） ==========

    /// 校验失败：回到 Idle，不发起任何请求
    pub(crate) fn reject(&mut self, err: &AppError) {
        self.state = RunState::Idle;
        self.loading = false;
        self.error = Some(RunError::from(err));
    }

    /// 开始提交：清除上一次的结果和标注
    pub(crate) fn begin(&mut self) {
        self.state = RunState::Submitting;
        self.loading = true;
        self.results.clear();
        self.error = None;
        self.annotations.clear();
        self.markers.clear();
    }

    pub(crate) fn enter(&mut self, state: RunState) {
        self.state = state;
    }

    /// 第一个用例带诊断：用它的标注替换编辑器标注
    pub(crate) fn finish_with_diagnostics(&mut self, first: ExecutionResult) {
        self.annotations = first.annotations.clone();
        self.markers = first.markers.clone();
        self.error = Some(RunError::compilation(&first));
        self.results = vec![first];
        self.state = RunState::DoneWithDiagnostics;
        self.loading = false;
    }

    pub(crate) fn finish(&mut self, results: Vec<ExecutionResult>) {
        self.results = results;
        self.error = None;
        self.annotations.clear();
        self.markers.clear();
        self.state = RunState::Done;
        self.loading = false;
    }

    /// 运行失败：不保留部分结果，在第 0 行给出错误提示
    pub(crate) fn fail(&mut self, err: &AppError) {
        let run_error = RunError::from(err);
        self.annotations = vec![Annotation {
            row: 0,
            column: 0,
            severity: Severity::Error,
            text: run_error.message.clone(),
        }];
        self.markers.clear();
        self.results.clear();
        self.error = Some(run_error);
        self.state = RunState::Failed;
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem() -> ProblemRun {
        ProblemRun {
            name: "A + B".to_string(),
            source_template: None,
            language_id: Some(Language::Python.id()),
            allowed_languages: vec!["cpp".into(), "python".into()],
            test_cases: vec![
                TestCase::new(Some("1 2"), Some("3")),
                TestCase::new(Some("2 2"), Some("4")),
            ],
            file_path: None,
        }
    }

    #[test]
    fn test_initialize_from_problem() {
        let session = RunSession::from_problem(&problem());
        assert_eq!(session.language(), Language::Python);
        assert_eq!(session.code(), Language::Python.default_code());
        assert_eq!(session.test_cases().len(), 2);
        assert_eq!(session.state(), RunState::Idle);
        assert!(!session.loading());
    }

    #[test]
    fn test_disallowed_problem_language_falls_back() {
        let mut p = problem();
        p.language_id = Some(Language::Java.id());
        p.test_cases.clear();
        let session = RunSession::from_problem(&p);
        assert_eq!(session.language(), Language::Cpp);
        assert_eq!(session.test_cases(), &[TestCase::empty()]);
    }

    #[test]
    fn test_set_language_replaces_default_code_only() {
        let mut session = RunSession::from_problem(&problem());
        session.set_language(Language::Cpp).unwrap();
        assert_eq!(session.code(), Language::Cpp.default_code());

        session.set_code("int main() { return 1; }");
        session.set_language(Language::Python).unwrap();
        assert_eq!(session.code(), "int main() { return 1; }");

        assert_eq!(
            session.set_language(Language::Sql),
            Err(ValidationError::LanguageNotAllowed("sql".to_string()))
        );
        assert!(matches!(
            session.set_language_by_name("cobol"),
            Err(ValidationError::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_remove_keeps_last_case_and_alignment() {
        let mut session = RunSession::from_problem(&problem());
        session.finish(vec![ExecutionResult::default(), ExecutionResult::default()]);
        session.set_active_test_case(1);

        assert!(session.remove_test_case(1));
        assert_eq!(session.test_cases().len(), 1);
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.active_test_case(), 0);

        assert!(!session.remove_test_case(0));
        assert_eq!(session.test_cases().len(), 1);
    }

    #[test]
    fn test_active_case_out_of_range_is_ignored() {
        let mut session = RunSession::from_problem(&problem());
        session.set_active_test_case(5);
        assert_eq!(session.active_test_case(), 0);
        session.add_test_case();
        session.set_active_test_case(2);
        assert_eq!(session.active_test_case(), 2);
    }

    #[test]
    fn test_allowed_languages_switch_current() {
        let mut session = RunSession::from_problem(&problem());
        session.set_allowed_languages(vec![Language::Java]);
        assert_eq!(session.language(), Language::Java);
        assert_eq!(session.code(), Language::Java.default_code());
    }

    #[test]
    fn test_fail_clears_loading_and_results() {
        let mut session = RunSession::from_problem(&problem());
        session.begin();
        assert!(session.loading());
        session.fail(&AppError::bad_status("submissions/t0", 500));
        assert!(!session.loading());
        assert_eq!(session.state(), RunState::Failed);
        assert!(session.results().is_empty());
        assert_eq!(session.annotations().len(), 1);
        let err = session.error().unwrap();
        assert_eq!(err.kind, RunErrorKind::Transport);
        assert_eq!(err.status, Some(500));
    }
}
