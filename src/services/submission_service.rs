//! 提交服务 - 业务能力层
//!
//! 只负责"创建一次批量提交"和"取回一个 token 的结果"两项能力：
//! - 提交前校验源代码和语言，校验失败不发起网络请求
//! - 取回结果后解码文本字段，并把编译 / 运行输出解析成编辑器标注
//!
//! 不关心轮询节奏，也不关心多个用例之间的关系

use tracing::{debug, info};

use crate::clients::JudgeApi;
use crate::error::{AppResult, ValidationError};
use crate::models::result::ExecutionResult;
use crate::models::submission::{BatchItem, SourceSubmission, SubmissionToken};
use crate::services::annotation_projector;
use crate::services::diagnostic_parser::DiagnosticParser;

/// 提交服务
pub struct SubmissionService<J> {
    judge: J,
    parser: DiagnosticParser,
}

impl<J: JudgeApi> SubmissionService<J> {
    /// 创建新的提交服务
    pub fn new(judge: J) -> AppResult<Self> {
        Ok(Self {
            judge,
            parser: DiagnosticParser::new()?,
        })
    }

    pub fn judge(&self) -> &J {
        &self.judge
    }

    /// 创建批量提交
    ///
    /// # 返回
    /// 与测试用例顺序一致的 token 列表
    pub async fn create_submission(
        &self,
        submission: &SourceSubmission,
    ) -> AppResult<Vec<SubmissionToken>> {
        if submission.source_code.trim().is_empty() {
            return Err(ValidationError::MissingSource.into());
        }
        let language_id = submission
            .language_id
            .ok_or(ValidationError::MissingLanguage)?;

        let items: Vec<BatchItem<'_>> = submission
            .test_cases
            .iter()
            .map(|case| BatchItem {
                source_code: &submission.source_code,
                language_id,
                stdin: case.stdin.as_deref(),
                expected_output: case.expected_output.as_deref(),
            })
            .collect();

        let tokens = self.judge.create_batch(&items).await?;

        info!(
            "✓ 批量提交已创建: 语言 {}，{} 个用例 → {} 个 token",
            language_id,
            items.len(),
            tokens.len()
        );

        Ok(tokens)
    }

    /// 获取单个提交的结果，并附带诊断、标注和标记
    pub async fn get_submission_result(&self, token: &SubmissionToken) -> AppResult<ExecutionResult> {
        let raw = self.judge.fetch_result(token).await?;
        let mut result = raw.decode()?;
        self.attach_diagnostics(&mut result);
        Ok(result)
    }

    /// 解析编译输出（无结果时退而解析 stderr），填充诊断信息
    ///
    /// 没有编译输出时视为编译通过，剩下的失败只体现在状态和 stdout / stderr 上
    pub fn attach_diagnostics(&self, result: &mut ExecutionResult) {
        let Some(compile_output) = result.compile_output.as_deref() else {
            return;
        };

        let mut diagnostics = self.parser.parse(compile_output);
        if diagnostics.is_empty() {
            if let Some(stderr) = result.stderr.as_deref() {
                diagnostics = self.parser.parse(stderr);
            }
        }

        if !diagnostics.is_empty() {
            let (annotations, markers) = annotation_projector::project(&diagnostics);
            debug!("解析到 {} 条诊断信息", diagnostics.len());
            result.diagnostics = diagnostics;
            result.annotations = annotations;
            result.markers = markers;
            return;
        }

        let fallback = [Some(compile_output), result.stderr.as_deref()]
            .into_iter()
            .flatten()
            .find(|output| !output.is_empty());

        if let Some(output) = fallback {
            debug!("诊断格式均未命中，使用第一行生成兜底标注");
            let (annotation, marker) = annotation_projector::synthesize(output);
            result.annotations = vec![annotation];
            result.markers = vec![marker];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::fake::{FakeResult, JudgeCall, ScriptedJudge};
    use crate::error::AppError;
    use crate::models::diagnostic::Severity;
    use crate::models::submission::TestCase;

    fn service(judge: ScriptedJudge) -> SubmissionService<ScriptedJudge> {
        SubmissionService::new(judge).unwrap()
    }

    #[tokio::test]
    async fn test_blank_source_makes_no_call() {
        let svc = service(ScriptedJudge::new().with_tokens(["t0"]));
        let submission = SourceSubmission::new("   \n", 54, vec![TestCase::default()]);
        let err = svc.create_submission(&submission).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::MissingSource)));
        assert!(svc.judge().calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_language_makes_no_call() {
        let svc = service(ScriptedJudge::new().with_tokens(["t0"]));
        let submission = SourceSubmission {
            source_code: "print(1)".to_string(),
            language_id: None,
            test_cases: vec![TestCase::default()],
        };
        let err = svc.create_submission(&submission).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::MissingLanguage)));
        assert!(svc.judge().calls().is_empty());
    }

    #[tokio::test]
    async fn test_tokens_keep_case_order_and_stdin_semantics() {
        let svc = service(ScriptedJudge::new().with_tokens(["t0", "t1", "t2"]));
        let submission = SourceSubmission::new(
            "print(input())",
            71,
            vec![
                TestCase::new(Some("1"), Some("1")),
                TestCase::new(Some(""), None),
                TestCase::new(None, None),
            ],
        );
        let tokens = svc.create_submission(&submission).await.unwrap();
        assert_eq!(
            tokens,
            vec![
                SubmissionToken::from("t0"),
                SubmissionToken::from("t1"),
                SubmissionToken::from("t2")
            ]
        );
        assert_eq!(
            svc.judge().calls(),
            vec![JudgeCall::CreateBatch(vec![
                Some("1".to_string()),
                Some(String::new()),
                None
            ])]
        );
    }

    #[tokio::test]
    async fn test_batch_rejected_carries_status() {
        let svc = service(ScriptedJudge::new().with_batch_status(503));
        let submission = SourceSubmission::new("int main(){}", 54, vec![TestCase::default()]);
        let err = svc.create_submission(&submission).await.unwrap_err();
        assert_eq!(err.http_status(), Some(503));
    }

    #[tokio::test]
    async fn test_cpp_compile_error_is_annotated() {
        let judge = ScriptedJudge::new().with_result(
            "t0",
            FakeResult::status(6, "Compilation Error")
                .compile_output("file.cpp: In function 'int main()':\nfile.cpp:2:14: error: 'cout' was not declared in this scope\n")
                .build(),
        );
        let svc = service(judge);
        let result = svc.get_submission_result(&SubmissionToken::from("t0")).await.unwrap();

        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].file, "file.cpp");
        assert_eq!(result.diagnostics[0].row, 2);
        assert_eq!(result.diagnostics[0].column, 14);
        assert_eq!(result.annotations.len(), 1);
        assert_eq!(result.annotations[0].row, 1);
        assert_eq!(result.annotations[0].column, 13);
        assert_eq!(result.annotations[0].severity, Severity::Error);
        assert_eq!(result.markers[0].start_row, 1);
    }

    #[tokio::test]
    async fn test_no_compile_output_means_no_diagnostics() {
        let judge = ScriptedJudge::new().with_result(
            "t0",
            FakeResult::status(11, "Runtime Error (NZEC)")
                .stderr("Traceback (most recent call last):\n  File \"script.py\", line 1, in <module>\n")
                .build(),
        );
        let svc = service(judge);
        let result = svc.get_submission_result(&SubmissionToken::from("t0")).await.unwrap();
        assert!(result.diagnostics.is_empty());
        assert!(result.annotations.is_empty());
        assert!(result.markers.is_empty());
        assert!(result.stderr.is_some());
    }

    #[tokio::test]
    async fn test_falls_back_to_stderr() {
        let judge = ScriptedJudge::new().with_result(
            "t0",
            FakeResult::status(6, "Compilation Error")
                .compile_output("make: *** [all] Error 1")
                .stderr("Main.java:3: error: cannot find symbol\n")
                .build(),
        );
        let svc = service(judge);
        let result = svc.get_submission_result(&SubmissionToken::from("t0")).await.unwrap();
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].file, "Main.java");
        assert_eq!(result.annotations[0].row, 2);
    }

    #[tokio::test]
    async fn test_unmatched_output_is_synthesized() {
        let judge = ScriptedJudge::new().with_result(
            "t0",
            FakeResult::status(6, "Compilation Error")
                .compile_output("something went wrong\nsecond line\n")
                .build(),
        );
        let svc = service(judge);
        let result = svc.get_submission_result(&SubmissionToken::from("t0")).await.unwrap();
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.annotations.len(), 1);
        assert_eq!(result.annotations[0].row, 0);
        assert_eq!(result.annotations[0].text, "something went wrong");
        assert_eq!(result.markers.len(), 1);
        assert!(result.has_diagnostics());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_transport_error() {
        let svc = service(ScriptedJudge::new().with_result_status("t0", 500));
        let err = svc
            .get_submission_result(&SubmissionToken::from("t0"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
        assert_eq!(err.http_status(), Some(500));
    }
}
