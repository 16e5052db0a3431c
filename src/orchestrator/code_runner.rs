//! 代码运行器 - 编排层
//!
//! ## 职责
//!
//! 把一个 `RunSession` 变成一次完整的评测运行：
//!
//! 1. **校验**：源代码、语言、测试用例，失败时会话保持 Idle，不发起请求
//! 2. **提交**：一次批量提交，得到与用例一一对应的 token
//! 3. **首个用例**：先轮询第一个 token，带诊断信息时立即结束（其余 token 不再查询）
//! 4. **其余用例**：并发轮询剩余 token，结果按原顺序汇总
//!
//! 任何传输错误都会让本次运行失败，不保留部分结果

use futures::future::try_join_all;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::clients::JudgeApi;
use crate::error::{AppError, AppResult, ValidationError};
use crate::models::result::{CaseVerdict, ExecutionResult};
use crate::models::submission::SourceSubmission;
use crate::services::SubmissionService;
use crate::utils::logging::truncate_text;
use crate::workflow::poller::{poll_until_terminal, PollPolicy};
use crate::workflow::run_session::{RunError, RunSession, RunState};

/// 一次运行的结果汇总
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub state: RunState,
    pub results: Vec<ExecutionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RunError>,
}

impl RunReport {
    fn from_session(session: &RunSession) -> Self {
        Self {
            state: session.state(),
            results: session.results().to_vec(),
            error: session.error().cloned(),
        }
    }

    pub fn passed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.verdict() == CaseVerdict::Accepted)
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.state == RunState::Done
    }
}

/// 代码运行器
pub struct CodeRunner<J> {
    service: SubmissionService<J>,
    policy: PollPolicy,
}

impl<J: JudgeApi> CodeRunner<J> {
    pub fn new(judge: J, policy: PollPolicy) -> AppResult<Self> {
        Ok(Self {
            service: SubmissionService::new(judge)?,
            policy,
        })
    }

    pub fn service(&self) -> &SubmissionService<J> {
        &self.service
    }

    /// 运行会话中的代码
    ///
    /// 错误不会以 `Err` 返回，而是记录在会话和报告的 `error` 中
    pub async fn run(&self, session: &mut RunSession) -> RunReport {
        let submission = match prepare(session) {
            Ok(submission) => submission,
            Err(e) => {
                warn!("⚠️ 运行前校验失败: {}", e);
                session.reject(&e);
                return RunReport::from_session(session);
            }
        };

        session.begin();
        if let Err(e) = self.execute(session, &submission).await {
            error!("❌ 运行失败: {}", e);
            session.fail(&e);
        }

        RunReport::from_session(session)
    }

    async fn execute(
        &self,
        session: &mut RunSession,
        submission: &SourceSubmission,
    ) -> AppResult<()> {
        let tokens = self.service.create_submission(submission).await?;

        let Some((first, rest)) = tokens.split_first() else {
            return Err(AppError::Other("评测服务未返回任何 token".to_string()));
        };
        if tokens.len() != submission.test_cases.len() {
            return Err(AppError::Other(format!(
                "token 数量 ({}) 与测试用例数量 ({}) 不一致",
                tokens.len(),
                submission.test_cases.len()
            )));
        }

        session.enter(RunState::PollingFirst);
        let first_result = poll_until_terminal(&self.service, first, self.policy).await?;

        if first_result.has_diagnostics() {
            let output = first_result.error_output().unwrap_or_default();
            info!(
                "⚠️ 第 1 个用例带有诊断信息，跳过其余 {} 个用例: {}",
                rest.len(),
                truncate_text(output.lines().next().unwrap_or_default(), 80)
            );
            session.finish_with_diagnostics(first_result);
            return Ok(());
        }

        session.enter(RunState::PollingRemaining);
        let remaining = try_join_all(
            rest.iter()
                .map(|token| poll_until_terminal(&self.service, token, self.policy)),
        )
        .await?;

        let mut results = Vec::with_capacity(tokens.len());
        results.push(first_result);
        results.extend(remaining);

        info!("✓ 全部 {} 个用例评测完成", results.len());
        session.finish(results);
        Ok(())
    }
}

/// 运行前校验，并构造提交内容
fn prepare(session: &RunSession) -> AppResult<SourceSubmission> {
    if session.code().trim().is_empty() {
        return Err(ValidationError::MissingSource.into());
    }
    let language = session.language();
    if !session.allowed_languages().contains(&language) {
        return Err(ValidationError::LanguageNotAllowed(language.key().to_string()).into());
    }
    if session.test_cases().is_empty() {
        return Err(ValidationError::NoTestCases.into());
    }

    Ok(SourceSubmission::new(
        session.code(),
        language.id(),
        session.test_cases().to_vec(),
    ))
}
