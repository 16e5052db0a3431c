//! 内存中的评测服务实现，按预设脚本返回结果并记录每一次调用

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::clients::JudgeApi;
use crate::error::TransportError;
use crate::models::result::{JudgeStatus, RawSubmissionResult};
use crate::models::submission::{BatchItem, SubmissionToken};

/// 被记录下来的一次调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JudgeCall {
    /// 批量提交，记录每项的 stdin
    CreateBatch(Vec<Option<String>>),
    FetchResult(String),
}

type Scripted = Result<RawSubmissionResult, u16>;

/// 脚本化的评测服务
///
/// 每个 token 的结果按顺序弹出，只剩最后一个时重复返回它
#[derive(Default)]
pub struct ScriptedJudge {
    batch: Option<Result<Vec<String>, u16>>,
    results: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<JudgeCall>>,
}

impl ScriptedJudge {
    pub fn new() -> Self {
        Self::default()
    }

    /// 批量提交成功时返回的 token
    pub fn with_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.batch = Some(Ok(tokens.into_iter().map(Into::into).collect()));
        self
    }

    /// 批量提交返回指定 HTTP 状态码
    pub fn with_batch_status(mut self, status: u16) -> Self {
        self.batch = Some(Err(status));
        self
    }

    /// 为某个 token 追加一次查询结果
    pub fn with_result(self, token: &str, result: RawSubmissionResult) -> Self {
        self.push(token, Ok(result));
        self
    }

    /// 为某个 token 追加一次失败的查询
    pub fn with_result_status(self, token: &str, status: u16) -> Self {
        self.push(token, Err(status));
        self
    }

    fn push(&self, token: &str, item: Scripted) {
        if let Ok(mut results) = self.results.lock() {
            results.entry(token.to_string()).or_default().push_back(item);
        }
    }

    /// 全部调用记录
    pub fn calls(&self) -> Vec<JudgeCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// 针对某个 token 的查询次数
    pub fn fetch_count(&self, token: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, JudgeCall::FetchResult(t) if t == token))
            .count()
    }

    fn record(&self, call: JudgeCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl JudgeApi for ScriptedJudge {
    async fn create_batch(
        &self,
        items: &[BatchItem<'_>],
    ) -> Result<Vec<SubmissionToken>, TransportError> {
        self.record(JudgeCall::CreateBatch(
            items.iter().map(|i| i.stdin.map(str::to_string)).collect(),
        ));
        match &self.batch {
            Some(Ok(tokens)) => Ok(tokens.iter().map(|t| SubmissionToken(t.clone())).collect()),
            Some(Err(status)) => Err(TransportError::Status {
                endpoint: "submissions/batch".to_string(),
                status: *status,
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_result(
        &self,
        token: &SubmissionToken,
    ) -> Result<RawSubmissionResult, TransportError> {
        self.record(JudgeCall::FetchResult(token.to_string()));
        let endpoint = format!("submissions/{}", token);
        let next = {
            let mut results = self.results.lock().map_err(|_| TransportError::Status {
                endpoint: endpoint.clone(),
                status: 500,
            })?;
            match results.get_mut(token.as_str()) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };
        match next {
            Some(Ok(raw)) => Ok(raw),
            Some(Err(status)) => Err(TransportError::Status { endpoint, status }),
            None => Err(TransportError::Status {
                endpoint,
                status: 404,
            }),
        }
    }
}

/// 构造原始结果（自动做 base64 编码）
#[derive(Debug, Clone, Default)]
pub struct FakeResult(RawSubmissionResult);

impl FakeResult {
    pub fn status(id: u32, description: &str) -> Self {
        Self(RawSubmissionResult {
            status: Some(JudgeStatus::new(id, description)),
            ..Default::default()
        })
    }

    pub fn processing() -> Self {
        Self::status(JudgeStatus::PROCESSING, "Processing")
    }

    pub fn accepted(stdout: &str) -> Self {
        Self::status(JudgeStatus::ACCEPTED, "Accepted").stdout(stdout)
    }

    pub fn stdout(mut self, text: &str) -> Self {
        self.0.stdout = Some(STANDARD.encode(text));
        self
    }

    pub fn stderr(mut self, text: &str) -> Self {
        self.0.stderr = Some(STANDARD.encode(text));
        self
    }

    pub fn compile_output(mut self, text: &str) -> Self {
        self.0.compile_output = Some(STANDARD.encode(text));
        self
    }

    pub fn build(self) -> RawSubmissionResult {
        self.0
    }
}
