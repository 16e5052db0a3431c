//! 外部服务客户端
//!
//! `JudgeApi` 是编排层与评测服务之间的唯一接缝，测试中可以替换成内存实现

#[cfg(any(test, feature = "test-util"))]
pub mod fake;
pub mod judge_client;

#[cfg(any(test, feature = "test-util"))]
pub use fake::ScriptedJudge;
pub use judge_client::Judge0Client;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::models::result::RawSubmissionResult;
use crate::models::submission::{BatchItem, SubmissionToken};

/// 评测服务的原始调用能力
#[async_trait]
pub trait JudgeApi: Send + Sync {
    /// 批量创建提交（不等待执行完成），返回与输入顺序一致的 token
    async fn create_batch(
        &self,
        items: &[BatchItem<'_>],
    ) -> Result<Vec<SubmissionToken>, TransportError>;

    /// 获取单个提交的原始结果（文本字段仍为 base64）
    async fn fetch_result(
        &self,
        token: &SubmissionToken,
    ) -> Result<RawSubmissionResult, TransportError>;
}
