//! 单个 token 的轮询流程
//!
//! 反复获取结果，未结束则固定间隔后重试；获取失败立即返回，不做重试

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::clients::JudgeApi;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::result::ExecutionResult;
use crate::models::submission::SubmissionToken;
use crate::services::SubmissionService;

/// 轮询策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// 两次查询之间的间隔
    pub interval: Duration,
    /// 最大查询次数，None 表示不限
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: None,
        }
    }
}

impl PollPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.poll_interval(),
            max_attempts: config.max_poll_attempts,
        }
    }
}

/// 轮询直到结果进入终态（status.id >= 3）
pub async fn poll_until_terminal<J: JudgeApi>(
    service: &SubmissionService<J>,
    token: &SubmissionToken,
    policy: PollPolicy,
) -> AppResult<ExecutionResult> {
    let mut attempts: u32 = 0;
    loop {
        let result = service.get_submission_result(token).await?;
        attempts += 1;

        if result.is_terminal() {
            debug!("token {} 已结束 (第 {} 次查询): {:?}", token, attempts, result.status);
            return Ok(result);
        }

        if policy.max_attempts.is_some_and(|max| attempts >= max) {
            return Err(AppError::PollLimitExceeded {
                token: token.to_string(),
                attempts,
            });
        }

        debug!("token {} 尚未结束 (第 {} 次查询)，等待后重试", token, attempts);
        sleep(policy.interval).await;
    }
}
