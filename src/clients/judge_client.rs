/// 评测服务 API 客户端
///
/// 封装所有与 Judge0 兼容评测服务的 HTTP 调用
use async_trait::async_trait;
use tracing::debug;

use crate::clients::JudgeApi;
use crate::config::Config;
use crate::error::TransportError;
use crate::models::result::RawSubmissionResult;
use crate::models::submission::{BatchItem, BatchRequest, BatchToken, SubmissionToken};

/// 查询结果时请求的字段
const RESULT_FIELDS: &str =
    "stdout,stderr,status,time,memory,expected_output,compile_output,finished_at,message";

/// 评测服务客户端
#[derive(Clone)]
pub struct Judge0Client {
    base_url: String,
    transport: reqwest::Client,
}

impl Judge0Client {
    /// 创建新的评测服务客户端
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(&config.judge_api_base_url)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn batch_url(&self) -> String {
        format!(
            "{}/submissions/batch?base64_encoded=false&wait=false",
            self.base_url
        )
    }

    fn result_url(&self, token: &SubmissionToken) -> String {
        format!(
            "{}/submissions/{}?base64_encoded=true&fields={}",
            self.base_url, token, RESULT_FIELDS
        )
    }
}

#[async_trait]
impl JudgeApi for Judge0Client {
    async fn create_batch(
        &self,
        items: &[BatchItem<'_>],
    ) -> Result<Vec<SubmissionToken>, TransportError> {
        let endpoint = "submissions/batch";
        let body = BatchRequest {
            submissions: items.to_vec(),
        };

        debug!("创建批量提交，共 {} 项", items.len());

        let resp = self
            .transport
            .post(self.batch_url())
            .json(&body)
            .send()
            .await
            .map_err(|source| TransportError::RequestFailed {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let tokens: Vec<BatchToken> =
            resp.json()
                .await
                .map_err(|source| TransportError::RequestFailed {
                    endpoint: endpoint.to_string(),
                    source,
                })?;

        Ok(tokens.into_iter().map(|t| t.token).collect())
    }

    async fn fetch_result(
        &self,
        token: &SubmissionToken,
    ) -> Result<RawSubmissionResult, TransportError> {
        let endpoint = format!("submissions/{}", token);

        let resp = self
            .transport
            .get(self.result_url(token))
            .send()
            .await
            .map_err(|source| TransportError::RequestFailed {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let raw: RawSubmissionResult = resp
            .json()
            .await
            .map_err(|source| TransportError::RequestFailed { endpoint, source })?;

        debug!("获取结果 {}: status={:?}", token, raw.status);

        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = Judge0Client::with_base_url("http://judge:2358/");
        assert_eq!(client.base_url(), "http://judge:2358");
        assert_eq!(
            client.batch_url(),
            "http://judge:2358/submissions/batch?base64_encoded=false&wait=false"
        );
        assert_eq!(
            client.result_url(&SubmissionToken::from("abc")),
            "http://judge:2358/submissions/abc?base64_encoded=true&fields=stdout,stderr,status,time,memory,expected_output,compile_output,finished_at,message"
        );
    }
}
