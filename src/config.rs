use crate::error::ConfigError;
use std::str::FromStr;
use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 评测服务地址（Judge0 兼容 API）
    pub judge_api_base_url: String,
    /// 轮询间隔（毫秒）
    pub poll_interval_ms: u64,
    /// 单个 token 的最大轮询次数，None 表示一直轮询直到结束
    pub max_poll_attempts: Option<u32>,
    /// 题目文件（TOML）
    pub problem_file: String,
    /// 源代码文件，未设置时使用题目模板或语言默认代码
    pub source_file: Option<String>,
    /// 运行语言，未设置时使用题目指定的语言
    pub language: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            judge_api_base_url: "http://localhost:2358".to_string(),
            poll_interval_ms: 1000,
            max_poll_attempts: None,
            problem_file: "problem.toml".to_string(),
            source_file: None,
            language: None,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载配置，未设置的项使用默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();
        let config = Self {
            judge_api_base_url: std::env::var("JUDGE0_URI").unwrap_or(default.judge_api_base_url),
            poll_interval_ms: parse_env("POLL_INTERVAL_MS", "u64")?.unwrap_or(default.poll_interval_ms),
            max_poll_attempts: parse_env("MAX_POLL_ATTEMPTS", "u32")?.or(default.max_poll_attempts),
            problem_file: std::env::var("PROBLEM_FILE").unwrap_or(default.problem_file),
            source_file: std::env::var("SOURCE_FILE").ok().or(default.source_file),
            language: std::env::var("JUDGE_LANGUAGE").ok().or(default.language),
            verbose_logging: parse_env("VERBOSE_LOGGING", "bool")?.unwrap_or(default.verbose_logging),
        };
        config.validate()?;
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.judge_api_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "JUDGE0_URI".to_string(),
                reason: "评测服务地址不能为空".to_string(),
            });
        }
        if self.max_poll_attempts == Some(0) {
            return Err(ConfigError::InvalidValue {
                name: "MAX_POLL_ATTEMPTS".to_string(),
                reason: "最大轮询次数必须大于 0".to_string(),
            });
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn parse_env<T: FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_polls_every_second_without_limit() {
        let config = Config::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.max_poll_attempts, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_attempts_is_rejected() {
        let config = Config {
            max_poll_attempts: Some(0),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_language_comes_from_judge_language() {
        std::env::set_var("LANGUAGE", "en_US:en");
        std::env::set_var("JUDGE_LANGUAGE", "python");
        let config = Config::from_env();
        std::env::remove_var("JUDGE_LANGUAGE");
        std::env::remove_var("LANGUAGE");

        assert_eq!(config.unwrap().language.as_deref(), Some("python"));
    }

    #[test]
    fn test_blank_base_url_is_rejected() {
        let config = Config {
            judge_api_base_url: "  ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
