use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 参数校验错误（不会发起任何网络请求）
    #[error("参数校验失败: {0}")]
    Validation(#[from] ValidationError),
    /// 评测服务调用错误
    #[error("评测服务错误: {0}")]
    Transport(#[from] TransportError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 轮询次数超出上限
    #[error("轮询超出上限 (token: {token}): 已尝试 {attempts} 次")]
    PollLimitExceeded { token: String, attempts: u32 },
    /// 诊断正则编译失败
    #[error("正则表达式错误: {0}")]
    Regex(#[from] regex::Error),
    /// 其他错误
    #[error("错误: {0}")]
    Other(String),
}

/// 参数校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 源代码为空
    #[error("源代码不能为空")]
    MissingSource,
    /// 未指定语言
    #[error("必须指定语言 ID")]
    MissingLanguage,
    /// 不支持的语言
    #[error("不支持的编程语言: {0}")]
    UnsupportedLanguage(String),
    /// 当前题目不允许该语言
    #[error("当前题目不允许使用该语言: {0}")]
    LanguageNotAllowed(String),
    /// 没有测试用例
    #[error("至少需要一个测试用例")]
    NoTestCases,
}

/// 评测服务调用错误
#[derive(Debug, Error)]
pub enum TransportError {
    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 评测服务返回非成功状态码
    #[error("{status} 评测服务拒绝请求 ({endpoint})")]
    Status { endpoint: String, status: u16 },
    /// 响应字段解码失败
    #[error("字段 {field} 解码失败: {source}")]
    Decode {
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },
}

impl TransportError {
    /// 评测服务返回的 HTTP 状态码（如果有）
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::RequestFailed { source, .. } => source.status().map(|s| s.as_u16()),
            TransportError::Decode { .. } => None,
        }
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置项取值非法
    #[error("配置项 {name} 非法: {reason}")]
    InvalidValue { name: String, reason: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建状态码错误
    pub fn bad_status(endpoint: impl Into<String>, status: u16) -> Self {
        AppError::Transport(TransportError::Status {
            endpoint: endpoint.into(),
            status,
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 评测服务返回的 HTTP 状态码（仅传输错误有）
    pub fn http_status(&self) -> Option<u16> {
        match self {
            AppError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
