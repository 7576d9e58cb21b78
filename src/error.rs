use thiserror::Error;

/// 单个文件提取过程中的错误
///
/// 所有变体都只影响当前文件，由流程层在单文件边界转换为 `error` 状态，
/// 不会向批次层传播。
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// 读取本地文件失败
    #[error("读取文件失败 ({path}): {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 文档载荷无法规范化（例如 base64 内容为空）
    #[error("文档载荷无效: {reason}")]
    InvalidDocument { reason: String },

    /// 网络请求失败
    #[error("请求提取服务失败 ({endpoint}): {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 服务返回非成功状态码
    #[error("提取服务返回错误响应: status={status}, message={message}")]
    Service { status: u16, message: String },

    /// 服务没有返回任何内容
    #[error("提取服务返回内容为空 (模型: {model})")]
    EmptyResponse { model: String },

    /// 返回内容无法解析为固定的记录结构
    #[error("无法解析提取结果: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 缺少 API 密钥
    #[error("缺少 LLM API 密钥，请设置环境变量 GEMINI_API_KEY 或 API_KEY")]
    MissingApiKey,

    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

// ========== 便捷构造函数 ==========

impl ExtractionError {
    /// 创建文件读取错误
    pub fn read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        ExtractionError::Read {
            path: path.into(),
            source,
        }
    }

    /// 创建网络请求错误
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        ExtractionError::Request {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 错误类别（仅用于诊断日志）
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::Read { .. } => "read",
            ExtractionError::InvalidDocument { .. } => "invalid_document",
            ExtractionError::Request { .. } => "network",
            ExtractionError::Service { .. } => "service",
            ExtractionError::EmptyResponse { .. } => "empty_response",
            ExtractionError::Parse { .. } => "parse",
        }
    }
}

impl From<serde_json::Error> for ExtractionError {
    fn from(err: serde_json::Error) -> Self {
        ExtractionError::Parse { source: err }
    }
}

// ========== Result 类型别名 ==========

/// 提取结果类型
pub type ExtractResult<T> = Result<T, ExtractionError>;
