use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "research_extract.toml";

/// 程序配置
///
/// 加载优先级：默认值 < TOML 配置文件 < 环境变量
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 同时进行提取的文件数量上限
    pub max_concurrent_files: usize,
    /// 未通过命令行指定文件时扫描的目录
    pub input_folder: String,
    /// TSV 导出文件
    pub output_tsv_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 处理完初始文件后是否进入交互控制台
    pub interactive: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 模型内部推理的 token 预算
    pub thinking_budget: u32,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_files: 8,
            input_folder: "input_pdf".to_string(),
            output_tsv_file: "extracted.tsv".to_string(),
            verbose_logging: false,
            interactive: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            llm_model_name: "gemini-3-pro-preview".to_string(),
            thinking_budget: 1024,
            request_timeout_secs: 300,
        }
    }
}

impl Config {
    /// 按优先级加载配置：默认值 → 配置文件（若存在）→ 环境变量
    ///
    /// 配置文件路径取 `CONFIG_FILE` 环境变量，否则使用当前目录下的
    /// `research_extract.toml`；文件不存在时直接跳过。
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let base = if Path::new(&path).exists() {
            Self::from_toml_file(&path)?
        } else {
            Self::default()
        };
        base.with_env_overrides()
    }

    /// 只使用环境变量覆盖默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件读取配置，缺省字段取默认值
    pub fn from_toml_file(path: &str) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
                path: path.to_string(),
                source,
            })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_string(),
            source,
        })
    }

    /// 从 TOML 文本解析配置
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖当前配置
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        Ok(Self {
            max_concurrent_files: env_parse("MAX_CONCURRENT_FILES", "usize")?
                .unwrap_or(self.max_concurrent_files),
            input_folder: std::env::var("INPUT_FOLDER").unwrap_or(self.input_folder),
            output_tsv_file: std::env::var("OUTPUT_TSV_FILE").unwrap_or(self.output_tsv_file),
            verbose_logging: env_parse("VERBOSE_LOGGING", "bool")?.unwrap_or(self.verbose_logging),
            interactive: env_parse("INTERACTIVE", "bool")?.unwrap_or(self.interactive),
            llm_api_key: std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("API_KEY"))
                .unwrap_or(self.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            thinking_budget: env_parse("THINKING_BUDGET", "u32")?.unwrap_or(self.thinking_budget),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", "u64")?
                .unwrap_or(self.request_timeout_secs),
        })
    }

    /// 校验必填项
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }
}

/// 读取并解析环境变量；变量不存在时返回 `None`
fn env_parse<T: FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
