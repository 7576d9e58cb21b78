//! 元数据提取服务 - 业务能力层
//!
//! 只负责"一篇文档 → 一条记录"的能力，不关心批次和流程
//!
//! ## 技术栈
//! - 通过 `GeminiClient` 直接调用 Gemini REST API
//! - 文档以内联数据发送，输出受固定的 JSON schema 约束
//! - 为模型分配固定的推理预算，以准确率优先

use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};
use tracing::debug;

use crate::clients::gemini_client::{
    Content, GenerateContentRequest, GenerationConfig, Part, ThinkingConfig,
};
use crate::clients::GeminiClient;
use crate::config::Config;
use crate::error::{ExtractResult, ExtractionError};
use crate::models::{ExtractedRecord, RecordField, PDF_MEDIA_TYPE};
use crate::services::document_encoder::EncodedDocument;

/// 固定的提取指令
pub const EXTRACTION_PROMPT: &str = r#"
You are an expert research assistant specializing in plant pathology and molecular biology.

Analyze the provided research article PDF and extract specific metadata with high precision.

Extract the following fields:
- Title
- Full Citation (APA Style)
- DOI
- Crop (Host plant)
- Pathogen Name
- Pathogen Type (e.g., Virus, Bacteria, Fungus)
- Microbiome Type (e.g., Root, Soil, Stem)
- Affected Plant Parts
- Primer Name (Specific primers mentioned)
- Database Used (e.g., NCBI, SILVA, UNITE)
- Analysis Pipeline (Software/Bioinformatics tools)
- Stat Tools (Statistical software)
- Sequencing Platform (Hardware used for sequencing)

If a specific piece of information is not explicitly stated or cannot be confidently inferred from the text, you MUST return the string "Not Available" for that field. Do not hallucinate data.
"#;

/// 文档提取能力
///
/// 每次调用对应一次外部请求，不做重试，由调用方决定重试策略。
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// 从编码后的文档中提取记录
    async fn extract(&self, document: &EncodedDocument) -> ExtractResult<ExtractedRecord>;

    /// 用于日志的名称
    fn name(&self) -> &str;
}

/// 去掉 data URI 前缀后的文档：媒体类型 + 裸 base64 内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineDocument {
    pub mime_type: String,
    pub data: String,
}

impl InlineDocument {
    /// 规范化 data URI
    ///
    /// 没有 `data:...;base64,` 前缀时整段文本都视为内容，媒体类型默认为 PDF。
    ///
    /// # 参数
    /// - `data_uri`: data URI 或裸 base64 文本
    ///
    /// # 返回
    /// 规范化后的文档；内容为空时返回 `InvalidDocument`
    pub fn from_data_uri(data_uri: &str) -> ExtractResult<Self> {
        let re = Regex::new(r"^data:([^,]*?);base64,").map_err(|e| {
            ExtractionError::InvalidDocument {
                reason: e.to_string(),
            }
        })?;

        let (mime_type, data) = match re.captures(data_uri) {
            Some(caps) => {
                let prefix_end = caps.get(0).map(|m| m.end()).unwrap_or(0);
                let mime_type = caps
                    .get(1)
                    .map(|m| m.as_str())
                    .filter(|m| !m.is_empty())
                    .unwrap_or(PDF_MEDIA_TYPE);
                (mime_type, &data_uri[prefix_end..])
            }
            None => (PDF_MEDIA_TYPE, data_uri),
        };

        if data.trim().is_empty() {
            return Err(ExtractionError::InvalidDocument {
                reason: "文档内容为空".to_string(),
            });
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }
}

/// 固定输出结构：13 个必填字符串字段
pub fn response_schema() -> Value {
    let mut properties = serde_json::Map::new();
    for field in RecordField::ALL {
        properties.insert(
            field.key().to_string(),
            json!({
                "type": "STRING",
                "description": field.description(),
            }),
        );
    }
    let keys: Vec<&str> = RecordField::ALL.iter().map(|f| f.key()).collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": keys,
        "propertyOrdering": keys,
    })
}

/// 构建一次提取请求
///
/// # 参数
/// - `document`: 内联文档
/// - `thinking_budget`: 推理 token 预算
pub fn build_request(document: &InlineDocument, thinking_budget: u32) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part::inline_data(&document.mime_type, &document.data),
                Part::text(EXTRACTION_PROMPT),
            ],
        }],
        generation_config: Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(response_schema()),
            thinking_config: Some(ThinkingConfig { thinking_budget }),
        }),
    }
}

/// 把模型输出解析为记录
///
/// 必须恰好是 13 个字符串字段；允许外层包裹 markdown 代码块。
pub fn parse_record(text: &str) -> ExtractResult<ExtractedRecord> {
    let json = strip_code_fence(text);
    let record: ExtractedRecord = serde_json::from_str(json)?;
    Ok(record.normalize_sentinels())
}

/// 把一次调用的输出转换为记录
///
/// # 参数
/// - `text`: 模型输出的文本；服务没有返回内容时为 `None`
/// - `model`: 模型名称（用于错误信息）
///
/// # 返回
/// 解析后的记录；没有内容时返回 `EmptyResponse`
pub fn record_from_response(text: Option<String>, model: &str) -> ExtractResult<ExtractedRecord> {
    let text = text.ok_or_else(|| ExtractionError::EmptyResponse {
        model: model.to_string(),
    })?;
    parse_record(&text)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}

/// 基于 Gemini 的提取服务
pub struct ExtractionService {
    client: GeminiClient,
    thinking_budget: u32,
}

impl ExtractionService {
    /// 创建新的提取服务
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            client: GeminiClient::new(config)?,
            thinking_budget: config.thinking_budget,
        })
    }
}

#[async_trait]
impl DocumentExtractor for ExtractionService {
    async fn extract(&self, document: &EncodedDocument) -> ExtractResult<ExtractedRecord> {
        let inline = InlineDocument::from_data_uri(document.as_data_uri())?;
        debug!(
            "提取文档: {}，base64 长度: {}",
            inline.mime_type,
            inline.data.len()
        );

        let request = build_request(&inline, self.thinking_budget);
        let text = self.client.generate_content(&request).await?;

        record_from_response(text, self.client.model_name())
    }

    fn name(&self) -> &str {
        self.client.model_name()
    }
}
