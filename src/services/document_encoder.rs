//! 文档编码服务 - 业务能力层
//!
//! 只负责"把文件读成可传输的 data URI"，不关心后续流程

use crate::error::{ExtractResult, ExtractionError};
use crate::models::SourceFile;
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::debug;

/// 自描述的文档载荷：`data:<媒体类型>;base64,<内容>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedDocument {
    data_uri: String,
}

impl EncodedDocument {
    /// 由原始字节构造
    pub fn from_bytes(media_type: &str, bytes: &[u8]) -> Self {
        Self {
            data_uri: format!("data:{};base64,{}", media_type, STANDARD.encode(bytes)),
        }
    }

    /// 直接包装已有的 data URI（或裸 base64 文本）
    pub fn from_data_uri(data_uri: impl Into<String>) -> Self {
        Self {
            data_uri: data_uri.into(),
        }
    }

    pub fn as_data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn len(&self) -> usize {
        self.data_uri.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data_uri.is_empty()
    }
}

/// 文档编码器
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentEncoder;

impl DocumentEncoder {
    pub fn new() -> Self {
        Self
    }

    /// 读取文件并编码
    ///
    /// # 参数
    /// - `file`: 选择的源文件
    ///
    /// # 返回
    /// `data:<媒体类型>;base64,<内容>` 形式的文档；读取失败返回 `ExtractionError::Read`
    pub async fn encode(&self, file: &SourceFile) -> ExtractResult<EncodedDocument> {
        let bytes = tokio::fs::read(file.path())
            .await
            .map_err(|e| ExtractionError::read_failed(file.path().display().to_string(), e))?;

        debug!("读取文件 {}: {} 字节", file.name(), bytes.len());

        Ok(EncodedDocument::from_bytes(file.media_type(), &bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_builds_data_uri() {
        let doc = EncodedDocument::from_bytes("application/pdf", b"%PDF");
        assert_eq!(doc.as_data_uri(), "data:application/pdf;base64,JVBERg==");
    }

    #[tokio::test]
    async fn test_encode_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let doc = DocumentEncoder::new()
            .encode(&SourceFile::from_path(&path))
            .await
            .unwrap();

        assert!(doc.as_data_uri().starts_with("data:application/pdf;base64,"));
        assert!(!doc.is_empty());
    }

    #[tokio::test]
    async fn test_encode_missing_file_is_read_error() {
        let result = DocumentEncoder::new()
            .encode(&SourceFile::from_path("/nonexistent/A.pdf"))
            .await;

        assert!(matches!(result, Err(ExtractionError::Read { .. })));
    }
}
