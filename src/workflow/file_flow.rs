//! 文件处理流程 - 流程层
//!
//! 核心职责：定义"一个文件"的完整处理流程
//!
//! 流程顺序：
//! 1. 编码文件（读取 → data URI）
//! 2. 调用提取服务
//! 3. 更新结果仓库（成功写入数据，任何失败写入固定提示）

use std::sync::Arc;

use tracing::{error, info};

use crate::error::ExtractResult;
use crate::infrastructure::ResultStore;
use crate::models::{ExtractedRecord, ExtractionState, SourceFile};
use crate::services::{DocumentEncoder, DocumentExtractor};
use crate::workflow::file_ctx::FileCtx;

/// 文件处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// 提取成功
    Success,
    /// 读取、请求或解析失败
    Failed,
}

/// 文件处理流程
///
/// - 编排单个文件的 编码 → 提取 → 回写
/// - 失败在这里被捕获并转换为 `error` 状态，不向批次层传播
/// - 用户看到的提示固定不变，具体原因只写进日志
pub struct FileFlow {
    encoder: DocumentEncoder,
    extractor: Arc<dyn DocumentExtractor>,
    store: Arc<ResultStore>,
}

impl FileFlow {
    /// 创建新的文件处理流程
    pub fn new(extractor: Arc<dyn DocumentExtractor>, store: Arc<ResultStore>) -> Self {
        Self {
            encoder: DocumentEncoder::new(),
            extractor,
            store,
        }
    }

    pub fn store(&self) -> &Arc<ResultStore> {
        &self.store
    }

    /// 执行完整流程
    ///
    /// # 参数
    /// - `ctx`: 文件上下文（条目 id 与日志前缀）
    /// - `file`: 源文件
    ///
    /// # 返回
    /// 本文件的处理结果；任何错误都在这里转换为 `error` 状态
    pub async fn run(&self, ctx: &FileCtx, file: &SourceFile) -> FileOutcome {
        info!("{} 🔄 开始提取", ctx);

        match self.extract_file(ctx, file).await {
            Ok(record) => {
                info!("{} ✅ 提取成功: {}", ctx, record.title);
                self.store
                    .update(&ctx.id, ExtractionState::Success { data: record });
                FileOutcome::Success
            }
            Err(e) => {
                error!("{} ❌ 提取失败 ({}): {}", ctx, e.kind(), e);
                self.store.update(&ctx.id, ExtractionState::failed());
                FileOutcome::Failed
            }
        }
    }

    async fn extract_file(&self, ctx: &FileCtx, file: &SourceFile) -> ExtractResult<ExtractedRecord> {
        let document = self.encoder.encode(file).await?;
        tracing::debug!(
            "{} 编码完成，载荷长度: {}，提取器: {}",
            ctx,
            document.len(),
            self.extractor.name()
        );
        self.extractor.extract(&document).await
    }
}
