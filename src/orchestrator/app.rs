//! 应用入口 - 编排层
//!
//! 持有配置、结果仓库和批量编排器，负责：
//! - 初始文件选择（命令行参数或输入目录）
//! - 等待批次完成、输出报告、导出 TSV
//! - 需要时进入交互控制台

use crate::config::Config;
use crate::infrastructure::ResultStore;
use crate::models::{scan_input_folder, select_pdf_files, FileSelection, SourceFile};
use crate::orchestrator::batch_orchestrator::{BatchHandle, BatchOrchestrator, BatchSummary};
use crate::presentation::{console, report};
use crate::services::{tsv_export, DocumentExtractor, ExtractionService};
use crate::utils::logging::{log_files_selected, log_startup, print_final_stats};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    orchestrator: BatchOrchestrator,
}

impl App {
    /// 初始化应用（使用 Gemini 提取服务）
    pub fn initialize(config: Config) -> Result<Self> {
        config.validate()?;
        log_startup(&config);

        let extractor: Arc<dyn DocumentExtractor> = Arc::new(ExtractionService::new(&config)?);
        Ok(Self::with_extractor(config, extractor))
    }

    /// 使用指定的提取器创建应用
    pub fn with_extractor(config: Config, extractor: Arc<dyn DocumentExtractor>) -> Self {
        let store = Arc::new(ResultStore::new());
        let orchestrator =
            BatchOrchestrator::new(extractor, store, config.max_concurrent_files);
        Self {
            config,
            orchestrator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<ResultStore> {
        self.orchestrator.store()
    }

    /// 是否有文件仍在处理
    pub fn is_processing(&self) -> bool {
        self.orchestrator.is_processing()
    }

    /// 运行应用主逻辑
    ///
    /// `paths` 为空时扫描配置的输入目录。
    pub async fn run(&self, paths: Vec<String>) -> Result<()> {
        let files = self.initial_files(paths).await?;

        if files.is_empty() {
            warn!("⚠️ 没有找到待处理的文件");
        } else if let Some(summary) = self.process_selection(select_pdf_files(files)).await {
            println!("{}", self.report());
            self.export(None).await?;
            print_final_stats(&summary, &self.config.output_tsv_file);
        }

        if self.config.interactive {
            console::run(self).await?;
        }

        Ok(())
    }

    async fn initial_files(&self, paths: Vec<String>) -> Result<Vec<SourceFile>> {
        if !paths.is_empty() {
            return Ok(paths.into_iter().map(SourceFile::from_path).collect());
        }

        if !Path::new(&self.config.input_folder).exists() {
            warn!("⚠️ 输入目录不存在: {}", self.config.input_folder);
            return Ok(Vec::new());
        }

        info!("\n📁 正在扫描待处理的文件...");
        scan_input_folder(&self.config.input_folder).await
    }

    /// 提交一次文件选择，不等待提取结束
    ///
    /// # 参数
    /// - `selection`: 经过 PDF 过滤的文件选择
    ///
    /// # 返回
    /// 本批的句柄；没有可处理的 PDF 时返回 `None`
    pub fn submit_selection(&self, selection: FileSelection) -> Option<BatchHandle> {
        log_files_selected(selection.accepted.len(), selection.rejected.len());
        if selection.accepted.is_empty() {
            return None;
        }
        Some(self.submit(selection.accepted))
    }

    /// 处理一次文件选择并等待全部结束；没有可处理的 PDF 时返回 `None`
    pub async fn process_selection(&self, selection: FileSelection) -> Option<BatchSummary> {
        Some(self.submit_selection(selection)?.wait().await)
    }

    /// 提交一批文件，同时在后台输出进度
    pub fn submit(&self, files: Vec<SourceFile>) -> BatchHandle {
        let handle = self.orchestrator.submit(files);
        report::watch_progress(self.store().clone(), handle.ids());
        handle
    }

    /// 提交一批文件并等待全部结束
    pub async fn process(&self, files: Vec<SourceFile>) -> BatchSummary {
        self.submit(files).wait().await
    }

    /// 渲染当前所有结果
    pub fn report(&self) -> String {
        report::render_store(&self.store().snapshot())
    }

    /// 各状态数量的一行摘要
    pub fn status_line(&self) -> String {
        report::render_counts(&self.store().counts())
    }

    /// 复制一条结果为 TSV 行
    ///
    /// # 参数
    /// - `position`: 显示序号（从 1 开始）
    ///
    /// # 返回
    /// 该条结果的 TSV 行；序号越界或结果未成功时返回 `None`
    pub fn copy_line(&self, position: usize) -> Option<String> {
        let index = position.checked_sub(1)?;
        let result = self.store().get_at(index)?;
        tsv_export::tsv_line(&result)
    }

    /// 导出所有成功结果
    ///
    /// # 参数
    /// - `path`: 导出路径；为 `None` 时使用配置中的导出文件
    ///
    /// # 返回
    /// 导出的行数（不含表头）
    pub async fn export(&self, path: Option<&str>) -> Result<usize> {
        let path = path.unwrap_or(&self.config.output_tsv_file);
        tsv_export::write_tsv(path, &self.store().successful()).await
    }

    /// 清空全部结果，必须经过用户确认
    pub fn clear_results(&self, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        let count = self.store().len();
        self.store().clear();
        info!("🗑️ 已清空 {} 条结果", count);
        true
    }
}
