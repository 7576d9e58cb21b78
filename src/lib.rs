//! # Research Extract
//!
//! 从科研论文 PDF 中批量提取结构化文献信息的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有共享状态，只暴露能力
//! - `ResultStore` - 唯一的结果列表 owner，提供原子插入、按 id 更新、清空和变更通知
//!
//! ### ② 业务能力层（Services / Clients）
//! - `clients/` - `GeminiClient`，调用 generateContent 接口
//! - `services/` - 描述"我能做什么"，只处理单个文件
//! - `DocumentEncoder` - 读取文件并编码为 data URI
//! - `ExtractionService` - 构造请求、解析 13 个字段
//! - `tsv_export` - 导出为可粘贴进表格的 TSV
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个文件"的完整处理流程
//! - `FileCtx` - 上下文封装（batch_index + file_index）
//! - `FileFlow` - 流程编排（encode → extract → update）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_orchestrator` - 批量提交，控制并发
//! - `orchestrator/app` - 应用入口，报告、导出和交互控制台
//!
//! ### ⑤ 展示层（Presentation）
//! - `presentation/` - 只读取结果仓库，渲染报告和进度

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod presentation;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{ConfigError, ExtractResult, ExtractionError};
pub use infrastructure::ResultStore;
pub use models::{ExtractedRecord, ExtractionResult, ExtractionState, RecordField, SourceFile};
pub use orchestrator::{App, BatchOrchestrator, BatchSummary};
pub use services::{DocumentExtractor, EncodedDocument, ExtractionService};
pub use workflow::{FileCtx, FileFlow, FileOutcome};
