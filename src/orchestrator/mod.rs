//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量提交和并发调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_orchestrator` - 批量文件编排器
//! - 一次性写入整批 loading 结果（保持选择顺序）
//! - 每个文件独立启动任务，失败互不影响
//! - 控制并发数量（Semaphore）
//! - 汇总批次统计信息
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行）
//! - 初始文件选择、结果报告、TSV 导出
//! - 交互控制台
//!
//! ## 层次关系
//!
//! ```text
//! app (处理一次文件选择)
//!     ↓
//! batch_orchestrator (处理 Vec<SourceFile>)
//!     ↓
//! workflow::FileFlow (处理单个文件)
//!     ↓
//! services (能力层：encode / extract / export)
//!     ↓
//! infrastructure (基础设施：ResultStore)
//! ```

pub mod app;
pub mod batch_orchestrator;

// 重新导出主要类型
pub use app::App;
pub use batch_orchestrator::{BatchHandle, BatchOrchestrator, BatchSummary};
