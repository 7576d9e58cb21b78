//! 展示层
//!
//! 只读取结果仓库并与用户交互，不包含提取逻辑。

pub mod console;
pub mod report;

pub use report::{render_counts, render_result, render_store, watch_progress};
