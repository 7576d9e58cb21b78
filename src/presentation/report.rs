//! 结果展示
//!
//! 把结果仓库渲染成终端文本，并在仓库变化时输出进度。

use crate::infrastructure::{ResultStore, StatusCounts};
use crate::models::{ExtractionResult, ExtractionState, RecordField, NOT_AVAILABLE};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// 标签列宽
const LABEL_WIDTH: usize = 22;

fn status_icon(result: &ExtractionResult) -> &'static str {
    match result.state() {
        ExtractionState::Pending => "🕓",
        ExtractionState::Loading => "⏳",
        ExtractionState::Success { .. } => "📄",
        ExtractionState::Error { .. } => "⚠️",
    }
}

/// 渲染单条结果；`position` 为显示序号（从 1 开始）
pub fn render_result(result: &ExtractionResult, position: usize) -> String {
    let mut output = format!(
        "[{}] {} {} ({})\n",
        position,
        status_icon(result),
        result.file_name(),
        result.status().as_str()
    );

    match result.state() {
        ExtractionState::Success { data } => {
            for field in RecordField::ALL {
                let value = data.get(field);
                let shown = if value == NOT_AVAILABLE {
                    format!("[{}]", NOT_AVAILABLE)
                } else {
                    value.to_string()
                };
                output.push_str(&format!(
                    "    {:<width$} {}\n",
                    field.label(),
                    shown,
                    width = LABEL_WIDTH
                ));
            }
        }
        ExtractionState::Error { error_message } => {
            output.push_str(&format!("    {}\n", error_message));
        }
        ExtractionState::Pending | ExtractionState::Loading => {}
    }

    output
}

/// 渲染全部结果（仓库顺序）
pub fn render_store(results: &[ExtractionResult]) -> String {
    let mut output = format!("Extracted Data ({})\n", results.len());
    for (idx, result) in results.iter().enumerate() {
        output.push('\n');
        output.push_str(&render_result(result, idx + 1));
    }
    output
}

/// 各状态数量摘要
pub fn render_counts(counts: &StatusCounts) -> String {
    format!(
        "共 {} 条: ⏳ {} 进行中, 📄 {} 成功, ⚠️ {} 失败",
        counts.total(),
        counts.pending + counts.loading,
        counts.success,
        counts.error
    )
}

/// 订阅仓库变化，输出指定条目的完成进度
///
/// 所有条目到达终态或被清空后自动退出。
///
/// # 参数
/// - `store`: 结果仓库
/// - `ids`: 需要跟踪的条目 id
pub fn watch_progress(store: Arc<ResultStore>, ids: Vec<String>) -> JoinHandle<()> {
    let mut changes = store.subscribe();
    tokio::spawn(async move {
        let total = ids.len();
        let mut last_settled = None;
        loop {
            // 已清空的条目视为结束
            let unsettled = ids
                .iter()
                .filter_map(|id| store.get(id))
                .filter(|entry| !entry.is_terminal())
                .count();
            let settled = total - unsettled;
            if last_settled != Some(settled) {
                last_settled = Some(settled);
                info!("📈 进度: {}/{}", settled, total);
            }
            if settled >= total || changes.changed().await.is_err() {
                break;
            }
        }
    })
}
