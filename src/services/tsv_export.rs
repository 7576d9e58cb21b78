//! TSV 导出服务 - 业务能力层
//!
//! 单条结果导出为一行制表符分隔文本，可直接粘贴进电子表格。
//! 字段内的制表符和换行不做转义，数据来源是模型提取的正文而非结构化输入。

use crate::models::{ExtractionResult, RecordField};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// 单条结果的 TSV 行；只有成功的结果才能导出
pub fn tsv_line(result: &ExtractionResult) -> Option<String> {
    result.data().map(|data| data.to_tsv_row())
}

/// 表头行（字段显示名称，规范顺序）
pub fn header_line() -> String {
    RecordField::ALL
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join("\t")
}

/// 生成包含表头和所有成功结果的 TSV 文本
pub fn render_tsv(results: &[ExtractionResult]) -> String {
    let mut output = header_line();
    output.push('\n');
    for line in results.iter().filter_map(tsv_line) {
        output.push_str(&line);
        output.push('\n');
    }
    output
}

/// 写入 TSV 文件
///
/// # 参数
/// - `path`: 导出文件路径（覆盖写入）
/// - `results`: 待导出的结果，只有成功的条目会写入
///
/// # 返回
/// 导出的行数（不含表头）
pub async fn write_tsv(path: impl AsRef<Path>, results: &[ExtractionResult]) -> Result<usize> {
    let path = path.as_ref();
    let rows = results.iter().filter(|r| r.data().is_some()).count();

    tokio::fs::write(path, render_tsv(results))
        .await
        .with_context(|| format!("无法写入导出文件: {}", path.display()))?;

    info!("💾 已导出 {} 条结果至: {}", rows, path.display());
    Ok(rows)
}
