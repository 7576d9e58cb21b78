use crate::models::source_file::SourceFile;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::fs;

/// 有文件因类型不符被忽略时的汇总提示
pub const IGNORED_NOTICE: &str = "Some files were ignored because they are not valid PDFs.";

/// 一次文件选择的筛选结果
#[derive(Debug, Default, Clone)]
pub struct FileSelection {
    /// 保持原始顺序的 PDF 文件
    pub accepted: Vec<SourceFile>,
    /// 被忽略的文件名
    pub rejected: Vec<String>,
}

impl FileSelection {
    /// 有文件被忽略时返回一条汇总提示
    pub fn notice(&self) -> Option<&'static str> {
        if self.rejected.is_empty() {
            None
        } else {
            Some(IGNORED_NOTICE)
        }
    }
}

/// 从选择的文件中筛选出 PDF
///
/// 非 PDF 文件不会产生任何结果条目；只要有文件被忽略，就输出一条汇总警告。
///
/// # 参数
/// - `files`: 用户选择的文件（保持原始顺序）
///
/// # 返回
/// 接受与忽略的文件
pub fn select_pdf_files<I>(files: I) -> FileSelection
where
    I: IntoIterator<Item = SourceFile>,
{
    let mut selection = FileSelection::default();

    for file in files {
        if file.is_pdf() {
            selection.accepted.push(file);
        } else {
            tracing::debug!("忽略非 PDF 文件: {} ({})", file.name(), file.media_type());
            selection.rejected.push(file.name().to_string());
        }
    }

    if let Some(notice) = selection.notice() {
        tracing::warn!("⚠️ {} ({} 个)", notice, selection.rejected.len());
    }

    selection
}

/// 按路径列表构造文件选择
pub fn select_paths<I, P>(paths: I) -> FileSelection
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    select_pdf_files(paths.into_iter().map(SourceFile::from_path))
}

/// 列出文件夹中的所有文件（按文件名排序，不递归）
///
/// # 参数
/// - `folder_path`: 输入目录
///
/// # 返回
/// 目录中的所有文件，是否为 PDF 由调用方筛选
pub async fn scan_input_folder(folder_path: &str) -> Result<Vec<SourceFile>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        }
    }

    paths.sort();
    tracing::info!("📁 在 {} 中找到 {} 个文件", folder_path, paths.len());

    Ok(paths.into_iter().map(SourceFile::from_path).collect())
}
