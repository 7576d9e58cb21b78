//! 文件处理上下文
//!
//! 封装"我正在处理第几批的第几个文件、它对应哪条结果"这一信息

use std::fmt::Display;

/// 文件处理上下文
#[derive(Debug, Clone)]
pub struct FileCtx {
    /// 结果仓库中对应条目的 id
    pub id: String,

    /// 批次编号（仅用于日志显示）
    pub batch_index: usize,

    /// 文件在批次中的序号（从1开始）
    pub file_index: usize,

    /// 文件名
    pub file_name: String,
}

impl FileCtx {
    /// 创建新的文件上下文
    pub fn new(id: String, batch_index: usize, file_index: usize, file_name: String) -> Self {
        Self {
            id,
            batch_index,
            file_index,
            file_name,
        }
    }
}

impl Display for FileCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[批次#{} 文件#{} {}]",
            self.batch_index, self.file_index, self.file_name
        )
    }
}
