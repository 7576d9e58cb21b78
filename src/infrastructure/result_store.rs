//! 结果仓库 - 基础设施层
//!
//! 整个系统中唯一的共享可变资源。
//!
//! - 所有修改都是同步的，并在一次加锁内完成，读者不会看到修改了一半的状态
//! - 每次有效修改都会递增版本号，并通过 `watch` 通道通知订阅者
//! - 按 id 更新时 id 不存在直接忽略（清空之后迟到的更新）

use crate::models::{ExtractionResult, ExtractionState, ExtractionStatus};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::watch;
use tracing::debug;

/// 各状态的条目数量
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub loading: usize,
    pub success: usize,
    pub error: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.pending + self.loading + self.success + self.error
    }

    /// 已到达终态的数量
    pub fn settled(&self) -> usize {
        self.success + self.error
    }
}

/// 有序的结果集合，按 id 寻址
///
/// 最新提交的批次排在最前，批次内部保持文件原始顺序。
pub struct ResultStore {
    entries: RwLock<Vec<ExtractionResult>>,
    changes: watch::Sender<u64>,
}

impl ResultStore {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            entries: RwLock::new(Vec::new()),
            changes,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<ExtractionResult>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<ExtractionResult>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self) {
        self.changes.send_modify(|version| *version += 1);
    }

    /// 将整批条目插入到最前面，保持批内顺序
    ///
    /// # 参数
    /// - `batch`: 本批的 loading 条目（提交顺序）；为空时不做任何事
    pub fn insert_batch(&self, batch: Vec<ExtractionResult>) {
        if batch.is_empty() {
            return;
        }
        let count = batch.len();
        {
            let mut entries = self.write();
            entries.splice(0..0, batch);
        }
        debug!("插入 {} 条结果", count);
        self.notify();
    }

    /// 更新指定 id 的条目状态
    ///
    /// # 参数
    /// - `id`: 条目 id
    /// - `state`: 新状态
    ///
    /// # 返回
    /// 是否实际发生了修改。id 不存在或条目已是终态时不做任何事。
    pub fn update(&self, id: &str, state: ExtractionState) -> bool {
        let applied = {
            let mut entries = self.write();
            match entries.iter_mut().find(|entry| entry.id() == id) {
                Some(entry) if entry.is_terminal() => {
                    debug!("条目 {} 已是终态 {}，忽略更新", id, entry.status().as_str());
                    false
                }
                Some(entry) => {
                    entry.set_state(state);
                    true
                }
                None => {
                    debug!("条目 {} 不存在，忽略更新", id);
                    false
                }
            }
        };
        if applied {
            self.notify();
        }
        applied
    }

    /// 清空所有条目
    pub fn clear(&self) {
        {
            let mut entries = self.write();
            entries.clear();
        }
        self.notify();
    }

    /// 当前所有条目的拷贝
    pub fn snapshot(&self) -> Vec<ExtractionResult> {
        self.read().clone()
    }

    pub fn get(&self, id: &str) -> Option<ExtractionResult> {
        self.read().iter().find(|entry| entry.id() == id).cloned()
    }

    /// 按显示位置（从 0 开始）获取条目
    pub fn get_at(&self, index: usize) -> Option<ExtractionResult> {
        self.read().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for entry in self.read().iter() {
            match entry.status() {
                ExtractionStatus::Pending => counts.pending += 1,
                ExtractionStatus::Loading => counts.loading += 1,
                ExtractionStatus::Success => counts.success += 1,
                ExtractionStatus::Error => counts.error += 1,
            }
        }
        counts
    }

    /// 成功条目（保持显示顺序）
    pub fn successful(&self) -> Vec<ExtractionResult> {
        self.read()
            .iter()
            .filter(|entry| entry.status() == ExtractionStatus::Success)
            .cloned()
            .collect()
    }

    /// 当前版本号，每次有效修改递增
    pub fn version(&self) -> u64 {
        *self.changes.borrow()
    }

    /// 订阅变更通知
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}
