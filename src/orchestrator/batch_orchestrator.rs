//! 批量提取编排器 - 编排层
//!
//! ## 职责
//!
//! 1. **占位插入**：为每个文件创建一条 `loading` 结果，整批一次性插入仓库
//! 2. **并发执行**：每个文件一个独立任务（编码 → 提取 → 回写）
//! 3. **失败隔离**：任何一个文件失败都不会取消、延迟或污染其他文件
//! 4. **完成信号**：`BatchHandle::wait` 在所有任务都结束后才返回
//!
//! ## 设计特点
//!
//! - `submit` 是同步的，返回前占位条目已全部可见
//! - 并发上限的许可在任务内部获取，不会推迟占位插入
//! - 结束顺序与显示顺序无关，显示顺序只由提交顺序决定

use crate::infrastructure::ResultStore;
use crate::models::{ExtractionResult, ExtractionState, SourceFile};
use crate::services::DocumentExtractor;
use crate::utils::logging::{log_batch_complete, log_batch_start};
use crate::workflow::{FileCtx, FileFlow, FileOutcome};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::error;

/// 批次处理结果
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub batch_index: usize,
    pub total: usize,
    pub success: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// 已结束的任务数
    pub fn settled(&self) -> usize {
        self.success + self.failed
    }
}

/// 进行中任务计数，任务结束（包括 panic）时自动递减
struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// 批量提取编排器
pub struct BatchOrchestrator {
    store: Arc<ResultStore>,
    flow: Arc<FileFlow>,
    limiter: Option<Arc<Semaphore>>,
    in_flight: Arc<AtomicUsize>,
    batch_counter: AtomicUsize,
}

impl BatchOrchestrator {
    /// 创建编排器
    ///
    /// `max_concurrent_files` 为 0 表示不限制并发。
    pub fn new(
        extractor: Arc<dyn DocumentExtractor>,
        store: Arc<ResultStore>,
        max_concurrent_files: usize,
    ) -> Self {
        let limiter = (max_concurrent_files > 0).then(|| Arc::new(Semaphore::new(max_concurrent_files)));
        Self {
            flow: Arc::new(FileFlow::new(extractor, store.clone())),
            store,
            limiter,
            in_flight: Arc::new(AtomicUsize::new(0)),
            batch_counter: AtomicUsize::new(0),
        }
    }

    pub fn store(&self) -> &Arc<ResultStore> {
        &self.store
    }

    /// 是否有任何批次的任务仍在进行
    pub fn is_processing(&self) -> bool {
        self.in_flight() > 0
    }

    /// 进行中的任务数
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// 提交一批文件
    ///
    /// 必须在 tokio 运行时中调用。返回时所有占位条目已插入仓库，
    /// 每个文件的任务都已启动；本函数不会失败。
    ///
    /// # 参数
    /// - `files`: 已筛选的 PDF（顺序即显示顺序）
    ///
    /// # 返回
    /// 本批的句柄，可用于等待全部任务结束
    pub fn submit(&self, files: Vec<SourceFile>) -> BatchHandle {
        let batch_index = self.batch_counter.fetch_add(1, Ordering::SeqCst) + 1;

        let entries: Vec<ExtractionResult> = files
            .iter()
            .map(|file| ExtractionResult::loading(file.name()))
            .collect();
        let ids: Vec<String> = entries.iter().map(|e| e.id().to_string()).collect();

        // 整批一次插入
        self.store.insert_batch(entries);

        log_batch_start(batch_index, files.len());

        let mut tasks = Vec::with_capacity(files.len());
        for (idx, (file, id)) in files.into_iter().zip(ids).enumerate() {
            let ctx = FileCtx::new(id, batch_index, idx + 1, file.name().to_string());
            let task_ctx = ctx.clone();
            let flow = self.flow.clone();
            let limiter = self.limiter.clone();
            let guard = InFlightGuard::new(self.in_flight.clone());

            let handle = tokio::spawn(async move {
                let _guard = guard;
                let _permit = match limiter {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                let outcome = AssertUnwindSafe(flow.run(&task_ctx, &file))
                    .catch_unwind()
                    .await;
                match outcome {
                    Ok(outcome) => outcome,
                    Err(payload) => {
                        // 在计数递减之前落到终态
                        error!("{} 任务 panic: {}", task_ctx, panic_message(&*payload));
                        flow.store().update(&task_ctx.id, ExtractionState::failed());
                        FileOutcome::Failed
                    }
                }
            });
            tasks.push((ctx, handle));
        }

        BatchHandle {
            batch_index,
            store: self.store.clone(),
            tasks,
        }
    }
}

/// 一次提交的句柄
///
/// 丢弃句柄不会取消任务，只是放弃等待。
pub struct BatchHandle {
    batch_index: usize,
    store: Arc<ResultStore>,
    tasks: Vec<(FileCtx, JoinHandle<FileOutcome>)>,
}

impl BatchHandle {
    pub fn batch_index(&self) -> usize {
        self.batch_index
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// 本批条目的 id（提交顺序）
    pub fn ids(&self) -> Vec<String> {
        self.tasks.iter().map(|(ctx, _)| ctx.id.clone()).collect()
    }

    /// 等待本批所有任务结束
    pub async fn wait(self) -> BatchSummary {
        let (ctxs, handles): (Vec<FileCtx>, Vec<JoinHandle<FileOutcome>>) =
            self.tasks.into_iter().unzip();
        let outcomes = futures::future::join_all(handles).await;

        let mut summary = BatchSummary {
            batch_index: self.batch_index,
            total: ctxs.len(),
            ..Default::default()
        };

        for (ctx, outcome) in ctxs.iter().zip(outcomes) {
            match outcome {
                Ok(FileOutcome::Success) => summary.success += 1,
                Ok(FileOutcome::Failed) => summary.failed += 1,
                // panic 已在任务内处理，这里只剩运行时取消
                Err(e) => {
                    error!("{} 任务执行失败: {}", ctx, e);
                    self.store.update(&ctx.id, ExtractionState::failed());
                    summary.failed += 1;
                }
            }
        }

        log_batch_complete(&summary);
        summary
    }
}
