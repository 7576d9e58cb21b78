//! 单个文件的提取结果及其生命周期状态

use crate::models::record::ExtractedRecord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 提取失败时展示给用户的固定提示
pub const FAILED_MESSAGE: &str = "Failed to extract data.";

/// 生命周期状态（不带数据）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    /// 保留状态，编排器不会主动设置
    Pending,
    Loading,
    Success,
    Error,
}

impl ExtractionStatus {
    /// 终态之后不再发生任何状态转换
    pub fn is_terminal(self) -> bool {
        matches!(self, ExtractionStatus::Success | ExtractionStatus::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExtractionStatus::Pending => "pending",
            ExtractionStatus::Loading => "loading",
            ExtractionStatus::Success => "success",
            ExtractionStatus::Error => "error",
        }
    }
}

/// 生命周期状态及其携带的数据
///
/// 数据只存在于 `Success`，错误信息只存在于 `Error`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExtractionState {
    Pending,
    Loading,
    Success {
        data: ExtractedRecord,
    },
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

impl ExtractionState {
    /// 固定提示的失败状态
    pub fn failed() -> Self {
        ExtractionState::Error {
            error_message: FAILED_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> ExtractionStatus {
        match self {
            ExtractionState::Pending => ExtractionStatus::Pending,
            ExtractionState::Loading => ExtractionStatus::Loading,
            ExtractionState::Success { .. } => ExtractionStatus::Success,
            ExtractionState::Error { .. } => ExtractionStatus::Error,
        }
    }
}

/// 每个上传文件对应一条结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    id: String,
    file_name: String,
    #[serde(flatten)]
    state: ExtractionState,
}

impl ExtractionResult {
    /// 创建一条处理中的结果，分配新的 id
    pub fn loading(file_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            file_name: file_name.into(),
            state: ExtractionState::Loading,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn state(&self) -> &ExtractionState {
        &self.state
    }

    pub fn status(&self) -> ExtractionStatus {
        self.state.status()
    }

    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }

    /// 仅在 `success` 时存在
    pub fn data(&self) -> Option<&ExtractedRecord> {
        match &self.state {
            ExtractionState::Success { data } => Some(data),
            _ => None,
        }
    }

    /// 仅在 `error` 时存在
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            ExtractionState::Error { error_message } => Some(error_message),
            _ => None,
        }
    }

    /// 只能由结果仓库修改状态
    pub(crate) fn set_state(&mut self, state: ExtractionState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_entries_get_unique_ids() {
        let a = ExtractionResult::loading("A.pdf");
        let b = ExtractionResult::loading("A.pdf");

        assert_ne!(a.id(), b.id());
        assert_eq!(a.status(), ExtractionStatus::Loading);
        assert!(a.data().is_none());
        assert!(a.error_message().is_none());
    }

    #[test]
    fn test_data_present_only_on_success() {
        let mut result = ExtractionResult::loading("A.pdf");
        result.set_state(ExtractionState::Success {
            data: ExtractedRecord::not_available(),
        });
        assert!(result.data().is_some());
        assert!(result.error_message().is_none());
        assert!(result.is_terminal());

        result.set_state(ExtractionState::failed());
        assert!(result.data().is_none());
        assert_eq!(result.error_message(), Some(FAILED_MESSAGE));
    }

    #[test]
    fn test_json_shape() {
        let mut result = ExtractionResult::loading("B.pdf");
        result.set_state(ExtractionState::failed());

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["fileName"], "B.pdf");
        assert_eq!(value["status"], "error");
        assert_eq!(value["errorMessage"], FAILED_MESSAGE);
        assert!(value.get("data").is_none());

        let back: ExtractionResult = serde_json::from_value(value).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_pending_is_not_terminal() {
        assert!(!ExtractionStatus::Pending.is_terminal());
        assert!(!ExtractionStatus::Loading.is_terminal());
        assert_eq!(ExtractionState::Pending.status().as_str(), "pending");
    }
}
