//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::ValueError;

/// Why an inbound event was dropped instead of processed.
///
/// Required fields are validated up front; an event that fails validation is
/// dropped with a diagnostic rather than propagated into the roster or the
/// room (see DESIGN.md).
#[derive(Debug, Error)]
pub enum EventError {
    /// JSON としてパースできない、または必須フィールドが欠けている
    #[error("malformed event payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// フィールドの値が不正（空の userId / content など）
    #[error("invalid event field: {0}")]
    InvalidField(#[from] ValueError),
}
