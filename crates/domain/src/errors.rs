use thiserror::Error;

/// ドメイン層の検証エラー
///
/// `Display` の文言はそのまま API のエラーメッセージとして返されます。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 数値として解釈できない ID（元の入力を保持）
    #[error("Invalid todo id")]
    InvalidTodoId(String),

    #[error("Title and description are required")]
    MissingFields,

    #[error("At least one of title, description or completed is required")]
    NoUpdatableFields,

    #[error("{0}")]
    Validation(String),
}
