//! Todo サービスのドメインモデル
//!
//! 永続化や HTTP から独立した、エンティティ・入力検証・ID 採番のみを担当します。

pub mod errors;
pub mod id;
pub mod todo;

pub use errors::*;
pub use id::*;
pub use todo::*;
