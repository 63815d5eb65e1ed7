use domain::Todo;
use serde::{Deserialize, Serialize};

/// POST /todos リクエスト
///
/// 必須チェックはドメイン側（`NewTodo::new`）で行うため、ここでは全て任意項目。
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// PUT /todos/:id リクエスト（未知のフィールドは無視）
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// GET /todos レスポンス
#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub count: usize,
    pub todos: Vec<Todo>,
}

/// POST / PUT レスポンス
#[derive(Debug, Serialize)]
pub struct TodoMessageResponse {
    pub message: &'static str,
    pub todo: Todo,
}

/// DELETE レスポンス
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTodoResponse {
    pub message: &'static str,
    pub deleted_todo: Todo,
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    /// サービスの簡易ステータス
    pub status: &'static str,
}
