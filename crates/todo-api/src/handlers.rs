use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use domain::{NewTodo, Todo, TodoId, TodoPatch};

use crate::error::ApiError;
use crate::models::{
    CreateTodoRequest, DeletedTodoResponse, HealthBody, TodoListResponse, TodoMessageResponse,
    UpdateTodoRequest,
};
use crate::AppState;

/// ヘルスチェック用ハンドラ
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<TodoListResponse>, ApiError> {
    let todos = state.repo.list()?;
    Ok(Json(TodoListResponse {
        count: todos.len(),
        todos,
    }))
}

pub async fn get_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id: TodoId = raw_id.parse()?;
    let todo = state.repo.find(id)?.ok_or(ApiError::NotFound)?;
    Ok(Json(todo))
}

/// Todo 作成
/// - `completed` は省略時 false
/// - ID・createdAt はリポジトリ側で割り当てる
pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoMessageResponse>), ApiError> {
    let Json(req) = payload?;
    let new = NewTodo::new(req.title, req.description, req.completed.unwrap_or(false))?;

    let todo = state.repo.create(new)?;
    tracing::info!(id = %todo.id, "Todo created");

    Ok((
        StatusCode::CREATED,
        Json(TodoMessageResponse {
            message: "Todo created",
            todo,
        }),
    ))
}

/// 部分更新。存在確認を本文の検証より先に行う（不在なら本文に関わらず 404）
pub async fn update_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<TodoMessageResponse>, ApiError> {
    let id: TodoId = raw_id.parse()?;
    if state.repo.find(id)?.is_none() {
        return Err(ApiError::NotFound);
    }

    let Json(req) = payload?;
    let patch = TodoPatch::new(req.title, req.description, req.completed)?;

    // 確認後に別リクエストで削除された場合も 404
    let todo = state.repo.update(id, patch)?.ok_or(ApiError::NotFound)?;
    tracing::info!(id = %todo.id, "Todo updated");

    Ok(Json(TodoMessageResponse {
        message: "Todo updated",
        todo,
    }))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeletedTodoResponse>, ApiError> {
    let id: TodoId = raw_id.parse()?;
    let deleted_todo = state.repo.delete(id)?.ok_or(ApiError::NotFound)?;
    tracing::info!(id = %deleted_todo.id, "Todo deleted");

    Ok(Json(DeletedTodoResponse {
        message: "Todo deleted",
        deleted_todo,
    }))
}

/// どのルートにも一致しない場合（既知パスへの未対応メソッドを含む）
pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}
