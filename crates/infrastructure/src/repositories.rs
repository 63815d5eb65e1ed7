use domain::{NewTodo, Todo, TodoId, TodoPatch};

use crate::errors::StoreError;

/// Todo の永続化抽象
///
/// 各操作は検索・変更・保存をひとつのロック区間で行うため、
/// 同一プロセス内の並行リクエストが互いの更新を失うことはありません。
pub trait TodoRepository: Send + Sync {
    /// 全件を挿入順で返す
    fn list(&self) -> Result<Vec<Todo>, StoreError>;

    fn find(&self, id: TodoId) -> Result<Option<Todo>, StoreError>;

    /// ID・作成時刻を割り当てて末尾に追加し、保存する
    fn create(&self, new: NewTodo) -> Result<Todo, StoreError>;

    /// 存在しなければ `None`（保存は行わない）
    fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Option<Todo>, StoreError>;

    /// 削除した Todo を返す。存在しなければ `None`
    fn delete(&self, id: TodoId) -> Result<Option<Todo>, StoreError>;
}
