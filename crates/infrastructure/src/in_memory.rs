use std::sync::{Mutex, MutexGuard};

use domain::{timestamp_now, NewTodo, Todo, TodoId, TodoPatch};

use crate::collection::TodoCollection;
use crate::errors::StoreError;
use crate::repositories::TodoRepository;

/// 簡易な InMemory 実装（開発/テスト用）
#[derive(Default)]
pub struct InMemoryRepository {
    state: Mutex<TodoCollection>,
}

impl InMemoryRepository {
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            state: Mutex::new(TodoCollection::from_todos(todos)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, TodoCollection>, StoreError> {
        self.state.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl TodoRepository for InMemoryRepository {
    fn list(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(self.lock()?.todos().to_vec())
    }

    fn find(&self, id: TodoId) -> Result<Option<Todo>, StoreError> {
        Ok(self.lock()?.find(id).cloned())
    }

    fn create(&self, new: NewTodo) -> Result<Todo, StoreError> {
        Ok(self.lock()?.insert(new, timestamp_now()))
    }

    fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Option<Todo>, StoreError> {
        Ok(self.lock()?.update(id, patch, timestamp_now()))
    }

    fn delete(&self, id: TodoId) -> Result<Option<Todo>, StoreError> {
        Ok(self.lock()?.remove(id))
    }
}
