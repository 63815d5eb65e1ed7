use chrono::{DateTime, Utc};
use domain::{IdGenerator, NewTodo, Todo, TodoId, TodoPatch};

/// メモリ上の Todo 一覧と採番器
///
/// ロックや保存は持たず、各リポジトリがこの型をロックの内側で操作します。
#[derive(Debug, Clone, Default)]
pub(crate) struct TodoCollection {
    todos: Vec<Todo>,
    ids: IdGenerator,
}

impl TodoCollection {
    pub(crate) fn from_todos(todos: Vec<Todo>) -> Self {
        let ids = IdGenerator::starting_after(todos.iter().map(|t| t.id).max());
        Self { todos, ids }
    }

    pub(crate) fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub(crate) fn find(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub(crate) fn insert(&mut self, new: NewTodo, now: DateTime<Utc>) -> Todo {
        let id = self.ids.next_id(now);
        let todo = new.into_todo(id, now);
        self.todos.push(todo.clone());
        todo
    }

    pub(crate) fn update(
        &mut self,
        id: TodoId,
        patch: TodoPatch,
        now: DateTime<Utc>,
    ) -> Option<Todo> {
        let todo = self.todos.iter_mut().find(|t| t.id == id)?;
        todo.apply(patch, now);
        Some(todo.clone())
    }

    pub(crate) fn remove(&mut self, id: TodoId) -> Option<Todo> {
        let index = self.todos.iter().position(|t| t.id == id)?;
        Some(self.todos.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_todo(title: &str) -> NewTodo {
        NewTodo::new(Some(title.into()), Some("desc".into()), false).unwrap()
    }

    #[test]
    fn insert_keeps_insertion_order_and_unique_ids() {
        let now = Utc.timestamp_millis_opt(1_000).unwrap();
        let mut c = TodoCollection::default();
        let a = c.insert(new_todo("a"), now);
        let b = c.insert(new_todo("b"), now);

        assert_ne!(a.id, b.id);
        let titles: Vec<&str> = c.todos().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["a", "b"]);
    }

    #[test]
    fn from_todos_continues_after_highest_id() {
        let now = Utc.timestamp_millis_opt(1).unwrap();
        let existing = new_todo("old").into_todo(TodoId(500), now);
        let mut c = TodoCollection::from_todos(vec![existing]);
        let created = c.insert(new_todo("new"), now);
        assert_eq!(created.id, TodoId(501));
    }

    #[test]
    fn update_and_remove_missing_ids_return_none() {
        let now = Utc.timestamp_millis_opt(1).unwrap();
        let mut c = TodoCollection::default();
        let patch = TodoPatch::new(None, None, Some(true)).unwrap();
        assert!(c.update(TodoId(1), patch, now).is_none());
        assert!(c.remove(TodoId(1)).is_none());
    }

    #[test]
    fn remove_returns_the_removed_item() {
        let now = Utc.timestamp_millis_opt(10).unwrap();
        let mut c = TodoCollection::default();
        let a = c.insert(new_todo("a"), now);
        let removed = c.remove(a.id).unwrap();
        assert_eq!(removed, a);
        assert!(c.find(a.id).is_none());
        assert!(c.todos().is_empty());
    }
}
