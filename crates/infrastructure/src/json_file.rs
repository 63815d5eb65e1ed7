//! JSON バッキングファイルによるリポジトリ
//!
//! コレクション全体をメモリに保持し、変更のたびにファイル全体を書き直します。
//! 書き込みは一時ファイル経由の rename で行うため、途中でプロセスが落ちても
//! 元のファイルは壊れません。

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use domain::{timestamp_now, NewTodo, Todo, TodoId, TodoPatch};

use crate::collection::TodoCollection;
use crate::errors::StoreError;
use crate::repositories::TodoRepository;

pub struct JsonFileRepository {
    path: PathBuf,
    state: Mutex<TodoCollection>,
}

impl JsonFileRepository {
    /// バッキングファイルを開きます。存在しなければ `[]` で作成します。
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let todos = if path.exists() {
            load(&path)?
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
            save(&path, &[])?;
            tracing::info!(path = %path.display(), "created empty backing file");
            Vec::new()
        };

        tracing::debug!(path = %path.display(), count = todos.len(), "backing file loaded");
        Ok(Self {
            path,
            state: Mutex::new(TodoCollection::from_todos(todos)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, TodoCollection>, StoreError> {
        self.state.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// 変更後のコレクションを保存し、成功した場合のみメモリ側へ反映します。
    fn commit(
        &self,
        state: &mut MutexGuard<'_, TodoCollection>,
        next: TodoCollection,
    ) -> Result<(), StoreError> {
        save(&self.path, next.todos())?;
        **state = next;
        Ok(())
    }
}

impl TodoRepository for JsonFileRepository {
    fn list(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(self.lock()?.todos().to_vec())
    }

    fn find(&self, id: TodoId) -> Result<Option<Todo>, StoreError> {
        Ok(self.lock()?.find(id).cloned())
    }

    fn create(&self, new: NewTodo) -> Result<Todo, StoreError> {
        let mut state = self.lock()?;
        let mut next = state.clone();
        let todo = next.insert(new, timestamp_now());
        self.commit(&mut state, next)?;
        Ok(todo)
    }

    fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Option<Todo>, StoreError> {
        let mut state = self.lock()?;
        let mut next = state.clone();
        let Some(todo) = next.update(id, patch, timestamp_now()) else {
            return Ok(None);
        };
        self.commit(&mut state, next)?;
        Ok(Some(todo))
    }

    fn delete(&self, id: TodoId) -> Result<Option<Todo>, StoreError> {
        let mut state = self.lock()?;
        let mut next = state.clone();
        let Some(todo) = next.remove(id) else {
            return Ok(None);
        };
        self.commit(&mut state, next)?;
        Ok(Some(todo))
    }
}

/// ファイル全体を Todo 配列として読み込みます。
/// 空ファイルは空配列として扱い、それ以外のパース失敗は `Corrupt` を返します。
pub fn load(path: &Path) -> Result<Vec<Todo>, StoreError> {
    let raw = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// コレクション全体を整形済み JSON で書き出します。
pub fn save(path: &Path, todos: &[Todo]) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(todos).map_err(StoreError::Serialize)?;
    let tmp = temp_path(path);

    if let Err(e) = write_then_rename(&tmp, path, json.as_bytes()) {
        // 書きかけの一時ファイルは残さない
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    tracing::debug!(path = %path.display(), count = todos.len(), "backing file saved");
    Ok(())
}

fn write_then_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let mut file = fs::File::create(tmp).map_err(|e| StoreError::io(tmp, e))?;
    file.write_all(bytes)
        .and_then(|_| file.sync_all())
        .map_err(|e| StoreError::io(tmp, e))?;
    fs::rename(tmp, path).map_err(|e| StoreError::io(path, e))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("todos.json"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_is_a_sibling() {
        let tmp = temp_path(Path::new("/var/data/todos.json"));
        assert_eq!(tmp, PathBuf::from("/var/data/todos.json.tmp"));
    }

    #[test]
    fn load_treats_blank_file_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.json");
        fs::write(&path, "  \n").unwrap();
        assert!(load(&path).unwrap().is_empty());
    }

    #[test]
    fn save_writes_pretty_printed_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.json");
        save(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn failed_save_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.json");
        // 保存先がディレクトリだと rename が失敗する
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let err = save(&path, &[]).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(!temp_path(&path).exists());
    }
}
