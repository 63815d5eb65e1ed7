use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Todo の識別子（ミリ秒タイムスタンプ由来の整数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl TodoId {
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 整数全体としてのみ解釈する（`"12abc"` や `" 12"` の先頭数字だけを拾うことはしない）
impl FromStr for TodoId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(Self)
            .map_err(|_| DomainError::InvalidTodoId(s.to_string()))
    }
}

/// 永続化される Todo
///
/// JSON 上のフィールド名は camelCase（`createdAt` / `updatedAt`）。
/// `updatedAt` は一度も更新されていなければ `null` として出力されます。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "iso_millis::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Todo {
    /// 指定されたフィールドのみを上書きし、`updated_at` を打刻します。
    /// `id` と `created_at` は変更しません。
    pub fn apply(&mut self, patch: TodoPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        self.updated_at = Some(now);
    }
}

/// 作成用の検証済み入力
///
/// `title` / `description` はトリム済みかつ空でないことが保証されます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    title: String,
    description: String,
    completed: bool,
}

impl NewTodo {
    pub fn new(
        title: Option<String>,
        description: Option<String>,
        completed: bool,
    ) -> Result<Self, DomainError> {
        let title = non_blank(title).ok_or(DomainError::MissingFields)?;
        let description = non_blank(description).ok_or(DomainError::MissingFields)?;
        Ok(Self {
            title,
            description,
            completed,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    /// 採番済みの ID と作成時刻を与えて `Todo` を組み立てます。
    pub fn into_todo(self, id: TodoId, now: DateTime<Utc>) -> Todo {
        Todo {
            id,
            title: self.title,
            description: self.description,
            completed: self.completed,
            created_at: now,
            updated_at: None,
        }
    }
}

/// 部分更新の検証済み入力（少なくとも 1 フィールドを含む）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoPatch {
    title: Option<String>,
    description: Option<String>,
    completed: Option<bool>,
}

impl TodoPatch {
    pub fn new(
        title: Option<String>,
        description: Option<String>,
        completed: Option<bool>,
    ) -> Result<Self, DomainError> {
        if title.is_none() && description.is_none() && completed.is_none() {
            return Err(DomainError::NoUpdatableFields);
        }

        Ok(Self {
            title: title.map(|t| required_text("title", t)).transpose()?,
            description: description
                .map(|d| required_text("description", d))
                .transpose()?,
            completed,
        })
    }
}

/// 永続化と API で使う現在時刻（ミリ秒精度）
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// 時刻は常にミリ秒 3 桁付きで出力する（`2023-11-14T22:13:20.000Z`）
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        DateTime::<Utc>::deserialize(deserializer)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => super::serialize(v, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<DateTime<Utc>>::deserialize(deserializer)
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_text(field: &str, value: String) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Todo {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        NewTodo::new(Some("Buy milk".into()), Some("2 liters".into()), false)
            .unwrap()
            .into_todo(TodoId(1_714_555_800_000), created)
    }

    #[test]
    fn todo_id_parses_integers_only() {
        assert_eq!("42".parse::<TodoId>().unwrap(), TodoId(42));
        assert_eq!("-7".parse::<TodoId>().unwrap(), TodoId(-7));
        assert_eq!(
            "abc".parse::<TodoId>().unwrap_err(),
            DomainError::InvalidTodoId("abc".into())
        );
        assert!("12abc".parse::<TodoId>().is_err());
        assert!(" 12".parse::<TodoId>().is_err());
        assert!("".parse::<TodoId>().is_err());
    }

    #[test]
    fn new_todo_trims_and_requires_both_fields() {
        let new = NewTodo::new(Some("  a ".into()), Some("\tb\n".into()), true).unwrap();
        assert_eq!(new.title(), "a");
        assert_eq!(new.description(), "b");
        assert!(new.completed());

        assert_eq!(
            NewTodo::new(None, Some("b".into()), false).unwrap_err(),
            DomainError::MissingFields
        );
        assert_eq!(
            NewTodo::new(Some("a".into()), Some("   ".into()), false).unwrap_err(),
            DomainError::MissingFields
        );
    }

    #[test]
    fn into_todo_leaves_updated_at_empty() {
        let todo = sample();
        assert_eq!(todo.title, "Buy milk");
        assert!(!todo.completed);
        assert_eq!(todo.updated_at, None);
    }

    #[test]
    fn patch_requires_at_least_one_field() {
        assert_eq!(
            TodoPatch::new(None, None, None).unwrap_err(),
            DomainError::NoUpdatableFields
        );
        assert!(TodoPatch::new(None, None, Some(false)).is_ok());
    }

    #[test]
    fn patch_rejects_blank_strings() {
        let err = TodoPatch::new(Some(" ".into()), None, None).unwrap_err();
        assert_eq!(err, DomainError::Validation("title must not be empty".into()));
        let err = TodoPatch::new(None, Some("".into()), None).unwrap_err();
        assert_eq!(
            err,
            DomainError::Validation("description must not be empty".into())
        );
    }

    #[test]
    fn apply_overwrites_only_supplied_fields() {
        let mut todo = sample();
        let original = todo.clone();
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();

        todo.apply(TodoPatch::new(None, None, Some(true)).unwrap(), now);

        assert!(todo.completed);
        assert_eq!(todo.title, original.title);
        assert_eq!(todo.description, original.description);
        assert_eq!(todo.id, original.id);
        assert_eq!(todo.created_at, original.created_at);
        assert_eq!(todo.updated_at, Some(now));

        todo.apply(TodoPatch::new(Some(" Buy oat milk ".into()), None, None).unwrap(), now);
        assert_eq!(todo.title, "Buy oat milk");
        assert!(todo.completed);
    }

    #[test]
    fn serializes_with_camel_case_and_explicit_null() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], 1_714_555_800_000_i64);
        assert_eq!(json["createdAt"], "2024-05-01T09:30:00.000Z");
        assert!(json["updatedAt"].is_null());
        assert!(json.as_object().unwrap().contains_key("updatedAt"));
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn deserializes_records_without_updated_at() {
        // updatedAt を持たない古いレコードも読み込める
        let raw = r#"{
            "id": 1700000000000,
            "title": "a",
            "description": "b",
            "completed": true,
            "createdAt": "2023-11-14T22:13:20.000Z"
        }"#;
        let todo: Todo = serde_json::from_str(raw).unwrap();
        assert_eq!(todo.id, TodoId(1_700_000_000_000));
        assert!(todo.completed);
        assert_eq!(todo.updated_at, None);
    }

    #[test]
    fn timestamps_always_carry_three_fraction_digits() {
        let mut todo = sample();
        let updated = Utc.timestamp_millis_opt(1_700_000_000_120).unwrap();
        todo.apply(TodoPatch::new(None, None, Some(true)).unwrap(), updated);

        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["createdAt"], "2024-05-01T09:30:00.000Z");
        assert_eq!(json["updatedAt"], "2023-11-14T22:13:20.120Z");

        let back: Todo = serde_json::from_value(json).unwrap();
        assert_eq!(back, todo);
    }

    #[test]
    fn timestamp_now_has_millisecond_precision() {
        let now = timestamp_now();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
