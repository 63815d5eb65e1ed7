//! ID 採番
//!
//! ID は作成時刻のミリ秒値を基本としつつ、直前に払い出した ID より
//! 必ず大きくなるよう補正します。同一ミリ秒内の連続作成や時計の巻き戻りでも
//! 重複しません。

use chrono::{DateTime, Utc};

use crate::todo::TodoId;

/// 単調増加する `TodoId` の採番器
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdGenerator {
    last: Option<i64>,
}

impl IdGenerator {
    /// 既存データの最大 ID から採番を再開します。
    pub fn starting_after(last: Option<TodoId>) -> Self {
        Self {
            last: last.map(TodoId::as_i64),
        }
    }

    /// `max(now_ms, last + 1)` を払い出します。
    pub fn next_id(&mut self, now: DateTime<Utc>) -> TodoId {
        let candidate = now.timestamp_millis();
        let id = match self.last {
            Some(last) => candidate.max(last.saturating_add(1)),
            None => candidate,
        };
        self.last = Some(id);
        TodoId(id)
    }
}
