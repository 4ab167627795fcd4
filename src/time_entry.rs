use chrono::{DateTime, FixedOffset};

/// Togglから取得したタイムエントリー。
///
/// `duration`が0以下の場合は計測中を表す(Toggl APIでは`-開始時刻のUNIX秒`が入る)。
#[derive(Clone, Debug, PartialEq)]
pub struct TimeEntry {
    pub id: i64,
    pub workspace_id: i64,
    pub description: String,
    pub start: DateTime<FixedOffset>,
    pub duration: i64,
    pub tags: Vec<String>,
}

impl TimeEntry {
    /// 計測中のエントリーかどうかを返す。
    pub fn is_running(&self) -> bool {
        self.duration <= 0
    }
}
