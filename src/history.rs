use std::collections::HashSet;

use crate::time_entry::TimeEntry;

/// `resume`で候補として表示する最大件数。
pub const RESUME_LIMIT: usize = 10;

/// 開始時刻の新しい順に並べる。同じ開始時刻の場合は元の順序を保つ。
pub fn sort_entries(entries: &mut [TimeEntry]) {
    entries.sort_by(|a, b| b.start.cmp(&a.start));
}

/// 並べ替え済みのエントリーから、説明ごとに最初の1件だけを残す。
pub fn dedupe_by_description(entries: Vec<TimeEntry>) -> Vec<TimeEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.description.clone()))
        .collect()
}

/// 終了済みのエントリーから再開候補を新しい順に最大`limit`件返す。
pub fn resume_candidates(entries: Vec<TimeEntry>, limit: usize) -> Vec<TimeEntry> {
    let mut entries = entries
        .into_iter()
        .filter(|entry| !entry.is_running())
        .collect::<Vec<_>>();
    sort_entries(&mut entries);
    let mut candidates = dedupe_by_description(entries);
    candidates.truncate(limit);
    candidates
}
