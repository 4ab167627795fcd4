use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, TimeDelta, Utc};

use crate::time_entry::TimeEntry;

/// エントリーの開始時刻を、指定オフセットの`HH:MM:SS`で返す。
///
/// 時刻そのものを変換するため、オフセットを足して24時を超えた場合は翌日の時刻になる。
pub fn format_start_time(entry: &TimeEntry, offset: &FixedOffset) -> String {
    entry.start.with_timezone(offset).format("%H:%M:%S").to_string()
}

/// 開始からの経過秒数を返す。開始が未来の場合は0とする。
pub fn elapsed_seconds(entry: &TimeEntry, now: &DateTime<Utc>) -> i64 {
    (*now - entry.start.with_timezone(&Utc))
        .num_seconds()
        .max(0)
}

/// 計測中エントリーの経過時間を`HH:MM:SS`で返す。
///
/// 終了済みのエントリーに対しても開始からの時間を返すが、意味のある値ではない。
pub fn format_elapsed(entry: &TimeEntry, now: &DateTime<Utc>) -> String {
    format_hms(elapsed_seconds(entry, now))
}

/// 秒数を`HH:MM:SS`にする。時間は24を超えても繰り上げない。
pub fn format_hms(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds / 60) % 60;
    let secs = seconds % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// 現在時刻から`duration`秒前を、指定オフセットの時刻として返す。
///
/// 表現できる日時の範囲を超える場合はエラーを返す。
pub fn past_entry_start(
    now: &DateTime<Utc>,
    duration: i64,
    offset: &FixedOffset,
) -> Result<DateTime<FixedOffset>> {
    let delta = TimeDelta::try_seconds(duration).context("Duration is too large")?;
    let start = now
        .checked_sub_signed(delta)
        .context("Duration is too large")?;

    Ok(start.with_timezone(offset))
}

/// Toggl APIに送る`YYYY-MM-DDTHH:MM:SS±HH:MM`形式にする。
pub fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}
