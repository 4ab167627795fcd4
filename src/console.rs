use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};

use crate::time_entry::TimeEntry;
use crate::time_format::{format_elapsed, format_hms, format_start_time};

/// 計測中のエントリーがない場合のメッセージ。
pub const NOTHING_RUNNING: &str = "No Toggl entry is running.";

/// コマンドの結果を端末向けに表示する。
pub struct Console<'a, W: Write> {
    writer: &'a mut W,
    timezone: FixedOffset,
}

impl<'a, W: Write> Console<'a, W> {
    /// 新しい`Console`を返す。
    ///
    /// # Arguments
    ///
    /// * `writer` - 出力先
    /// * `timezone` - 時刻表示に使うオフセット
    pub fn new(writer: &'a mut W, timezone: FixedOffset) -> Self {
        Self { writer, timezone }
    }

    /// 1行出力する。
    pub fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer, "{}", text).context("Failed to write to console")
    }

    fn field(&mut self, label: &str, value: &str) -> Result<()> {
        let label = format!("{}:", label);
        writeln!(self.writer, ">>> {:<14}{}", label, value)
            .with_context(|| format!("Failed to write {}", label))
    }

    pub fn nothing_running(&mut self) -> Result<()> {
        self.line(NOTHING_RUNNING)
    }

    /// 計測中のエントリーを表示する。
    pub fn running(&mut self, entry: &TimeEntry, now: &DateTime<Utc>) -> Result<()> {
        self.field("Running", &entry.description)?;
        self.field("Tags", &join_tags(&entry.tags))?;
        self.field("Start time", &format_start_time(entry, &self.timezone))?;
        self.field("Running for", &format_elapsed(entry, now))
    }

    pub fn started(&mut self, description: &str, tags: &[String]) -> Result<()> {
        self.field("Starting", description)?;
        if !tags.is_empty() {
            self.field("Tags", &join_tags(tags))?;
        }
        Ok(())
    }

    /// 停止したエントリーを表示する。経過時間は停止直前に取得したものを使う。
    pub fn stopped(&mut self, description: &str, start_time: &str, run_time: &str) -> Result<()> {
        self.field("Stopped", description)?;
        self.field("Start time", start_time)?;
        self.field("Run time", run_time)
    }

    pub fn added(
        &mut self,
        description: &str,
        start: &DateTime<FixedOffset>,
        duration: i64,
    ) -> Result<()> {
        self.field("Added", description)?;
        self.field(
            "Start time",
            &start.with_timezone(&self.timezone).format("%Y-%m-%d %H:%M:%S").to_string(),
        )?;
        self.field("Duration", &format_hms(duration))
    }

    /// 再開候補を1始まりの番号付きで表示する。
    pub fn menu(&mut self, candidates: &[TimeEntry]) -> Result<()> {
        for (i, entry) in candidates.iter().enumerate() {
            let line = if entry.tags.is_empty() {
                format!("  [{}] {}", i + 1, entry.description)
            } else {
                format!("  [{}] {} ({})", i + 1, entry.description, join_tags(&entry.tags))
            };
            self.line(&line)?;
        }
        Ok(())
    }
}

fn join_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        "-".to_string()
    } else {
        tags.join(", ")
    }
}
