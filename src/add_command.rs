use std::io::Write;

use anyhow::{bail, Context, Result};
use chrono::FixedOffset;
use log::info;

use crate::console::Console;
use crate::datetime;
use crate::time_format::past_entry_start;
use crate::toggl::TogglRepository;

/// 現在時刻で終わる過去のエントリーを追加するコマンド。
pub struct AddCommand<'a, T: TogglRepository> {
    toggl_client: &'a T,
    timezone: FixedOffset,
}

impl<'a, T: TogglRepository> AddCommand<'a, T> {
    /// 新しい`AddCommand`を返す。
    ///
    /// # Arguments
    /// * `toggl_client` - Toggl APIと通信するためのリポジトリ
    /// * `timezone` - 開始時刻に付けるオフセット
    pub fn new(toggl_client: &'a T, timezone: FixedOffset) -> Self {
        Self {
            toggl_client,
            timezone,
        }
    }

    /// 現在時刻の`duration`秒前から始まる終了済みエントリーを作成する。
    pub async fn run<W: Write>(
        &self,
        description: &str,
        duration: i64,
        tags: &[String],
        console: &mut Console<'_, W>,
    ) -> Result<()> {
        let description = description.trim();
        if description.is_empty() {
            bail!("Description must not be empty");
        }
        if duration <= 0 {
            bail!("Duration must be a positive number of seconds: {}", duration);
        }

        let start = past_entry_start(&datetime::now(), duration, &self.timezone)?;
        info!("add entry starting at {}", start);
        self.toggl_client
            .create_entry(description, &start, duration, tags)
            .await
            .with_context(|| format!("Failed to add entry: {}", description))?;

        console.added(description, &start, duration)
    }
}
