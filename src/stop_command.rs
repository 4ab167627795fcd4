use std::io::Write;

use anyhow::{Context, Result};
use chrono::FixedOffset;
use log::info;

use crate::console::Console;
use crate::datetime;
use crate::time_format::{format_elapsed, format_start_time};
use crate::toggl::TogglRepository;

/// 計測中のエントリーを停止するコマンド。
pub struct StopCommand<'a, T: TogglRepository> {
    toggl_client: &'a T,
    timezone: FixedOffset,
}

impl<'a, T: TogglRepository> StopCommand<'a, T> {
    /// 新しい`StopCommand`を返す。
    ///
    /// # Arguments
    /// * `toggl_client` - Toggl APIと通信するためのリポジトリ
    /// * `timezone` - 開始時刻の表示に使うオフセット
    pub fn new(toggl_client: &'a T, timezone: FixedOffset) -> Self {
        Self {
            toggl_client,
            timezone,
        }
    }

    /// 計測中のエントリーを停止し、開始時刻と計測時間を表示する。
    ///
    /// 計測中のエントリーがない場合は何も停止しない。
    pub async fn run<W: Write>(&self, console: &mut Console<'_, W>) -> Result<()> {
        let Some(entry) = self
            .toggl_client
            .running_entry()
            .await
            .context("Failed to retrieve running entry")?
        else {
            info!("nothing to stop");
            return console.nothing_running();
        };

        // 停止前の時点の経過時間を表示する
        let start_time = format_start_time(&entry, &self.timezone);
        let run_time = format_elapsed(&entry, &datetime::now());

        self.toggl_client
            .stop_entry()
            .await
            .with_context(|| format!("Failed to stop entry: {}", entry.description))?;

        console.stopped(&entry.description, &start_time, &run_time)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};

    use super::StopCommand;
    use crate::console::Console;
    use crate::datetime::mock_datetime;
    use crate::time_entry::TimeEntry;
    use crate::toggl::MockTogglRepository;

    fn timezone() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    #[tokio::test]
    async fn test_stop_command_nothing_running() {
        let mut toggl = MockTogglRepository::new();
        toggl
            .expect_running_entry()
            .times(1)
            .returning(|| Ok(None));
        toggl.expect_stop_entry().times(0);
        let mut writer = Vec::new();

        StopCommand::new(&toggl, timezone())
            .run(&mut Console::new(&mut writer, timezone()))
            .await
            .unwrap();

        assert_eq!(String::from_utf8(writer).unwrap(), "No Toggl entry is running.\n");
    }

    #[tokio::test]
    async fn test_stop_command_stops_running_entry() {
        mock_datetime::set_mock_time(Utc.with_ymd_and_hms(2024, 2, 1, 1, 45, 30).unwrap());
        let mut toggl = MockTogglRepository::new();
        toggl.expect_running_entry().times(1).returning(|| {
            Ok(Some(TimeEntry {
                id: 10,
                workspace_id: 2,
                description: "review".to_string(),
                start: DateTime::parse_from_rfc3339("2024-01-31T23:30:00Z").unwrap(),
                duration: -1706743800,
                tags: vec!["code".to_string()],
            }))
        });
        // 停止後に時計が進んでも、表示するのは停止前の経過時間
        toggl.expect_stop_entry().times(1).returning(|| {
            mock_datetime::set_mock_time(Utc.with_ymd_and_hms(2024, 2, 1, 3, 0, 0).unwrap());
            Ok(())
        });
        let mut writer = Vec::new();

        StopCommand::new(&toggl, timezone())
            .run(&mut Console::new(&mut writer, timezone()))
            .await
            .unwrap();

        assert_eq!(
            String::from_utf8(writer).unwrap(),
            ">>> Stopped:      review\n>>> Start time:   08:30:00\n>>> Run time:     02:15:30\n"
        );
        mock_datetime::clear_mock_time();
    }
}
