use std::io::Write;

use anyhow::{Context, Result};
use log::info;

use crate::console::Console;
use crate::datetime;
use crate::toggl::TogglRepository;

/// 計測中のエントリーを表示するコマンド。
pub struct RunningCommand<'a, T: TogglRepository> {
    toggl_client: &'a T,
}

impl<'a, T: TogglRepository> RunningCommand<'a, T> {
    /// 新しい`RunningCommand`を返す。
    ///
    /// # Arguments
    /// * `toggl_client` - Toggl APIと通信するためのリポジトリ
    pub fn new(toggl_client: &'a T) -> Self {
        Self { toggl_client }
    }

    /// 計測中のエントリーを表示する。何も計測していなければその旨を表示する。
    pub async fn run<W: Write>(&self, console: &mut Console<'_, W>) -> Result<()> {
        let entry = self
            .toggl_client
            .running_entry()
            .await
            .context("Failed to retrieve running entry")?;

        match entry {
            Some(entry) => {
                info!("running entry: {}", entry.id);
                console.running(&entry, &datetime::now())
            }
            None => console.nothing_running(),
        }
    }
}
