use std::io::Write;

use anyhow::{bail, Context, Result};

use crate::console::Console;
use crate::toggl::TogglRepository;

/// 新しいエントリーの計測を開始するコマンド。
///
/// 既に計測中のエントリーがあるかどうかは確認しない。
pub struct StartCommand<'a, T: TogglRepository> {
    toggl_client: &'a T,
}

impl<'a, T: TogglRepository> StartCommand<'a, T> {
    /// 新しい`StartCommand`を返す。
    pub fn new(toggl_client: &'a T) -> Self {
        Self { toggl_client }
    }

    /// `description`と`tags`で計測を開始する。
    pub async fn run<W: Write>(
        &self,
        description: &str,
        tags: &[String],
        console: &mut Console<'_, W>,
    ) -> Result<()> {
        let description = description.trim();
        if description.is_empty() {
            bail!("Description must not be empty");
        }

        self.toggl_client
            .start_entry(description, tags)
            .await
            .with_context(|| format!("Failed to start entry: {}", description))?;

        console.started(description, tags)
    }
}
