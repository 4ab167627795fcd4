use std::io::Write;

use anyhow::{Context, Result};
use chrono::FixedOffset;
use log::info;

use crate::console::Console;
use crate::datetime;
use crate::history::{resume_candidates, RESUME_LIMIT};
use crate::prompt::{parse_selection, Prompt, PromptInput};
use crate::toggl::TogglRepository;

/// `resume`の結果。
#[derive(Clone, Debug, PartialEq)]
pub enum ResumeOutcome {
    /// 選ばれたエントリーの計測を開始した。
    Started(String),
    /// 既に計測中のエントリーがあったため何もしなかった。
    AlreadyRunning,
    /// 直近1ヶ月にエントリーがなかった。
    NoHistory,
    /// 入力が番号として不正だった。
    InvalidSelection,
    /// プロンプトで入力が中断された。
    Interrupted,
}

/// 過去のエントリーから選んで計測を再開するコマンド。
pub struct ResumeCommand<'a, T: TogglRepository> {
    toggl_client: &'a T,
    timezone: FixedOffset,
}

impl<'a, T: TogglRepository> ResumeCommand<'a, T> {
    /// 新しい`ResumeCommand`を返す。
    ///
    /// # Arguments
    /// * `toggl_client` - Toggl APIと通信するためのリポジトリ
    /// * `timezone` - 「今日」を決めるためのオフセット
    pub fn new(toggl_client: &'a T, timezone: FixedOffset) -> Self {
        Self {
            toggl_client,
            timezone,
        }
    }

    /// `resume`の処理を行う。
    ///
    /// 計測中のエントリーがあれば表示して終了する。
    /// なければ直近1ヶ月のエントリーを説明ごとに新しいものだけ残して最大10件表示し、
    /// 選ばれたエントリーと同じ説明とタグで計測を開始する。
    pub async fn run<W: Write, P: Prompt>(
        &self,
        prompt: &mut P,
        console: &mut Console<'_, W>,
    ) -> Result<ResumeOutcome> {
        let running = self
            .toggl_client
            .running_entry()
            .await
            .context("Failed to retrieve running entry")?;
        if let Some(entry) = running {
            info!("entry {} is already running", entry.id);
            console.line("An entry is already running, nothing was resumed.")?;
            console.running(&entry, &datetime::now())?;
            return Ok(ResumeOutcome::AlreadyRunning);
        }

        let (since, today) = datetime::lookback_month(datetime::today(&self.timezone))
            .context("Failed to calculate the lookback window")?;
        info!("Since: {}, Until: {}", since, today);
        let entries = self
            .toggl_client
            .entries_between(since, today)
            .await
            .context("Failed to retrieve time entries")?;

        let candidates = resume_candidates(entries, RESUME_LIMIT);
        if candidates.is_empty() {
            console.line("No entries to resume in the last month.")?;
            return Ok(ResumeOutcome::NoHistory);
        }
        console.menu(&candidates)?;

        let input = prompt.read_line(&format!("Resume which entry? [1-{}]", candidates.len()))?;
        let line = match input {
            PromptInput::Line(line) => line,
            PromptInput::Interrupted => {
                console.line("Interrupted, nothing was started.")?;
                return Ok(ResumeOutcome::Interrupted);
            }
        };
        let Some(index) = parse_selection(&line, candidates.len()) else {
            console.line(&format!(
                "Invalid selection: '{}'. Choose a number between 1 and {}.",
                line.trim(),
                candidates.len()
            ))?;
            return Ok(ResumeOutcome::InvalidSelection);
        };

        let entry = &candidates[index];
        self.toggl_client
            .start_entry(&entry.description, &entry.tags)
            .await
            .with_context(|| format!("Failed to resume entry: {}", entry.description))?;
        console.started(&entry.description, &entry.tags)?;

        Ok(ResumeOutcome::Started(entry.description.clone()))
    }
}
