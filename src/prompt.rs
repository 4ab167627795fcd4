use std::io;

use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Input};

/// プロンプトへの入力結果。
#[derive(Clone, Debug, PartialEq)]
pub enum PromptInput {
    Line(String),
    /// Ctrl-Cなどで入力が中断された。
    Interrupted,
}

/// 対話的に1行読むためのtrait。
pub trait Prompt {
    fn read_line(&mut self, prompt: &str) -> Result<PromptInput>;
}

/// 端末から入力を読む`Prompt`。
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn read_line(&mut self, prompt: &str) -> Result<PromptInput> {
        let result = Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text();

        match result {
            Ok(line) => Ok(PromptInput::Line(line)),
            Err(dialoguer::Error::IO(err)) if err.kind() == io::ErrorKind::Interrupted => {
                Ok(PromptInput::Interrupted)
            }
            Err(err) => Err(err).context("Failed to read selection"),
        }
    }
}

/// 1始まりの番号入力を、0始まりのインデックスに変換する。
///
/// 数値でない場合や`1..=len`の範囲外の場合は`None`を返す。
pub fn parse_selection(input: &str, len: usize) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Some(n - 1),
        _ => None,
    }
}
