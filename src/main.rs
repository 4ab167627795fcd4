use std::{io, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser};
use log::info;

mod add_command;
mod config;
mod console;
mod datetime;
mod history;
mod logger;
mod prompt;
mod resume_command;
mod running_command;
mod start_command;
mod stop_command;
mod time_entry;
mod time_format;
mod toggl;

use add_command::AddCommand;
use config::Config;
use console::Console;
use prompt::TerminalPrompt;
use resume_command::{ResumeCommand, ResumeOutcome};
use running_command::RunningCommand;
use start_command::StartCommand;
use stop_command::StopCommand;
use toggl::TogglClient;

/// Togglのタイマーを操作するためのCLIアプリケーション。
///
/// # Examples
/// ```
/// $ toggl-timer
/// $ toggl-timer -n "write report" -t docs work
/// $ toggl-timer -s
/// $ toggl-timer -r
/// $ toggl-timer -a "standup" -d 900 -t team
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
#[clap(group(ArgGroup::new("action").args(&["new", "stop", "resume", "add", "running"])))]
struct Args {
    #[clap(
        short = 'n',
        long = "new",
        value_name = "DESCRIPTION",
        help = "Start a new Toggl entry"
    )]
    new: Option<String>,

    #[clap(short = 's', long = "stop", help = "Stop the running Toggl entry")]
    stop: bool,

    #[clap(
        short = 'r',
        long = "resume",
        help = "Resume one of the entries from the last month"
    )]
    resume: bool,

    #[clap(
        short = 'a',
        long = "add",
        value_name = "DESCRIPTION",
        requires = "duration",
        help = "Add a finished entry that ends now"
    )]
    add: Option<String>,

    #[clap(
        short = 'd',
        long = "duration",
        value_name = "SECONDS",
        requires = "add",
        help = "Duration in seconds of the entry to add"
    )]
    duration: Option<i64>,

    #[clap(
        short = 't',
        long = "tag",
        multiple_values = true,
        value_name = "TAG",
        help = "Set tags for the new entry"
    )]
    tags: Vec<String>,

    #[clap(long = "running", help = "Show the running Toggl entry (default)")]
    running: bool,

    #[clap(
        long = "tz-offset",
        env = "TOGGL_TZ_OFFSET",
        allow_hyphen_values = true,
        value_name = "HOURS",
        help = "UTC offset in hours used to display times [default: local offset]"
    )]
    tz_offset: Option<i32>,

    #[clap(
        short = 'c',
        long = "config",
        help = "Config file whose first line is the API token"
    )]
    config: Option<PathBuf>,

    #[clap(
        short = 'v',
        long = "verbose",
        parse(from_occurrences),
        help = "Increase log verbosity"
    )]
    verbose: u64,
}

/// 実行する操作。
#[derive(Debug, PartialEq)]
enum Action {
    Running,
    Start {
        description: String,
        tags: Vec<String>,
    },
    Stop,
    Resume,
    Add {
        description: String,
        duration: i64,
        tags: Vec<String>,
    },
}

impl Args {
    /// 引数の組み合わせを検証し、実行する操作を返す。
    fn action(&self) -> Result<Action> {
        if !self.tags.is_empty() && self.new.is_none() && self.add.is_none() {
            bail!("Incorrect usage: --tag can only be used with --new or --add");
        }

        let action = if let Some(description) = &self.new {
            Action::Start {
                description: description.clone(),
                tags: self.tags.clone(),
            }
        } else if let Some(description) = &self.add {
            let duration = self
                .duration
                .context("Incorrect usage: --add requires --duration")?;
            Action::Add {
                description: description.clone(),
                duration,
                tags: self.tags.clone(),
            }
        } else if self.stop {
            Action::Stop
        } else if self.resume {
            Action::Resume
        } else {
            Action::Running
        };

        Ok(action)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    logger::setup_logger(args.verbose)?;

    let action = args.action()?;
    info!("action: {:?}", action);
    let config = Config::load(args.config.as_deref(), args.tz_offset)
        .context("Failed to load configuration")?;
    let toggl = TogglClient::new(&config);

    let mut stdout = io::stdout();
    let mut console = Console::new(&mut stdout, config.timezone);

    match action {
        Action::Running => RunningCommand::new(&toggl).run(&mut console).await?,
        Action::Start { description, tags } => {
            StartCommand::new(&toggl)
                .run(&description, &tags, &mut console)
                .await?
        }
        Action::Stop => {
            StopCommand::new(&toggl, config.timezone)
                .run(&mut console)
                .await?
        }
        Action::Resume => {
            let outcome = ResumeCommand::new(&toggl, config.timezone)
                .run(&mut TerminalPrompt, &mut console)
                .await?;
            match outcome {
                ResumeOutcome::Started(description) => info!("resumed: {}", description),
                other => info!("nothing resumed: {:?}", other),
            }
        }
        Action::Add {
            description,
            duration,
            tags,
        } => {
            AddCommand::new(&toggl, config.timezone)
                .run(&description, duration, &tags, &mut console)
                .await?
        }
    }

    Ok(())
}
