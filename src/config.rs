use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use chrono::{FixedOffset, Local, Offset};
use log::debug;

const DEFAULT_API_URL: &str = "https://api.track.toggl.com/api/v9";

/// 起動時に一度だけ組み立て、各コマンドに渡す設定。
#[derive(Clone, Debug)]
pub struct Config {
    pub api_token: String,
    pub api_url: String,
    /// 表示と過去エントリー作成に使うUTCオフセット。
    pub timezone: FixedOffset,
}

impl Config {
    /// 環境変数と設定ファイルから設定を読み込む。
    ///
    /// APIトークンは`TOGGL_API_TOKEN`を優先し、なければ設定ファイルの1行目を使う。
    /// タイムゾーンは`tz_offset`(時間単位)が指定されていなければ実行環境のオフセットを使う。
    ///
    /// # Arguments
    ///
    /// * `config_path` - 設定ファイルのパス。`None`の場合は既定のパス
    /// * `tz_offset` - UTCからのオフセット(時間)
    pub fn load(config_path: Option<&Path>, tz_offset: Option<i32>) -> Result<Self> {
        let api_token = match env::var("TOGGL_API_TOKEN") {
            Ok(token) if !token.trim().is_empty() => token.trim().to_string(),
            _ => {
                let path = match config_path {
                    Some(path) => path.to_path_buf(),
                    None => default_config_path()?,
                };
                read_api_token(&path)?
            }
        };
        let api_url = env::var("TOGGL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timezone = match tz_offset {
            Some(hours) => timezone_from_hours(hours)?,
            None => Local::now().offset().fix(),
        };
        debug!("api url: {}, timezone: {}", api_url, timezone);

        Ok(Self {
            api_token,
            api_url,
            timezone,
        })
    }
}

/// 既定の設定ファイルのパスを返す。
fn default_config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("Failed to find the user config directory")?;
    Ok(dir.join("toggl-timer").join("config"))
}

/// 設定ファイルの1行目をAPIトークンとして読む。
fn read_api_token(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).with_context(|| {
        format!(
            "TOGGL_API_TOKEN is not set and failed to read config file: {}",
            path.display()
        )
    })?;
    let token = content.lines().next().unwrap_or_default().trim();
    if token.is_empty() {
        bail!("API token is empty in config file: {}", path.display());
    }

    Ok(token.to_string())
}

/// 時間単位のオフセットを`FixedOffset`にする。
pub fn timezone_from_hours(hours: i32) -> Result<FixedOffset> {
    if !(-23..=23).contains(&hours) {
        bail!("Timezone offset must be between -23 and 23 hours: {}", hours);
    }
    FixedOffset::east_opt(hours * 3600)
        .with_context(|| format!("Invalid timezone offset: {}", hours))
}

#[cfg(test)]
mod tests {
    use std::{
        env, fs,
        path::{Path, PathBuf},
        sync::Mutex,
    };

    use chrono::FixedOffset;
    use once_cell::sync::Lazy;
    use rstest::rstest;

    use super::{read_api_token, timezone_from_hours, Config, DEFAULT_API_URL};

    /// 環境変数を書き換えるテストを直列化するためのロック。
    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn write_temp_config(name: &str, content: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("toggl-timer-{}-{}", name, std::process::id()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_token_from_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        env::set_var("TOGGL_API_TOKEN", " env-token \n");
        env::remove_var("TOGGL_API_URL");

        let config = Config::load(Some(Path::new("/nonexistent")), Some(1)).unwrap();

        assert_eq!(config.api_token, "env-token");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timezone, FixedOffset::east_opt(3600).unwrap());
        env::remove_var("TOGGL_API_TOKEN");
    }

    #[test]
    fn test_load_token_from_file() {
        let _lock = ENV_LOCK.lock().unwrap();
        env::remove_var("TOGGL_API_TOKEN");
        env::set_var("TOGGL_API_URL", "http://localhost:1234");
        let path = write_temp_config("load", "file-token\nsecond line\n");

        let config = Config::load(Some(path.as_path()), Some(-4)).unwrap();

        assert_eq!(config.api_token, "file-token");
        assert_eq!(config.api_url, "http://localhost:1234");
        assert_eq!(config.timezone, FixedOffset::west_opt(4 * 3600).unwrap());
        env::remove_var("TOGGL_API_URL");
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_load_without_token() {
        let _lock = ENV_LOCK.lock().unwrap();
        env::remove_var("TOGGL_API_TOKEN");
        env::remove_var("TOGGL_API_URL");

        let result = Config::load(Some(Path::new("/nonexistent/toggl")), Some(0));

        assert!(result.is_err());
        env::remove_var("TOGGL_API_URL");
    }

    #[test]
    fn test_read_api_token_empty_file() {
        let path = write_temp_config("empty", "\n");

        assert!(read_api_token(&path).is_err());
        fs::remove_file(path).unwrap();
    }

    #[rstest]
    #[case(0, 0)]
    #[case(9, 9 * 3600)]
    #[case(-12, -12 * 3600)]
    fn test_timezone_from_hours(#[case] hours: i32, #[case] seconds: i32) {
        assert_eq!(
            timezone_from_hours(hours).unwrap().local_minus_utc(),
            seconds
        );
    }

    #[rstest]
    #[case(24)]
    #[case(-24)]
    #[case(100)]
    fn test_timezone_from_hours_out_of_range(#[case] hours: i32) {
        assert!(timezone_from_hours(hours).is_err());
    }
}
