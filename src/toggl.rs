use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat};
use log::{debug, info};
#[cfg(test)]
use mockall::automock;
use reqwest::{header::CONTENT_TYPE, Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::datetime;
use crate::time_entry::TimeEntry;
use crate::time_format::format_timestamp;

/// Toggl APIに作成元として送るクライアント名。
const CREATED_WITH: &str = "toggl-timer";

/// Toggl APIのタイムエントリーをデシリアライズするための構造体。
#[derive(Debug, Deserialize)]
struct TogglTimeEntry {
    id: i64,
    workspace_id: i64,
    description: Option<String>,
    start: DateTime<FixedOffset>,
    duration: i64,
    tags: Option<Vec<String>>,
}

impl From<TogglTimeEntry> for TimeEntry {
    fn from(entry: TogglTimeEntry) -> Self {
        Self {
            id: entry.id,
            workspace_id: entry.workspace_id,
            description: entry.description.unwrap_or_default(),
            start: entry.start,
            duration: entry.duration,
            tags: entry.tags.unwrap_or_default(),
        }
    }
}

/// `/me`のレスポンスのうち利用する項目。
#[derive(Debug, Deserialize)]
struct TogglMe {
    default_workspace_id: i64,
}

/// タイムエントリー作成時のリクエストボディ。
#[derive(Debug, Serialize)]
struct NewTimeEntry<'a> {
    created_with: &'a str,
    description: &'a str,
    tags: &'a [String],
    workspace_id: i64,
    start: String,
    duration: i64,
}

/// タイムエントリーを読み書きするためのリポジトリ。
#[cfg_attr(test, automock)]
pub trait TogglRepository {
    /// 計測中のエントリーを返す。計測中のものがなければ`None`。
    async fn running_entry(&self) -> Result<Option<TimeEntry>>;

    /// `start_date`から`end_date`まで(両端を含む)のエントリーを返す。順序は保証しない。
    async fn entries_between(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<TimeEntry>>;

    /// 現在時刻から計測を開始する。
    async fn start_entry(&self, description: &str, tags: &[String]) -> Result<()>;

    /// 計測中のエントリーを停止する。
    async fn stop_entry(&self) -> Result<()>;

    /// 終了済みのエントリーを作成する。
    async fn create_entry(
        &self,
        description: &str,
        start: &DateTime<FixedOffset>,
        duration: i64,
        tags: &[String],
    ) -> Result<()>;
}

/// Toggl APIと通信するためのクライアント。
///
/// # Examples
///
/// ```
/// let client = TogglClient::new(&config);
/// let entry = client.running_entry().await.unwrap();
/// ```
pub struct TogglClient {
    client: Client,
    api_url: String,
    api_token: String,
}

impl TogglClient {
    /// 新しい`TogglClient`を返す。
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        }
    }

    /// 認証ヘッダーを付けたリクエストを組み立てる。
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!("{} {}{}", method, self.api_url, path);
        self.client
            .request(method, format!("{}{}", self.api_url, path))
            .basic_auth(&self.api_token, Some("api_token"))
            .header(CONTENT_TYPE, "application/json")
    }

    /// リクエストを送り、ステータスを確認したレスポンスを返す。
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        request
            .send()
            .await
            .with_context(|| format!("Failed to send request to Toggl API at {}", self.api_url))?
            .error_for_status()
            .context("Request returned an error status")
    }

    /// 新しいエントリーを作成するワークスペースを返す。
    async fn default_workspace_id(&self) -> Result<i64> {
        let me = self
            .send(self.request(Method::GET, "/me"))
            .await?
            .json::<TogglMe>()
            .await
            .context("Failed to deserialize user information")?;

        Ok(me.default_workspace_id)
    }

    async fn post_entry(&self, body: &NewTimeEntry<'_>) -> Result<()> {
        let path = format!("/workspaces/{}/time_entries", body.workspace_id);
        self.send(self.request(Method::POST, &path).json(body))
            .await
            .with_context(|| format!("Failed to create time entry: {}", body.description))?;

        Ok(())
    }
}

impl TogglRepository for TogglClient {
    async fn running_entry(&self) -> Result<Option<TimeEntry>> {
        let entry = self
            .send(self.request(Method::GET, "/me/time_entries/current"))
            .await?
            .json::<Option<TogglTimeEntry>>()
            .await
            .context("Failed to deserialize running time entry")?;
        info!("running entry found: {}", entry.is_some());

        Ok(entry.map(TimeEntry::from))
    }

    async fn entries_between(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<TimeEntry>> {
        // APIの`end_date`は含まれないため、翌日を指定する
        let end_exclusive = end_date
            .succ_opt()
            .with_context(|| format!("Failed to get the day after {}", end_date))?;
        let entries = self
            .send(self.request(Method::GET, "/me/time_entries").query(&[
                ("start_date", start_date.format("%Y-%m-%d").to_string()),
                ("end_date", end_exclusive.format("%Y-%m-%d").to_string()),
            ]))
            .await?
            .json::<Vec<TogglTimeEntry>>()
            .await
            .context("Failed to deserialize time entries")?;
        info!("length of time entries: {}", entries.len());

        Ok(entries.into_iter().map(TimeEntry::from).collect())
    }

    async fn start_entry(&self, description: &str, tags: &[String]) -> Result<()> {
        let workspace_id = self
            .default_workspace_id()
            .await
            .context("Failed to get default workspace")?;
        let body = NewTimeEntry {
            created_with: CREATED_WITH,
            description,
            tags,
            workspace_id,
            start: datetime::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            duration: -1,
        };
        info!("start entry: {}", description);

        self.post_entry(&body).await
    }

    async fn stop_entry(&self) -> Result<()> {
        let Some(entry) = self.running_entry().await? else {
            bail!("No running time entry to stop");
        };
        let path = format!(
            "/workspaces/{}/time_entries/{}/stop",
            entry.workspace_id, entry.id
        );
        info!("stop entry: {}", entry.id);
        self.send(self.request(Method::PATCH, &path))
            .await
            .with_context(|| format!("Failed to stop time entry: {}", entry.description))?;

        Ok(())
    }

    async fn create_entry(
        &self,
        description: &str,
        start: &DateTime<FixedOffset>,
        duration: i64,
        tags: &[String],
    ) -> Result<()> {
        let workspace_id = self
            .default_workspace_id()
            .await
            .context("Failed to get default workspace")?;
        let body = NewTimeEntry {
            created_with: CREATED_WITH,
            description,
            tags,
            workspace_id,
            start: format_timestamp(start),
            duration,
        };
        info!("create entry: {} ({}s from {})", description, duration, body.start);

        self.post_entry(&body).await
    }
}
