use pulsemap_types::{Outbreak, OutbreakLocation, Report};
use reqwest::Url;
use serde::de::DeserializeOwned;

use super::{FeatureRows, FeedRows, OutbreakSource};
use crate::error::PulseError;

const DEFAULT_FEED_LIMIT: usize = 20;
const DEFAULT_USER_AGENT: &str = concat!("pulsemap/", env!("CARGO_PKG_VERSION"));

const OUTBREAK_COLUMNS: &str = "id,disease_name,status,severity,first_reported,last_updated,summary";
const LOCATION_COLUMNS: &str =
    "id,outbreak_id,latitude,longitude,country,region,case_count,severity_score,reported_at";
const REPORT_COLUMNS: &str =
    "id,outbreak_id,source_type,source_name,title,url,content,published_at,created_at";

/// Configuration of a [`RestSource`].
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteSourceConfig {
    base_url: String,
    api_key: String,
    feed_limit: usize,
    user_agent: String,
}

impl std::fmt::Debug for RemoteSourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSourceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("feed_limit", &self.feed_limit)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl RemoteSourceConfig {
    /// Creates a configuration for the store at `base_url` (without the `/rest/v1` suffix),
    /// authenticated with `api_key`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            feed_limit: DEFAULT_FEED_LIMIT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Base url of the store.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Maximum number of reports loaded for the feed.
    pub fn feed_limit(&self) -> usize {
        self.feed_limit
    }

    /// Sets maximum number of reports loaded for the feed.
    pub fn with_feed_limit(mut self, limit: usize) -> Self {
        self.feed_limit = limit;
        self
    }

    /// Sets maximum number of reports loaded for the feed.
    pub fn set_feed_limit(&mut self, limit: usize) {
        self.feed_limit = limit;
    }

    /// User agent sent with the requests.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Sets the user agent sent with the requests.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Loads rows from a PostgREST style HTTP API (`<base_url>/rest/v1/<table>`).
///
/// Parent rows are fetched as separate flat tables and joined by the caller, no query-side
/// relation embedding is used.
#[derive(Debug, Clone)]
pub struct RestSource {
    http_client: reqwest::Client,
    rest_url: Url,
    config: RemoteSourceConfig,
}

impl RestSource {
    /// Creates a new source.
    pub fn new(config: RemoteSourceConfig) -> Result<Self, PulseError> {
        let base = Url::parse(config.base_url())
            .map_err(|err| PulseError::Config(format!("invalid base url: {err}")))?;
        if base.cannot_be_a_base() {
            return Err(PulseError::Config(format!(
                "{} cannot be used as a base url",
                config.base_url()
            )));
        }

        let rest_url = base
            .join(&format!("{}/rest/v1/", base.path().trim_end_matches('/')))
            .map_err(|err| PulseError::Config(format!("invalid base url: {err}")))?;

        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .build()?;

        Ok(Self {
            http_client,
            rest_url,
            config,
        })
    }

    /// Configuration of the source.
    pub fn config(&self) -> &RemoteSourceConfig {
        &self.config
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, PulseError> {
        let url = self
            .rest_url
            .join(table)
            .map_err(|err| PulseError::Config(err.to_string()))?;

        let response = self
            .http_client
            .get(url)
            .query(query)
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::info!("Failed to load {table}: {status}, {body}");
            return Err(PulseError::RemoteUnavailable(format!(
                "{table} request failed with status {status}"
            )));
        }

        let rows: Vec<T> = response.json().await?;
        log::debug!("Loaded {} rows from {table}", rows.len());
        Ok(rows)
    }

    async fn outbreaks(&self, ids: Option<&[String]>) -> Result<Vec<Outbreak>, PulseError> {
        let mut query = vec![("select", OUTBREAK_COLUMNS.to_string())];
        if let Some(ids) = ids {
            query.push(("id", in_filter(ids)));
        }

        self.select("outbreaks", &query).await
    }

    async fn locations(
        &self,
        outbreak_ids: Option<&[String]>,
    ) -> Result<Vec<OutbreakLocation>, PulseError> {
        let mut query = vec![("select", LOCATION_COLUMNS.to_string())];
        if let Some(ids) = outbreak_ids {
            query.push(("outbreak_id", in_filter(ids)));
        }

        self.select("outbreak_locations", &query).await
    }

    async fn reports(&self) -> Result<Vec<Report>, PulseError> {
        let query = [
            ("select", REPORT_COLUMNS.to_string()),
            ("order", "published_at.desc.nullslast".to_string()),
            ("limit", self.config.feed_limit().to_string()),
        ];

        self.select("reports", &query).await
    }
}

fn in_filter(ids: &[String]) -> String {
    let quoted: Vec<String> = ids
        .iter()
        .map(|id| format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

#[async_trait::async_trait]
impl OutbreakSource for RestSource {
    async fn load_feature_rows(&self) -> Result<FeatureRows, PulseError> {
        let (locations, outbreaks) = tokio::join!(self.locations(None), self.outbreaks(None));

        Ok(FeatureRows {
            locations: locations?,
            outbreaks: outbreaks?,
        })
    }

    async fn load_feed_rows(&self) -> Result<FeedRows, PulseError> {
        let reports = self.reports().await?;
        if reports.is_empty() {
            return Ok(FeedRows::default());
        }

        let mut outbreak_ids: Vec<String> = reports.iter().map(|r| r.outbreak_id.clone()).collect();
        outbreak_ids.sort();
        outbreak_ids.dedup();

        let (outbreaks, locations) = tokio::join!(
            self.outbreaks(Some(&outbreak_ids)),
            self.locations(Some(&outbreak_ids))
        );

        Ok(FeedRows {
            reports,
            outbreaks: outbreaks?,
            locations: locations?,
        })
    }
}
