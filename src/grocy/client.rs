//! Grocy REST API client for chores

use chrono::{Local, NaiveDateTime};
use reqwest::{Client as HttpClient, Response, Url};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::gateway::{ChoreGateway, ChoreId, ChoreRecord, RemoteError};
use crate::config::GrocyConfig;

/// Header Grocy reads the API key from
const API_KEY_HEADER: &str = "GROCY-API-KEY";

/// Timestamp format Grocy uses in queries and payloads
const GROCY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Client for the chore endpoints of a Grocy instance
#[derive(Clone)]
pub struct GrocyClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
    dry_run: bool,
}

impl std::fmt::Debug for GrocyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrocyClient")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl GrocyClient {
    /// Create a client. With `dry_run` set, nothing is ever written to Grocy.
    pub fn new(config: &GrocyConfig, dry_run: bool) -> Result<Self, RemoteError> {
        let http_client = HttpClient::builder()
            .user_agent(concat!("grocy-todo/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RemoteError::new(None, e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            dry_run,
        })
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn url(&self, path: &str) -> Result<Url, RemoteError> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| RemoteError::new(None, format!("invalid URL {raw}: {e}")))
    }

    async fn post_execution(&self, id: ChoreId, body: &ExecuteChore) -> Result<(), RemoteError> {
        let url = self.url(&format!("/chores/{}/execute", id))?;
        debug!("POST {} skipped={}", url, body.skipped);

        let response = self
            .http_client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await?;
        Ok(())
    }
}

impl ChoreGateway for GrocyClient {
    async fn list_chores(&self, include_all: bool) -> Result<Vec<ChoreRecord>, RemoteError> {
        let now = Local::now().naive_local();
        let mut url = self.url("/chores")?;
        if !include_all {
            url.query_pairs_mut().append_pair(
                "query[]",
                &format!(
                    "next_estimated_execution_time<{}",
                    now.format(GROCY_TIME_FORMAT)
                ),
            );
        }
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;

        let wire: Vec<WireChore> = response
            .json()
            .await
            .map_err(|e| RemoteError::new(None, format!("unexpected chore listing: {e}")))?;

        let chores: Vec<ChoreRecord> = wire
            .into_iter()
            .filter_map(|chore| chore.into_record(now))
            .collect();
        debug!("Grocy listed {} chores", chores.len());
        Ok(chores)
    }

    async fn execute_chore(&self, id: ChoreId, at: Option<NaiveDateTime>) -> Result<(), RemoteError> {
        if self.dry_run {
            info!("Dry run: not executing chore {}", id);
            return Ok(());
        }
        let body = ExecuteChore {
            tracked_time: at.map(|t| t.format(GROCY_TIME_FORMAT).to_string()),
            skipped: false,
        };
        self.post_execution(id, &body).await
    }

    async fn skip_chore(&self, id: ChoreId) -> Result<(), RemoteError> {
        if self.dry_run {
            info!("Dry run: not skipping chore {}", id);
            return Ok(());
        }
        let body = ExecuteChore {
            tracked_time: None,
            skipped: true,
        };
        self.post_execution(id, &body).await
    }
}

#[derive(Debug, Serialize)]
struct ExecuteChore {
    #[serde(skip_serializing_if = "Option::is_none")]
    tracked_time: Option<String>,
    skipped: bool,
}

/// A row of `GET /chores`. Older Grocy versions send `id` instead of
/// `chore_id`, and numbers as strings.
#[derive(Debug, Deserialize)]
struct WireChore {
    #[serde(default, deserialize_with = "lenient_id")]
    chore_id: Option<u32>,
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<u32>,
    chore_name: String,
    #[serde(default)]
    next_estimated_execution_time: Option<String>,
}

impl WireChore {
    fn into_record(self, now: NaiveDateTime) -> Option<ChoreRecord> {
        let Some(id) = self.chore_id.or(self.id) else {
            warn!("Ignoring chore without id: {}", self.chore_name);
            return None;
        };
        let next = self
            .next_estimated_execution_time
            .as_deref()
            .and_then(|s| NaiveDateTime::parse_from_str(s, GROCY_TIME_FORMAT).ok());

        Some(ChoreRecord {
            id: ChoreId(id),
            name: self.chore_name,
            due_now: next.is_some_and(|t| t <= now),
            next_estimated_execution: next,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u32),
    Text(String),
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrString>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        NumberOrString::Number(n) => Some(n),
        NumberOrString::Text(s) => s.trim().parse().ok(),
    }))
}

#[derive(Deserialize)]
struct GrocyErrorBody {
    error_message: String,
}

fn transport_error(err: reqwest::Error) -> RemoteError {
    RemoteError::new(err.status().map(|s| s.as_u16()), err.to_string())
}

async fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<GrocyErrorBody>(&body) {
        Ok(parsed) => parsed.error_message,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    Err(RemoteError::new(Some(status.as_u16()), message))
}
