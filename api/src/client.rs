use crate::{CalendarResults, RankingsQuery};
use log::{debug, warn};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const IFPA_BASE_URL: &str = "https://api.ifpapinball.com";
const API_KEY_PARAM: &str = "apiKey";
const DEFAULT_COUNTRY: &str = "United States";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// IFPA API client. Holds the API key and base URL; every call issues exactly
/// one GET and nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct IfpaApi {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug)]
pub enum ApiError {
    /// A required argument was empty; no request was sent.
    MissingParameter(&'static str),
    Network(reqwest::Error, String),
    Status { status: StatusCode, url: String },
    Parsing(serde_json::Error, String),
    Other(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(e, _) => e.status(),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::MissingParameter(_))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingParameter(name) => write!(f, "{name} required"),
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Status { status, url } => {
                write!(f, "API error for {url}: {}", describe_status(*status))
            }
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) => Some(e),
            ApiError::Parsing(e, _) => Some(e),
            _ => None,
        }
    }
}

/// Human-readable meaning of an IFPA status code. Advisory only; it never
/// changes how a failure is handled.
pub fn describe_status(status: StatusCode) -> String {
    match status.as_u16() {
        400 => "A parameter is missing or is invalid".into(),
        401 => "Authentication failed".into(),
        404 => "Resource cannot be found".into(),
        405 => "HTTP method not allowed".into(),
        429 => "Rate limit exceeded".into(),
        500 => "Server error".into(),
        code => format!("Got HTTP status code {code}"),
    }
}

impl IfpaApi {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("ifpa-api/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            base_url: IFPA_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point the client at another host, e.g. a staging server or a test mock.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Calendar
    // -----------------------------------------------------------------------

    /// Past calendar events for `country` (default "United States"),
    /// optionally narrowed to one `state`.
    pub async fn past_calendar_events(
        &self,
        country: Option<&str>,
        state: Option<&str>,
    ) -> ApiResult<CalendarResults> {
        self.calendar_events("/v1/calendar/history", country, state).await
    }

    /// Active calendar events for `country` (default "United States"),
    /// optionally narrowed to one `state`.
    pub async fn active_calendar_events(
        &self,
        country: Option<&str>,
        state: Option<&str>,
    ) -> ApiResult<CalendarResults> {
        self.calendar_events("/v1/calendar/active", country, state).await
    }

    async fn calendar_events(
        &self,
        path: &str,
        country: Option<&str>,
        state: Option<&str>,
    ) -> ApiResult<CalendarResults> {
        let country = non_empty(country).unwrap_or(DEFAULT_COUNTRY);
        let raw = self.get(path, &[("country", country.to_owned())]).await?;
        let state = state.filter(|s| !s.trim().is_empty());
        CalendarResults::from_value(raw, state)
            .map_err(|e| ApiError::Parsing(e, path.to_owned()))
    }

    // -----------------------------------------------------------------------
    // Players
    // -----------------------------------------------------------------------

    pub async fn player_information(&self, player_id: &str) -> ApiResult<Value> {
        let player_id = required("playerId", player_id)?;
        self.get(&format!("/v1/player/{player_id}"), &[]).await
    }

    pub async fn player_history(&self, player_id: &str) -> ApiResult<Value> {
        let player_id = required("playerId", player_id)?;
        self.get(&format!("/v1/player/{player_id}/history"), &[]).await
    }

    /// Tournament results for a player.
    pub async fn player_results(&self, player_id: &str) -> ApiResult<Value> {
        let player_id = required("playerId", player_id)?;
        self.get(&format!("/v1/player/{player_id}/results"), &[]).await
    }

    /// Head-to-head record of a player against everyone they have met.
    pub async fn player_vs_player(&self, player_id: &str) -> ApiResult<Value> {
        let player_id = required("playerId", player_id)?;
        self.get(&format!("/v1/player/{player_id}/pvp"), &[]).await
    }

    pub async fn country_directors(&self) -> ApiResult<Value> {
        self.get("/v1/player/country_directors", &[]).await
    }

    /// Matches any part of a player's first or last name.
    pub async fn search_players_by_name(&self, name: &str) -> ApiResult<Value> {
        let name = required("name", name)?;
        self.get("/v1/player/search", &[("q", name.to_owned())]).await
    }

    pub async fn search_players_by_email(&self, email: &str) -> ApiResult<Value> {
        let email = required("email", email)?;
        self.get("/v1/player/search", &[("email", email.to_owned())]).await
    }

    // -----------------------------------------------------------------------
    // Rankings & stats
    // -----------------------------------------------------------------------

    pub async fn rankings(&self, query: &RankingsQuery) -> ApiResult<Value> {
        self.get("/v1/rankings", &query.query_pairs()).await
    }

    /// Biggest movers in ranking position this year (top 250).
    pub async fn biggest_movers(&self) -> ApiResult<Value> {
        self.get("/v1/stats/biggest_movers", &[]).await
    }

    // -----------------------------------------------------------------------
    // Transport
    // -----------------------------------------------------------------------

    fn build_url(&self, path: &str, query: &[(&str, String)]) -> ApiResult<Url> {
        let raw = format!("{}{path}", self.base_url.trim_end_matches('/'));
        let params = std::iter::once((API_KEY_PARAM, self.api_key.as_str()))
            .chain(query.iter().map(|(k, v)| (*k, v.as_str())));
        Url::parse_with_params(&raw, params)
            .map_err(|e| ApiError::Other(format!("invalid url {raw}: {e}")))
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> ApiResult<Value> {
        let url = self.build_url(path, query)?;
        debug!("GET {path}");

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, path.to_owned()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("IFPA request {path} failed: {}", describe_status(status));
            return Err(ApiError::Status {
                status,
                url: path.to_owned(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e, path.to_owned()))?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Parsing(e, path.to_owned()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(name: &'static str, value: &'a str) -> ApiResult<&'a str> {
    non_empty(Some(value)).ok_or(ApiError::MissingParameter(name))
}
