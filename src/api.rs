use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const ALL_POSITIONS: &str = "ALL";

const REQUEST_TIMEOUT_SECS: u64 = 10;

static CLIENT: OnceCell<Client> = OnceCell::new();

fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

/// Client for the FutScout statistics backend. The base URL is injected at
/// construction; only the underlying reqwest client is process-wide.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn from_env() -> Self {
        let base = env::var("FUTSCOUT_API_URL")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// User-facing message for any transport-level failure against this
    /// backend.
    pub fn connectivity_message(&self) -> String {
        format!(
            "Cannot reach the FutScout backend. Check that the API is running on {}.",
            self.base_url
        )
    }

    pub fn fetch_health(&self) -> Result<Option<BackendHealth>> {
        let body = self.get_text("/health", &[])?;
        parse_health_json(&body)
    }

    pub fn fetch_leagues(&self) -> Result<Vec<String>> {
        let body = self.get_text("/meta/leagues", &[])?;
        parse_leagues_json(&body)
    }

    pub fn fetch_positions(&self) -> Result<Vec<String>> {
        let body = self.get_text("/meta/positions", &[])?;
        parse_positions_json(&body)
    }

    pub fn fetch_players(&self, league: &str, pos: &str, min90s: f64) -> Result<Vec<PlayerRow>> {
        let query = [
            ("league", league.to_string()),
            ("pos", pos.to_string()),
            ("min90s", format_min90s(min90s)),
        ];
        let body = self.get_text("/players", &query)?;
        parse_players_json(&body)
    }

    pub fn fetch_compare(
        &self,
        league: &str,
        player_a: &str,
        player_b: &str,
        pos: &str,
        min90s: f64,
    ) -> Result<CompareResponse> {
        let query = [
            ("league", league.to_string()),
            ("player_a", player_a.to_string()),
            ("player_b", player_b.to_string()),
            ("pos", pos.to_string()),
            ("min90s", format_min90s(min90s)),
        ];
        let body = self.get_text("/compare", &query)?;
        parse_compare_json(&body)
    }

    fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let client = http_client()?;
        let url = format!("{}{}", self.base_url, path);
        let resp = client
            .get(&url)
            .query(query)
            .send()
            .with_context(|| format!("request failed: {path}"))?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow::anyhow!("http {}: {}", status, body));
        }
        Ok(body)
    }
}

fn format_min90s(min90s: f64) -> String {
    // The backend parses the query value as a float; one decimal matches the
    // 0.5 steps the filter moves in.
    format!("{min90s:.1}")
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackendHealth {
    pub ok: bool,
    #[serde(default)]
    pub rows: u64,
    #[serde(default)]
    pub cols: u64,
}

/// One row of the `/players` listing. Field names follow the backend wire
/// format; the numeric columns may be null for players with gaps in the
/// source data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRow {
    #[serde(rename = "Player")]
    pub name: String,
    #[serde(rename = "Squad")]
    pub squad: String,
    #[serde(rename = "Pos")]
    pub pos: String,
    #[serde(rename = "Age", default)]
    pub age: Option<i64>,
    #[serde(rename = "Min", default)]
    pub minutes: Option<i64>,
    #[serde(rename = "90s", default)]
    pub nineties: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarData {
    pub labels: Vec<String>,
    pub percentiles: Vec<f64>,
    pub values: Vec<f64>,
    #[serde(default)]
    pub overall: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapData {
    pub matrix: Vec<Vec<f64>>,
    #[serde(rename = "xLabels")]
    pub x_labels: Vec<String>,
    #[serde(rename = "yLabels")]
    pub y_labels: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSide {
    pub name: String,
    pub squad: String,
    pub pos: String,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub minutes: Option<i64>,
    #[serde(default)]
    pub nineties: Option<f64>,
    pub radar: RadarData,
    pub heatmap: HeatmapData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareFilters {
    #[serde(default)]
    pub pos: String,
    #[serde(default)]
    pub min90s: f64,
}

/// `/compare` response: either both player sides, or an error-carrying
/// variant of the same shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub league: String,
    #[serde(default)]
    pub filters: Option<CompareFilters>,
    #[serde(rename = "playerA", default)]
    pub player_a: Option<PlayerSide>,
    #[serde(rename = "playerB", default)]
    pub player_b: Option<PlayerSide>,
}

impl CompareResponse {
    pub fn domain_error(&self) -> Option<&str> {
        self.error.as_deref().filter(|msg| !msg.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct LeaguesResponse {
    #[serde(default)]
    leagues: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PositionsResponse {
    #[serde(default)]
    positions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PlayersResponse {
    #[serde(default)]
    players: Vec<PlayerRow>,
}

fn empty_body(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        None
    } else {
        Some(trimmed)
    }
}

pub fn parse_health_json(raw: &str) -> Result<Option<BackendHealth>> {
    let Some(trimmed) = empty_body(raw) else {
        return Ok(None);
    };
    let health = serde_json::from_str(trimmed).context("invalid health json")?;
    Ok(Some(health))
}

pub fn parse_leagues_json(raw: &str) -> Result<Vec<String>> {
    let Some(trimmed) = empty_body(raw) else {
        return Ok(Vec::new());
    };
    let resp: LeaguesResponse = serde_json::from_str(trimmed).context("invalid leagues json")?;
    Ok(resp.leagues)
}

pub fn parse_positions_json(raw: &str) -> Result<Vec<String>> {
    let Some(trimmed) = empty_body(raw) else {
        return Ok(Vec::new());
    };
    let resp: PositionsResponse =
        serde_json::from_str(trimmed).context("invalid positions json")?;
    Ok(resp.positions)
}

pub fn parse_players_json(raw: &str) -> Result<Vec<PlayerRow>> {
    let Some(trimmed) = empty_body(raw) else {
        return Ok(Vec::new());
    };
    let resp: PlayersResponse = serde_json::from_str(trimmed).context("invalid players json")?;
    Ok(resp.players)
}

pub fn parse_compare_json(raw: &str) -> Result<CompareResponse> {
    let Some(trimmed) = empty_body(raw) else {
        return Ok(CompareResponse {
            error: Some("Comparison response was empty.".to_string()),
            league: String::new(),
            filters: None,
            player_a: None,
            player_b: None,
        });
    };
    serde_json::from_str(trimmed).context("invalid compare json")
}
