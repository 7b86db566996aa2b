//! Client for the third-party live-score API (Cricbuzz via RapidAPI).
//!
//! The serving layer never depends on this call succeeding: any transport,
//! auth or shape problem degrades to an empty update.

use crate::config::LiveScoreConfig;
use crate::error::Result;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

pub struct CricbuzzClient {
    client: reqwest::Client,
    config: LiveScoreConfig,
    api_key: Option<String>,
}

impl CricbuzzClient {
    pub fn new(config: LiveScoreConfig, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            api_key,
        }
    }

    /// One fetch-and-extract cycle. Empty object when no live match is on or
    /// anything fails along the way.
    pub async fn live_score(&self) -> Value {
        match self.fetch_live_matches().await {
            Ok(body) => extract_live_score(&body, &self.config.series_filter)
                .unwrap_or_else(|| {
                    debug!(
                        series = %self.config.series_filter,
                        "No live match found for configured series"
                    );
                    Value::Object(Map::new())
                }),
            Err(e) => {
                warn!("Failed to fetch live score data: {}", e);
                Value::Object(Map::new())
            }
        }
    }

    /// GET with bounded retry: client errors back off and retry, anything
    /// else (or exhausted attempts) propagates.
    async fn fetch_live_matches(&self) -> Result<Value> {
        let url = format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.live_matches_path
        );
        let api_key = self.api_key.as_deref().unwrap_or_default();

        let mut attempt = 0;
        loop {
            let response = self
                .client
                .get(&url)
                .header("x-rapidapi-key", api_key)
                .header("x-rapidapi-host", &self.config.host_header)
                .send()
                .await?;

            if response.status().is_client_error() && attempt < self.config.retry_attempts {
                attempt += 1;
                warn!(
                    status = response.status().as_u16(),
                    attempt, "Live-score API returned a client error, backing off"
                );
                tokio::time::sleep(Duration::from_secs(self.config.retry_backoff_secs)).await;
                continue;
            }

            let body = response.error_for_status()?.json::<Value>().await?;
            return Ok(body);
        }
    }
}

/// Walks the live-matches payload for the first League-series match whose
/// series name contains `series_filter`, skipping ad entries.
pub fn extract_live_score(body: &Value, series_filter: &str) -> Option<Value> {
    let type_matches = body.get("typeMatches")?.as_array()?;

    let match_info = type_matches
        .iter()
        .filter(|entry| {
            entry
                .get("matchType")
                .and_then(Value::as_str)
                .map_or(false, |t| t.eq_ignore_ascii_case("League"))
        })
        .flat_map(|entry| {
            entry
                .get("seriesMatches")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
        })
        .filter_map(|series| {
            let wrapper = series.get("seriesAdWrapper")?;
            if wrapper.get("adDetail").is_some() {
                return None;
            }
            let name = wrapper.get("seriesName").and_then(Value::as_str)?;
            if !name.contains(series_filter) {
                return None;
            }
            wrapper
                .get("matches")
                .and_then(Value::as_array)?
                .first()?
                .get("matchInfo")
        })
        .next()?;

    let mut update = Map::new();
    update.insert(
        "matchDesc".into(),
        json!(match_info.get("matchDesc").and_then(Value::as_str).unwrap_or_default()),
    );
    update.insert(
        "status".into(),
        json!(match_info.get("status").and_then(Value::as_str).unwrap_or_default()),
    );

    if match_info
        .get("state")
        .and_then(Value::as_str)
        .map_or(false, |s| s.eq_ignore_ascii_case("Delay"))
    {
        update.insert(
            "stateTitle".into(),
            json!(match_info.get("stateTitle").and_then(Value::as_str).unwrap_or_default()),
        );
    }

    if let Some(score) = match_info.get("matchScore") {
        for side in ["team1", "team2"] {
            if let Some(name) = match_info
                .get(side)
                .and_then(|t| t.get("teamName"))
                .and_then(Value::as_str)
            {
                update.insert(format!("{}Name", side), json!(name));
            }
            if let Some(innings) = score.get(format!("{}Score", side)).and_then(|s| s.get("inngs1"))
            {
                if let Some(runs) = innings.get("runs").and_then(Value::as_i64) {
                    update.insert(format!("{}Runs", side), json!(runs));
                }
                if let Some(wickets) = innings.get("wickets").and_then(Value::as_i64) {
                    update.insert(format!("{}Wickets", side), json!(wickets));
                }
                if let Some(overs) = innings.get("overs").and_then(Value::as_f64) {
                    update.insert(format!("{}Overs", side), json!(overs));
                }
            }
        }
    }

    Some(Value::Object(update))
}
