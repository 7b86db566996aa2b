use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single historical match, canonical after ingestion.
///
/// Name fields (teams, toss winner, winner, venue) hold canonicalized values;
/// optional fields are `None` when the CSV carried a blank or the missing
/// marker. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// Assigned by storage on save; `None` until then.
    pub id: Option<u64>,
    pub city: String,
    pub date: NaiveDate,
    pub player_of_match: Option<String>,
    pub venue: Option<String>,
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub toss_winner: Option<String>,
    pub toss_decision: String,
    pub match_winner: Option<String>,
    pub result: String,
    pub result_margin: Option<String>,
    pub umpire1: String,
    pub umpire2: String,
    pub season: String,
    pub match_type: String,
    pub target_runs: Option<String>,
    pub target_overs: Option<String>,
    pub super_over: String,
    pub method: Option<String>,
}

impl Match {
    /// True when the given team played this match on either side.
    pub fn involves(&self, team_name: &str) -> bool {
        self.team1.as_deref() == Some(team_name) || self.team2.as_deref() == Some(team_name)
    }

    /// True when the given team is recorded as the winner.
    pub fn won_by(&self, team_name: &str) -> bool {
        self.match_winner.as_deref() == Some(team_name)
    }
}

/// Aggregated team record, keyed by canonical team name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub team_name: String,
    pub total_matches: u64,
    pub total_wins: u64,
    pub primary_color: String,
    pub secondary_color: String,
    pub tagline: String,
    /// Populated at query time only; never persisted.
    pub matches: Option<Vec<Match>>,
}

/// Per-player count of player-of-the-match awards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub total_player_of_match_awards: u64,
}

/// Derived per-venue record for one team; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueStats {
    pub total_matches: u64,
    pub total_wins: u64,
    pub win_percentage: f64,
}

impl VenueStats {
    pub fn new(total_matches: u64, total_wins: u64) -> Self {
        let win_percentage = if total_matches == 0 {
            0.0
        } else {
            let pct = total_wins as f64 / total_matches as f64 * 100.0;
            (pct * 100.0).round() / 100.0
        };
        Self {
            total_matches,
            total_wins,
            win_percentage,
        }
    }

    /// Win percentage rendered with two decimal places, e.g. "0.00".
    pub fn formatted_percentage(&self) -> String {
        format!("{:.2}", self.win_percentage)
    }
}
