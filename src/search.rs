//! Combined team/player search with abbreviation expansion.

use crate::model::{Player, Team};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Common shorthand fans actually type, mapped to full franchise names.
static TEAM_ABBREVIATIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("mi", "Mumbai Indians"),
        ("csk", "Chennai Super Kings"),
        ("rcb", "Royal Challengers Bangalore"),
        ("kkr", "Kolkata Knight Riders"),
        ("srh", "Sunrisers Hyderabad"),
        ("rr", "Rajasthan Royals"),
        ("pbks", "Punjab Kings"),
        ("kxip", "Punjab Kings"),
        ("dc", "Delhi Capitals"),
        ("dd", "Delhi Capitals"),
        ("lsg", "Lucknow Super Giants"),
        ("gt", "Gujarat Titans"),
        ("dcg", "Deccan Chargers"),
        ("ktk", "Kochi Tuskers Kerala"),
        ("rps", "Rising Pune Supergiants"),
        ("rpsg", "Rising Pune Supergiants"),
        ("gl", "Gujarat Lions"),
    ])
});

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
}

/// Expands an abbreviation to its full team name, or echoes the query.
pub fn expand_team_alias(query: &str) -> String {
    TEAM_ABBREVIATIONS
        .get(query.trim().to_lowercase().as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| query.trim().to_string())
}

/// An exact team hit (after alias expansion, case-insensitive) short-circuits
/// with just that team; otherwise substring search over teams and players.
pub fn search(query: &str, teams: Vec<Team>, players: Vec<Player>) -> SearchResults {
    let expanded = expand_team_alias(query);

    if let Some(team) = teams
        .iter()
        .find(|t| t.team_name.eq_ignore_ascii_case(&expanded))
    {
        return SearchResults {
            teams: vec![team.clone()],
            players: Vec::new(),
        };
    }

    let needle = query.trim().to_lowercase();
    let matching_teams = teams
        .into_iter()
        .filter(|t| t.team_name.to_lowercase().contains(&needle))
        .collect();
    let matching_players = players
        .into_iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect();

    SearchResults {
        teams: matching_teams,
        players: matching_players,
    }
}
