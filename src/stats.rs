//! Query-time recomputation over stored matches.
//!
//! These folds reuse the ingestion counting rules on a filtered subset, so a
//! filtered view and the persisted totals can never disagree on semantics.

use crate::model::{Match, Team, VenueStats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashMap;

/// Optional equality filters for match subsets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchFilters {
    pub season: Option<String>,
    pub venue: Option<String>,
    #[serde(rename = "matchType")]
    pub match_type: Option<String>,
}

impl MatchFilters {
    pub fn matches(&self, m: &Match) -> bool {
        if let Some(season) = &self.season {
            if &m.season != season {
                return false;
            }
        }
        if let Some(venue) = &self.venue {
            if m.venue.as_deref() != Some(venue.as_str()) {
                return false;
            }
        }
        if let Some(match_type) = &self.match_type {
            if !m.match_type.eq_ignore_ascii_case(match_type) {
                return false;
            }
        }
        true
    }
}

pub fn filter_matches(matches: &[Match], filters: &MatchFilters) -> Vec<Match> {
    matches
        .iter()
        .filter(|m| filters.matches(m))
        .cloned()
        .collect()
}

/// Recomputes match/win counters for the known teams over a filtered subset.
///
/// Same increment rule as ingestion, scoped to teams that already exist:
/// unknown names in the subset are ignored rather than creating entries.
pub fn filtered_team_stats(known_teams: Vec<Team>, filtered: &[Match]) -> Vec<Team> {
    let mut table: HashMap<String, Team> = known_teams
        .into_iter()
        .map(|mut team| {
            team.total_matches = 0;
            team.total_wins = 0;
            team.matches = None;
            (team.team_name.clone(), team)
        })
        .collect();

    for m in filtered {
        if let Some(team1) = m.team1.as_deref() {
            if let Some(entry) = table.get_mut(team1) {
                entry.total_matches += 1;
            }
        }
        if let Some(team2) = m.team2.as_deref() {
            if let Some(entry) = table.get_mut(team2) {
                entry.total_matches += 1;
            }
        }
        if let Some(winner) = m.match_winner.as_deref() {
            if let Some(entry) = table.get_mut(winner) {
                entry.total_wins += 1;
            }
        }
    }

    let mut teams: Vec<Team> = table.into_values().collect();
    teams.sort_by(|a, b| a.team_name.cmp(&b.team_name));
    teams
}

/// Attaches a filtered match list to a team and recomputes its totals from
/// that list alone.
pub fn team_with_matches(mut team: Team, filtered: Vec<Match>) -> Team {
    team.total_matches = filtered.len() as u64;
    team.total_wins = filtered.iter().filter(|m| m.won_by(&team.team_name)).count() as u64;
    team.matches = Some(filtered);
    team
}

/// Head-to-head record between two teams.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHead {
    pub team1_name: String,
    pub team2_name: String,
    pub total_matches: u64,
    pub team1_wins: u64,
    pub team2_wins: u64,
    pub matches: Vec<Match>,
}

/// Builds the head-to-head record from the matches between the two teams.
/// The match set is the same regardless of argument order.
pub fn head_to_head(team1_name: &str, team2_name: &str, matches: Vec<Match>) -> HeadToHead {
    let team1_wins = matches.iter().filter(|m| m.won_by(team1_name)).count() as u64;
    let team2_wins = matches.iter().filter(|m| m.won_by(team2_name)).count() as u64;
    HeadToHead {
        team1_name: team1_name.to_string(),
        team2_name: team2_name.to_string(),
        total_matches: matches.len() as u64,
        team1_wins,
        team2_wins,
        matches,
    }
}

/// Groups a team's matches by venue and derives a win percentage per ground.
pub fn venue_breakdown(team_name: &str, matches: &[Match]) -> BTreeMap<String, VenueStats> {
    let mut counts: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for m in matches {
        let Some(venue) = m.venue.as_deref() else {
            continue;
        };
        let entry = counts.entry(venue.to_string()).or_default();
        entry.0 += 1;
        if m.won_by(team_name) {
            entry.1 += 1;
        }
    }

    counts
        .into_iter()
        .map(|(venue, (played, won))| (venue, VenueStats::new(played, won)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn match_between(team1: &str, team2: &str, winner: Option<&str>, day: u32) -> Match {
        Match {
            id: None,
            city: "Mumbai".into(),
            date: NaiveDate::from_ymd_opt(2019, 5, day).unwrap(),
            player_of_match: None,
            venue: Some("Wankhede Stadium, Mumbai".into()),
            team1: Some(team1.into()),
            team2: Some(team2.into()),
            toss_winner: Some(team1.into()),
            toss_decision: "bat".into(),
            match_winner: winner.map(Into::into),
            result: "runs".into(),
            result_margin: Some("10".into()),
            umpire1: "U1".into(),
            umpire2: "U2".into(),
            season: "2019".into(),
            match_type: "League".into(),
            target_runs: None,
            target_overs: None,
            super_over: "N".into(),
            method: None,
        }
    }

    fn team(name: &str) -> Team {
        Team {
            team_name: name.into(),
            total_matches: 99,
            total_wins: 99,
            primary_color: "#000000".into(),
            secondary_color: "#ffffff".into(),
            tagline: String::new(),
            matches: None,
        }
    }

    #[test]
    fn filtered_stats_reset_and_recount() {
        let matches = vec![
            match_between("Mumbai Indians", "Chennai Super Kings", Some("Mumbai Indians"), 1),
            match_between("Mumbai Indians", "Rajasthan Royals", Some("Rajasthan Royals"), 2),
        ];
        let teams = vec![team("Mumbai Indians"), team("Chennai Super Kings")];

        let stats = filtered_team_stats(teams, &matches);
        let mi = stats.iter().find(|t| t.team_name == "Mumbai Indians").unwrap();
        assert_eq!(mi.total_matches, 2);
        assert_eq!(mi.total_wins, 1);

        // Rajasthan Royals is not a known team here, so no entry appears
        assert!(stats.iter().all(|t| t.team_name != "Rajasthan Royals"));
    }

    #[test]
    fn filters_are_conjunctive_and_type_is_case_insensitive() {
        let mut final_match = match_between("A", "B", Some("A"), 3);
        final_match.match_type = "Final".into();
        let matches = vec![match_between("A", "B", Some("B"), 1), final_match];

        let filters = MatchFilters {
            season: Some("2019".into()),
            venue: None,
            match_type: Some("final".into()),
        };
        let filtered = filter_matches(&matches, &filters);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].match_type, "Final");
    }

    #[test]
    fn head_to_head_is_symmetric() {
        let matches = vec![
            match_between("A", "B", Some("A"), 1),
            match_between("B", "A", Some("A"), 2),
            match_between("A", "B", None, 3),
        ];

        let ab = head_to_head("A", "B", matches.clone());
        let ba = head_to_head("B", "A", matches);

        assert_eq!(ab.total_matches, ba.total_matches);
        assert_eq!(ab.team1_wins, 2);
        assert_eq!(ab.team2_wins, 0);
        assert_eq!(ba.team1_wins, 0);
        assert_eq!(ba.team2_wins, 2);
    }

    #[test]
    fn venue_breakdown_counts_wins_per_ground() {
        let mut away = match_between("A", "B", Some("B"), 2);
        away.venue = Some("Eden Gardens, Kolkata".into());
        let matches = vec![match_between("A", "B", Some("A"), 1), away];

        let breakdown = venue_breakdown("A", &matches);
        assert_eq!(breakdown["Wankhede Stadium, Mumbai"], VenueStats::new(1, 1));
        assert_eq!(breakdown["Eden Gardens, Kolkata"], VenueStats::new(1, 0));
        assert_eq!(
            breakdown["Eden Gardens, Kolkata"].formatted_percentage(),
            "0.00"
        );
    }

    #[test]
    fn team_with_matches_recomputes_totals_from_subset() {
        let matches = vec![
            match_between("A", "B", Some("A"), 1),
            match_between("A", "B", Some("B"), 2),
        ];
        let detailed = team_with_matches(team("A"), matches);
        assert_eq!(detailed.total_matches, 2);
        assert_eq!(detailed.total_wins, 1);
        assert_eq!(detailed.matches.as_ref().unwrap().len(), 2);
    }
}
