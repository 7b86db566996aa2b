//! One-shot ingestion of the historical match CSV.
//!
//! Runs once at startup against an empty store: read rows, canonicalize
//! names, build match entities, fold team/player counters, bulk-save. Any
//! malformed row or date aborts the whole batch.

use crate::constants::{CSV_DATE_FORMAT, MATCH_COLUMNS};
use crate::error::{DashboardError, Result};
use crate::model::{Match, Player, Team};
use crate::normalize;
use crate::storage::Storage;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Branding defaults per franchise: primary color, secondary color, tagline.
static TEAM_METADATA: Lazy<HashMap<&'static str, (&'static str, &'static str, &'static str)>> =
    Lazy::new(|| {
        HashMap::from([
            (
                "Chennai Super Kings",
                ("#F7C600", "#002E6D", "Whistle Podu (Blow the Whistle)"),
            ),
            (
                "Mumbai Indians",
                ("#003A7C", "#FFD200", "Duniya Hila Denge Hum (We will rock the world)"),
            ),
            (
                "Royal Challengers Bangalore",
                ("#C8102E", "#FFB400", "Ee Sala Cup Namde (This year the cup is ours)"),
            ),
            (
                "Kolkata Knight Riders",
                ("#3B0A45", "#FDB827", "Korbo, Lorbo, Jeetbo Re (We will act, fight, and win!)"),
            ),
            (
                "Rajasthan Royals",
                ("#1D4E89", "#F9A8D4", "Halla Bol (Raise Your Voice)"),
            ),
            ("Delhi Capitals", ("#012C5A", "#7C3AED", "Dildaar Dilli")),
            (
                "Sunrisers Hyderabad",
                ("#FF6A00", "#0B132B", "Rise Up to Every Challenge (Orange Army)"),
            ),
            ("Punjab Kings", ("#D7263D", "#FFD60A", "Sada Punjab (Our Punjab)")),
            (
                "Gujarat Titans",
                (
                    "#006A4E",
                    "#00A1E4",
                    "Sounds Like Thunder, Strikes Like Lightning, We Stop at Nothing",
                ),
            ),
            (
                "Lucknow Super Giants",
                ("#1D4ED8", "#FFD54A", "Bhavhar Ka Team"),
            ),
            (
                "Deccan Chargers",
                ("#003366", "#00AEEF", "Guts and Glory (Go Charging!)"),
            ),
            (
                "Rising Pune Supergiants",
                ("#002D62", "#FF6F3C", "Dum Ka Naya Rang (A new color of power)"),
            ),
            (
                "Pune Warriors India",
                ("#B2182B", "#F5AB35", "Saahasala Khel Mandla (Chalo Khel Mandla)"),
            ),
            (
                "Gujarat Lions",
                ("#E65100", "#FFD166", "Game Maari Chhe (It's Our Game)"),
            ),
            (
                "Kochi Tuskers Kerala",
                ("#2f855a", "#ecc94b", "The Power of the Elephant"),
            ),
        ])
    });

/// Neutral branding for teams absent from the metadata table.
const DEFAULT_METADATA: (&str, &str, &str) = ("#2D3748", "#4A5568", "");

/// One CSV row, unvalidated. Field order mirrors the export's column order.
#[derive(Debug, Clone)]
pub struct RawMatchRecord {
    pub id: String,
    pub season: String,
    pub city: String,
    pub date: String,
    pub match_type: String,
    pub player_of_match: String,
    pub venue: String,
    pub team1: String,
    pub team2: String,
    pub toss_winner: String,
    pub toss_decision: String,
    pub winner: String,
    pub result: String,
    pub result_margin: String,
    pub target_runs: String,
    pub target_overs: String,
    pub super_over: String,
    pub method: String,
    pub umpire1: String,
    pub umpire2: String,
}

impl RawMatchRecord {
    /// Builds a record from one positional row. `line` is 1-based and only
    /// used for error reporting.
    pub fn from_columns(columns: &[String], line: usize) -> Result<Self> {
        if columns.len() < MATCH_COLUMNS {
            return Err(DashboardError::MalformedRow {
                line,
                reason: format!("expected {} columns, got {}", MATCH_COLUMNS, columns.len()),
            });
        }
        Ok(Self {
            id: columns[0].clone(),
            season: columns[1].clone(),
            city: columns[2].clone(),
            date: columns[3].clone(),
            match_type: columns[4].clone(),
            player_of_match: columns[5].clone(),
            venue: columns[6].clone(),
            team1: columns[7].clone(),
            team2: columns[8].clone(),
            toss_winner: columns[9].clone(),
            toss_decision: columns[10].clone(),
            winner: columns[11].clone(),
            result: columns[12].clone(),
            result_margin: columns[13].clone(),
            target_runs: columns[14].clone(),
            target_overs: columns[15].clone(),
            super_over: columns[16].clone(),
            method: columns[17].clone(),
            umpire1: columns[18].clone(),
            umpire2: columns[19].clone(),
        })
    }
}

/// Converts a raw record into a canonical `Match`.
///
/// Team normalization covers team1, team2, toss winner and winner so that
/// aggregation joins across rebrands; the venue gets its own table. All other
/// fields are copied through untouched apart from missing-marker handling.
pub fn build_match(record: &RawMatchRecord, line: usize) -> Result<Match> {
    let date = NaiveDate::parse_from_str(record.date.trim(), CSV_DATE_FORMAT).map_err(|e| {
        DashboardError::InvalidDate {
            line,
            value: record.date.clone(),
            source: e,
        }
    })?;

    Ok(Match {
        id: None,
        city: record.city.clone(),
        date,
        player_of_match: normalize::optional_field(&record.player_of_match),
        venue: normalize::venue_name(&record.venue),
        team1: normalize::team_name(&record.team1),
        team2: normalize::team_name(&record.team2),
        toss_winner: normalize::team_name(&record.toss_winner),
        toss_decision: record.toss_decision.clone(),
        match_winner: normalize::team_name(&record.winner),
        result: record.result.clone(),
        result_margin: normalize::optional_field(&record.result_margin),
        umpire1: record.umpire1.clone(),
        umpire2: record.umpire2.clone(),
        season: record.season.clone(),
        match_type: record.match_type.clone(),
        target_runs: normalize::optional_field(&record.target_runs),
        target_overs: normalize::optional_field(&record.target_overs),
        super_over: record.super_over.clone(),
        method: normalize::optional_field(&record.method),
    })
}

/// Running team/player counters produced by folding the match stream.
#[derive(Debug, Default)]
pub struct Aggregates {
    pub teams: HashMap<String, Team>,
    pub players: HashMap<String, Player>,
}

impl Aggregates {
    fn team_entry(&mut self, name: &str) -> &mut Team {
        self.teams.entry(name.to_string()).or_insert_with(|| {
            let (primary, secondary, tagline) =
                TEAM_METADATA.get(name).copied().unwrap_or(DEFAULT_METADATA);
            Team {
                team_name: name.to_string(),
                total_matches: 0,
                total_wins: 0,
                primary_color: primary.to_string(),
                secondary_color: secondary.to_string(),
                tagline: tagline.to_string(),
                matches: None,
            }
        })
    }

    /// Folds one match into the counters. Pure accumulation: trusts upstream
    /// normalization and never fails. A winner matching neither recorded team
    /// still gets its win counted.
    pub fn observe(&mut self, m: &Match) {
        if let Some(team1) = m.team1.as_deref() {
            self.team_entry(team1).total_matches += 1;
        }
        if let Some(team2) = m.team2.as_deref() {
            self.team_entry(team2).total_matches += 1;
        }
        if let Some(winner) = m.match_winner.as_deref() {
            self.team_entry(winner).total_wins += 1;
        }
        if let Some(player) = m.player_of_match.as_deref() {
            self.players
                .entry(player.to_string())
                .or_insert_with(|| Player {
                    name: player.to_string(),
                    total_player_of_match_awards: 0,
                })
                .total_player_of_match_awards += 1;
        }
    }
}

/// Aggregates an already-built match stream.
pub fn aggregate<'a>(matches: impl IntoIterator<Item = &'a Match>) -> Aggregates {
    let mut aggregates = Aggregates::default();
    for m in matches {
        aggregates.observe(m);
    }
    aggregates
}

/// Reads the CSV at `path` (header skipped), builds matches and aggregates.
pub fn load_matches(path: &Path) -> Result<(Vec<Match>, Aggregates)> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let mut matches = Vec::new();
    for (index, row) in reader.records().enumerate() {
        // Row 1 is the header, so data rows start at line 2
        let line = index + 2;
        let row = row?;
        let columns: Vec<String> = row.iter().map(str::to_string).collect();
        let record = RawMatchRecord::from_columns(&columns, line)?;
        matches.push(build_match(&record, line)?);
    }

    let aggregates = aggregate(&matches);
    Ok((matches, aggregates))
}

/// Summary of one ingestion run.
#[derive(Debug)]
pub struct IngestSummary {
    pub matches: usize,
    pub teams: usize,
    pub players: usize,
}

/// Full batch: load, aggregate and bulk-save through the storage port.
pub async fn run(path: &Path, storage: Arc<dyn Storage>) -> Result<IngestSummary> {
    let (matches, aggregates) = load_matches(path)?;

    let summary = IngestSummary {
        matches: matches.len(),
        teams: aggregates.teams.len(),
        players: aggregates.players.len(),
    };

    storage.save_matches(matches).await?;
    storage
        .save_teams(aggregates.teams.into_values().collect())
        .await?;
    storage
        .save_players(aggregates.players.into_values().collect())
        .await?;

    info!(
        matches = summary.matches,
        teams = summary.teams,
        players = summary.players,
        "Ingestion complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_columns() -> Vec<String> {
        [
            "1",
            "2008",
            "Bangalore",
            "18-04-2008",
            "League",
            "BB McCullum",
            "M Chinnaswamy Stadium",
            "Royal Challengers Bangalore",
            "Kolkata Knight Riders",
            "Royal Challengers Bangalore",
            "field",
            "Kolkata Knight Riders",
            "runs",
            "140",
            "222",
            "20",
            "N",
            "NA",
            "Asad Rauf",
            "RE Koertzen",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn builds_canonical_match_from_sample_row() {
        let record = RawMatchRecord::from_columns(&sample_columns(), 2).unwrap();
        let m = build_match(&record, 2).unwrap();

        assert_eq!(m.date, NaiveDate::from_ymd_opt(2008, 4, 18).unwrap());
        assert_eq!(m.team1.as_deref(), Some("Royal Challengers Bangalore"));
        assert_eq!(m.team2.as_deref(), Some("Kolkata Knight Riders"));
        assert_eq!(m.match_winner.as_deref(), Some("Kolkata Knight Riders"));
        assert_eq!(m.venue.as_deref(), Some("M Chinnaswamy Stadium, Bengaluru"));
        assert_eq!(m.player_of_match.as_deref(), Some("BB McCullum"));
        assert_eq!(m.method, None, "NA method must be absent");
        assert_eq!(m.result_margin.as_deref(), Some("140"));
    }

    #[test]
    fn sample_row_increments_expected_counters() {
        let record = RawMatchRecord::from_columns(&sample_columns(), 2).unwrap();
        let m = build_match(&record, 2).unwrap();
        let aggregates = aggregate(std::iter::once(&m));

        let rcb = &aggregates.teams["Royal Challengers Bangalore"];
        assert_eq!(rcb.total_matches, 1);
        assert_eq!(rcb.total_wins, 0);

        let kkr = &aggregates.teams["Kolkata Knight Riders"];
        assert_eq!(kkr.total_matches, 1);
        assert_eq!(kkr.total_wins, 1);

        assert_eq!(
            aggregates.players["BB McCullum"].total_player_of_match_awards,
            1
        );
    }

    #[test]
    fn short_row_is_rejected() {
        let mut columns = sample_columns();
        columns.truncate(12);
        let err = RawMatchRecord::from_columns(&columns, 7).unwrap_err();
        assert!(matches!(err, DashboardError::MalformedRow { line: 7, .. }));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let mut columns = sample_columns();
        columns[3] = "2008/04/18".to_string();
        let record = RawMatchRecord::from_columns(&columns, 3).unwrap();
        let err = build_match(&record, 3).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidDate { line: 3, .. }));
    }

    #[test]
    fn unknown_team_gets_neutral_metadata() {
        let mut columns = sample_columns();
        columns[7] = "Ahmedabad Avengers".to_string();
        let record = RawMatchRecord::from_columns(&columns, 2).unwrap();
        let m = build_match(&record, 2).unwrap();
        let aggregates = aggregate(std::iter::once(&m));

        let team = &aggregates.teams["Ahmedabad Avengers"];
        assert_eq!(team.primary_color, "#2D3748");
        assert_eq!(team.secondary_color, "#4A5568");
        assert_eq!(team.tagline, "");
    }

    #[test]
    fn wins_never_exceed_matches() {
        let mut rows = Vec::new();
        for i in 0..6 {
            let mut columns = sample_columns();
            columns[3] = format!("{:02}-05-2010", i + 1);
            // Alternate the winner between the two sides
            columns[11] = if i % 2 == 0 {
                "Royal Challengers Bangalore".into()
            } else {
                "Kolkata Knight Riders".into()
            };
            let record = RawMatchRecord::from_columns(&columns, i + 2).unwrap();
            rows.push(build_match(&record, i + 2).unwrap());
        }

        let aggregates = aggregate(&rows);
        for team in aggregates.teams.values() {
            assert!(team.total_wins <= team.total_matches, "{}", team.team_name);
        }
    }

    #[test]
    fn aggregation_is_order_independent() {
        let teams = [
            "Chennai Super Kings",
            "Mumbai Indians",
            "Delhi Daredevils",
            "Kings XI Punjab",
        ];
        let mut rows = Vec::new();
        for i in 0..12 {
            let mut columns = sample_columns();
            columns[3] = format!("{:02}-04-2012", i + 1);
            columns[7] = teams[i % 4].to_string();
            columns[8] = teams[(i + 1) % 4].to_string();
            columns[11] = teams[i % 4].to_string();
            columns[5] = format!("Player {}", i % 3);
            let record = RawMatchRecord::from_columns(&columns, i + 2).unwrap();
            rows.push(build_match(&record, i + 2).unwrap());
        }

        let forward = aggregate(&rows);
        rows.reverse();
        let backward = aggregate(&rows);

        assert_eq!(forward.teams.len(), backward.teams.len());
        for (name, team) in &forward.teams {
            let other = &backward.teams[name];
            assert_eq!(team.total_matches, other.total_matches);
            assert_eq!(team.total_wins, other.total_wins);
        }
        for (name, player) in &forward.players {
            assert_eq!(
                player.total_player_of_match_awards,
                backward.players[name].total_player_of_match_awards
            );
        }
    }
}
