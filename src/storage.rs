use crate::error::Result;
use crate::model::{Match, Player, Team};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Persistence port for the dashboard entities.
///
/// Ingestion bulk-saves once into an empty store; everything after that is
/// read-only queries, so no upsert operations are needed.
#[async_trait]
pub trait Storage: Send + Sync {
    // Bulk saves (ingestion)
    async fn save_matches(&self, matches: Vec<Match>) -> Result<()>;
    async fn save_teams(&self, teams: Vec<Team>) -> Result<()>;
    async fn save_players(&self, players: Vec<Player>) -> Result<()>;

    // Match queries
    async fn match_by_id(&self, id: u64) -> Result<Option<Match>>;
    /// Matches a team played on either side, newest first.
    async fn matches_for_team(&self, team_name: &str, limit: Option<usize>) -> Result<Vec<Match>>;
    /// Matches between two teams in either orientation, newest first.
    async fn matches_between(&self, team_a: &str, team_b: &str) -> Result<Vec<Match>>;
    /// Matches where the given player took the player-of-match award, newest first.
    async fn matches_for_player_of_match(&self, player_name: &str) -> Result<Vec<Match>>;
    /// A bounded slice of the stored matches, insertion order.
    async fn sample_matches(&self, limit: usize) -> Result<Vec<Match>>;
    /// Every stored match, insertion order.
    async fn all_matches(&self) -> Result<Vec<Match>>;

    // Team queries
    async fn all_teams(&self) -> Result<Vec<Team>>;
    async fn team_by_name(&self, team_name: &str) -> Result<Option<Team>>;

    // Player queries
    async fn all_players(&self) -> Result<Vec<Player>>;
    async fn player_by_name(&self, player_name: &str) -> Result<Option<Player>>;
}

/// In-memory storage used in production for the startup batch and in tests.
pub struct InMemoryStorage {
    matches: Arc<Mutex<Vec<Match>>>,
    teams: Arc<Mutex<HashMap<String, Team>>>,
    players: Arc<Mutex<HashMap<String, Player>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            matches: Arc::new(Mutex::new(Vec::new())),
            teams: Arc::new(Mutex::new(HashMap::new())),
            players: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn newest_first(mut matches: Vec<Match>) -> Vec<Match> {
    matches.sort_by(|a, b| b.date.cmp(&a.date));
    matches
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn save_matches(&self, mut batch: Vec<Match>) -> Result<()> {
        let mut matches = self.matches.lock().unwrap();
        let mut next_id = matches.len() as u64 + 1;
        for m in &mut batch {
            m.id = Some(next_id);
            next_id += 1;
        }
        debug!("Saving {} matches", batch.len());
        matches.extend(batch);
        Ok(())
    }

    async fn save_teams(&self, batch: Vec<Team>) -> Result<()> {
        let mut teams = self.teams.lock().unwrap();
        debug!("Saving {} teams", batch.len());
        for team in batch {
            teams.insert(team.team_name.clone(), team);
        }
        Ok(())
    }

    async fn save_players(&self, batch: Vec<Player>) -> Result<()> {
        let mut players = self.players.lock().unwrap();
        debug!("Saving {} players", batch.len());
        for player in batch {
            players.insert(player.name.clone(), player);
        }
        Ok(())
    }

    async fn match_by_id(&self, id: u64) -> Result<Option<Match>> {
        let matches = self.matches.lock().unwrap();
        Ok(matches.iter().find(|m| m.id == Some(id)).cloned())
    }

    async fn matches_for_team(&self, team_name: &str, limit: Option<usize>) -> Result<Vec<Match>> {
        let matches = self.matches.lock().unwrap();
        let mut found = newest_first(
            matches
                .iter()
                .filter(|m| m.involves(team_name))
                .cloned()
                .collect(),
        );
        if let Some(limit) = limit {
            found.truncate(limit);
        }
        Ok(found)
    }

    async fn matches_between(&self, team_a: &str, team_b: &str) -> Result<Vec<Match>> {
        let matches = self.matches.lock().unwrap();
        let found = matches
            .iter()
            .filter(|m| {
                (m.team1.as_deref() == Some(team_a) && m.team2.as_deref() == Some(team_b))
                    || (m.team1.as_deref() == Some(team_b) && m.team2.as_deref() == Some(team_a))
            })
            .cloned()
            .collect();
        Ok(newest_first(found))
    }

    async fn matches_for_player_of_match(&self, player_name: &str) -> Result<Vec<Match>> {
        let matches = self.matches.lock().unwrap();
        let found = matches
            .iter()
            .filter(|m| m.player_of_match.as_deref() == Some(player_name))
            .cloned()
            .collect();
        Ok(newest_first(found))
    }

    async fn sample_matches(&self, limit: usize) -> Result<Vec<Match>> {
        let matches = self.matches.lock().unwrap();
        Ok(matches.iter().take(limit).cloned().collect())
    }

    async fn all_matches(&self) -> Result<Vec<Match>> {
        let matches = self.matches.lock().unwrap();
        Ok(matches.clone())
    }

    async fn all_teams(&self) -> Result<Vec<Team>> {
        let teams = self.teams.lock().unwrap();
        Ok(teams.values().cloned().collect())
    }

    async fn team_by_name(&self, team_name: &str) -> Result<Option<Team>> {
        let teams = self.teams.lock().unwrap();
        Ok(teams.get(team_name).cloned())
    }

    async fn all_players(&self) -> Result<Vec<Player>> {
        let players = self.players.lock().unwrap();
        Ok(players.values().cloned().collect())
    }

    async fn player_by_name(&self, player_name: &str) -> Result<Option<Player>> {
        let players = self.players.lock().unwrap();
        Ok(players.get(player_name).cloned())
    }
}
