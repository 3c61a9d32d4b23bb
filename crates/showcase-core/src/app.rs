// Application state: the teams currently shown and how they get refreshed.
//
// A refresh runs fetch -> parse -> distribute and swaps the whole team list
// in one assignment. Any failure leaves the previous teams untouched.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{Config, ScoringConfig};
use crate::distribute::distribute;
use crate::ingest::{parse_players_str, IngestError};
use crate::roster::links::DeepLink;
use crate::roster::placeholder::default_teams;
use crate::roster::player::Player;
use crate::roster::team::Team;
use crate::source::{RosterSource, SourceError};

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("roster CSV could not be read: {0}")]
    Ingest(#[from] IngestError),

    #[error("roster contained no players")]
    EmptyRoster,
}

/// Serializable view of the current state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSnapshot<'a> {
    pub authenticated: bool,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub teams: &'a [Team],
}

/// Everything the viewer renders.
#[derive(Debug, Clone)]
pub struct AppState {
    pub scoring: ScoringConfig,
    /// Placeholder teams; players are distributed against these and a team
    /// without fetched players falls back to its entry here.
    pub default_teams: Vec<Team>,
    pub teams: Vec<Team>,
    pub authenticated: bool,
    /// When `teams` was last replaced by fetched data.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let defaults = default_teams(&config.teams, &config.scoring.fixed_bounds);
        Self::from_teams(config.scoring.clone(), defaults)
    }

    pub fn from_teams(scoring: ScoringConfig, default_teams: Vec<Team>) -> Self {
        AppState {
            scoring,
            teams: default_teams.clone(),
            default_teams,
            authenticated: false,
            refreshed_at: None,
        }
    }

    /// Distribute `players` over the default teams and replace the current
    /// teams with the result.
    pub fn replace_roster(&mut self, players: Vec<Player>) {
        self.teams = distribute(players, &self.default_teams);
        self.refreshed_at = Some(Utc::now());
    }

    /// Fetch, parse and distribute a roster. Returns the number of players
    /// fetched. On error nothing changes.
    pub async fn refresh<S>(&mut self, source: &S, password: &str) -> Result<usize, RefreshError>
    where
        S: RosterSource + ?Sized,
    {
        let csv_text = source.fetch_csv(password).await?;
        let players = parse_players_str(&csv_text, &self.scoring)?;
        if players.is_empty() {
            return Err(RefreshError::EmptyRoster);
        }

        let count = players.len();
        self.replace_roster(players);
        self.authenticated = true;
        Ok(count)
    }

    /// Log in with `password`. `true` when a non-empty roster was fetched
    /// and installed; on any failure the last good teams stay in place.
    pub async fn login<S>(&mut self, source: &S, password: &str) -> bool
    where
        S: RosterSource + ?Sized,
    {
        match self.refresh(source, password).await {
            Ok(count) => {
                info!("login succeeded, {count} players loaded");
                true
            }
            Err(e) => {
                warn!("login failed: {e}");
                false
            }
        }
    }

    pub fn snapshot(&self) -> RosterSnapshot<'_> {
        RosterSnapshot {
            authenticated: self.authenticated,
            refreshed_at: self.refreshed_at,
            teams: &self.teams,
        }
    }

    pub fn team(&self, team_id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    pub fn player(&self, team_id: &str, player_id: &str) -> Option<&Player> {
        self.team(team_id)?.player(player_id)
    }

    /// The team a deep link opens, plus the player when the link names one
    /// that exists. A link to an unknown team resolves to nothing.
    pub fn resolve(&self, link: &DeepLink) -> Option<(&Team, Option<&Player>)> {
        let team = self.team(&link.team)?;
        let player = link.player.as_deref().and_then(|id| team.player(id));
        Some((team, player))
    }
}
