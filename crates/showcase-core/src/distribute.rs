// Team assignment: spread fetched players over the showcase squads.

use tracing::{debug, info};

use crate::roster::player::Player;
use crate::roster::team::Team;

/// Lowercased with all whitespace removed, so "Team 1 (White)" and
/// "team1(white)" compare equal.
pub fn match_key(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Index of the team a showcase-team cell points at.
///
/// An exact match on team id or name wins, checked across all teams first.
/// Otherwise the first team whose name is contained in the cell, or whose
/// name starts with the cell up to a non-alphanumeric boundary ("Team 1"
/// for "Team 1 (White)", but not "Team" or "1"), is chosen. An empty cell
/// matches nothing.
pub fn assign_team(showcase_team: &str, teams: &[Team]) -> Option<usize> {
    let key = match_key(showcase_team);
    if key.is_empty() {
        return None;
    }

    let exact = teams
        .iter()
        .position(|t| key == match_key(&t.id) || key == match_key(&t.name));
    if exact.is_some() {
        return exact;
    }

    teams.iter().position(|t| {
        let name = match_key(&t.name);
        !name.is_empty() && (key.contains(&name) || starts_at_boundary(&name, &key))
    })
}

fn starts_at_boundary(name: &str, key: &str) -> bool {
    name.strip_prefix(key)
        .is_some_and(|rest| !rest.starts_with(char::is_alphanumeric))
}

/// Build the team list for a freshly fetched roster.
///
/// Each player joins at most one team. Teams that receive players get them
/// sorted by jersey number (stable, so equal numbers keep sheet order);
/// teams that receive none keep their roster from `defaults`.
pub fn distribute(players: Vec<Player>, defaults: &[Team]) -> Vec<Team> {
    let mut buckets: Vec<Vec<Player>> = vec![Vec::new(); defaults.len()];
    let mut unassigned = 0usize;

    for player in players {
        let target = player
            .showcase_team
            .as_deref()
            .and_then(|s| assign_team(s, defaults));
        match target {
            Some(idx) => buckets[idx].push(player),
            None => {
                debug!("player '{}' matched no team", player.id);
                unassigned += 1;
            }
        }
    }

    let teams: Vec<Team> = defaults
        .iter()
        .zip(buckets)
        .map(|(team, mut bucket)| {
            if bucket.is_empty() {
                return team.clone();
            }
            bucket.sort_by_key(Player::jersey_number);
            Team {
                players: bucket,
                ..team.clone()
            }
        })
        .collect();

    info!(
        "distributed roster over {} teams ({} players unassigned)",
        teams.len(),
        unassigned
    );
    teams
}
