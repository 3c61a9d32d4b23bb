// Showcase teams (squads) and the shells they are built from.

use serde::{Deserialize, Serialize};

use crate::config::TeamShell;
use crate::roster::player::Player;

/// A showcase squad with its current roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    pub slogan: String,
    /// Cover image for the team.
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_style: Option<String>,
    pub players: Vec<Player>,
}

impl Team {
    /// Build a team from its configured shell and an initial roster.
    pub fn from_shell(shell: &TeamShell, players: Vec<Player>) -> Self {
        Team {
            id: shell.id.clone(),
            name: shell.name.clone(),
            slogan: shell.slogan.clone(),
            image: shell.image.clone(),
            image_style: shell.image_style.clone(),
            players,
        }
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }
}
