// Shareable deep links that open a team, or a player inside a team.

use reqwest::Url;

use crate::roster::team::Team;

// Only used to give relative links something to resolve against.
const LINK_BASE: &str = "http://showcase.local/";

/// Where a deep link points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLink {
    pub team: String,
    pub player: Option<String>,
}

impl DeepLink {
    /// Read a link back. Accepts a full URL, a path with query
    /// (`/?team=t1&player=t1-p3`) or the bare query string. `None` when no
    /// non-empty `team` parameter is present.
    pub fn parse(link: &str) -> Option<Self> {
        let link = link.trim();
        let relative = if link.contains('?') || link.contains("://") {
            link.to_string()
        } else {
            format!("?{link}")
        };
        let url = Url::parse(LINK_BASE).ok()?.join(&relative).ok()?;

        let mut team = None;
        let mut player = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "team" if team.is_none() => team = Some(value.into_owned()),
                "player" if player.is_none() => player = Some(value.into_owned()),
                _ => {}
            }
        }

        let team = team.filter(|t| !t.is_empty())?;
        Some(DeepLink {
            team,
            player: player.filter(|p| !p.is_empty()),
        })
    }

    pub fn to_path(&self) -> String {
        let mut params = vec![("team", self.team.as_str())];
        if let Some(player) = &self.player {
            params.push(("player", player.as_str()));
        }
        match Url::parse_with_params(LINK_BASE, &params) {
            Ok(url) => format!("/?{}", url.query().unwrap_or_default()),
            Err(_) => format!("/?team={}", self.team),
        }
    }
}

/// Relative link opening `player_id` inside `team_id`.
pub fn deep_link(team_id: &str, player_id: &str) -> String {
    DeepLink {
        team: team_id.to_string(),
        player: Some(player_id.to_string()),
    }
    .to_path()
}

/// Markdown list of player links, one section per team.
pub fn links_markdown(teams: &[Team]) -> String {
    let mut out = String::from("# Player Profile Deep Links\n\n");
    out.push_str("Add your domain before the path (e.g., `https://showcase.example.org`).\n\n");

    for team in teams {
        out.push_str(&format!("## {} (ID: {})\n\n", team.name, team.id));
        for player in &team.players {
            let link = deep_link(&team.id, &player.id);
            out.push_str(&format!("- **{}**: `{link}`\n", player.name));
        }
        out.push('\n');
    }
    out
}
