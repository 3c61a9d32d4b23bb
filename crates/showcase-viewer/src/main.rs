// Showcase viewer entry point.
//
// Loads config, builds the placeholder squads, then (with a password) logs
// in through the gateway or (with --csv) reads a local sheet export, and
// prints the requested view.

mod render;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::info;

use showcase_core::app::AppState;
use showcase_core::config;
use showcase_core::ingest::parse_players;
use showcase_core::roster::links::{links_markdown, DeepLink};
use showcase_core::source::HttpRosterSource;

#[derive(Parser, Debug)]
#[command(name = "showcase")]
#[command(about = "Browse the showcase teams and player profiles")]
struct Args {
    /// Gateway password. Without one the placeholder squads are shown.
    #[arg(long, env = "SHOWCASE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Read the roster from a local CSV export instead of the gateway
    #[arg(long, conflicts_with = "password")]
    csv: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the teams
    Teams,
    /// Show one team's roster
    Team { id: String },
    /// Show one player's profile
    Player { team: String, player: String },
    /// Open a deep link such as `/?team=t1&player=t1-p3`
    Open { link: String },
    /// Print markdown deep links for every player
    Links,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing()?;

    let config = config::load_config().context("failed to load configuration")?;
    let mut state = AppState::new(&config);

    if let Some(path) = &args.csv {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let players = parse_players(file, &config.scoring)
            .with_context(|| format!("failed to read roster from {}", path.display()))?;
        info!("loaded {} players from {}", players.len(), path.display());
        state.replace_roster(players);
    } else if let Some(password) = &args.password {
        let source = HttpRosterSource::from_config(&config);
        if !state.login(&source, password).await {
            bail!(
                "login failed: incorrect password or roster unavailable at {}",
                source.url()
            );
        }
    }

    let output = run(&args.command, &state, args.json)?;
    print!("{output}");
    Ok(())
}

fn run(command: &Command, state: &AppState, json: bool) -> Result<String> {
    match command {
        Command::Teams => {
            if json {
                to_json(&state.snapshot())
            } else {
                Ok(render::teams_list(&state.teams))
            }
        }
        Command::Team { id } => {
            let Some(team) = state.team(id) else {
                bail!("no team with id '{id}'");
            };
            if json {
                to_json(team)
            } else {
                Ok(render::team_roster(team))
            }
        }
        Command::Player { team, player } => {
            let link = DeepLink {
                team: team.clone(),
                player: Some(player.clone()),
            };
            open(state, &link, json)
        }
        Command::Open { link } => {
            let Some(link) = DeepLink::parse(link) else {
                bail!("'{link}' is not a deep link (expected ?team=<id>[&player=<id>])");
            };
            open(state, &link, json)
        }
        Command::Links => Ok(links_markdown(&state.teams)),
    }
}

fn open(state: &AppState, link: &DeepLink, json: bool) -> Result<String> {
    let Some((team, player)) = state.resolve(link) else {
        bail!("no team with id '{}'", link.team);
    };
    match (player, &link.player) {
        (Some(player), _) if json => to_json(player),
        (Some(player), _) => Ok(render::player_profile(
            team,
            player,
            Local::now().date_naive(),
        )),
        (None, Some(missing)) => bail!("no player '{missing}' in team '{}'", team.id),
        (None, None) if json => to_json(team),
        (None, None) => Ok(render::team_roster(team)),
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    text.push('\n');
    Ok(text)
}

/// Logs go to stderr so stdout stays clean for the printed view.
fn init_tracing() -> Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("showcase=info,showcase_core=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use showcase_core::config::{FixedBounds, ScoringConfig, TeamShell};
    use showcase_core::roster::placeholder::default_teams;

    fn state() -> AppState {
        let shells = vec![TeamShell {
            id: "t1".into(),
            name: "Team 1 (White)".into(),
            slogan: String::new(),
            image: String::new(),
            image_style: None,
        }];
        AppState::from_teams(
            ScoringConfig::default(),
            default_teams(&shells, &FixedBounds::default()),
        )
    }

    #[test]
    fn args_parse_subcommands() {
        let args = Args::try_parse_from(["showcase", "--json", "player", "t1", "t1-p2"]).unwrap();
        assert!(args.json);
        assert!(matches!(args.command, Command::Player { ref team, .. } if team == "t1"));

        let args = Args::try_parse_from(["showcase", "teams", "--json"]).unwrap();
        assert!(args.json);
    }

    #[test]
    fn csv_and_password_conflict() {
        let result = Args::try_parse_from([
            "showcase",
            "--csv",
            "roster.csv",
            "--password",
            "pw",
            "teams",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_team_is_an_error() {
        let err = run(&Command::Team { id: "t9".into() }, &state(), false).unwrap_err();
        assert!(err.to_string().contains("t9"));
    }

    #[test]
    fn open_link_renders_player() {
        let command = Command::Open {
            link: "/?team=t1&player=t1-p3".into(),
        };
        let out = run(&command, &state(), false).unwrap();
        assert!(out.starts_with("Player 03"));
    }

    #[test]
    fn open_link_to_missing_player_is_an_error() {
        let command = Command::Open {
            link: "/?team=t1&player=nobody".into(),
        };
        assert!(run(&command, &state(), false).is_err());
    }

    #[test]
    fn team_json_is_camel_case() {
        let out = run(&Command::Team { id: "t1".into() }, &state(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value["players"][0]["currentTeam"].is_string());
        assert_eq!(value["players"].as_array().unwrap().len(), 15);
    }

    #[test]
    fn links_command_prints_markdown() {
        let out = run(&Command::Links, &state(), false).unwrap();
        assert!(out.contains("`/?team=t1&player=t1-p1`"));
    }
}
