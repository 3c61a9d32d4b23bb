// Integration tests for the roster pipeline.
//
// Exercise the public API end to end: fixture CSV -> players -> teams, and
// the full login flow against a local HTTP server standing in for the
// gateway.

use std::fs;
use std::path::Path;

use showcase_core::app::AppState;
use showcase_core::config::{parse_showcase, Config, ScoringStrategy};
use showcase_core::distribute::distribute;
use showcase_core::ingest::image::FALLBACK_IMAGE;
use showcase_core::ingest::parse_players;
use showcase_core::roster::links::{deep_link, DeepLink};
use showcase_core::roster::placeholder::default_teams;
use showcase_core::roster::{Foot, Player, Team};
use showcase_core::source::HttpRosterSource;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the crate root, which is the cwd for
/// `cargo test`).
const FIXTURES: &str = "tests/fixtures";

fn shipped_config() -> Config {
    let text = fs::read_to_string("../../defaults/showcase.toml").unwrap();
    parse_showcase(&text, Path::new("showcase.toml"), Default::default()).unwrap()
}

fn fixture_players(name: &str, config: &Config) -> Vec<Player> {
    let file = fs::File::open(Path::new(FIXTURES).join(name)).unwrap();
    parse_players(file, &config.scoring).unwrap()
}

fn find<'a>(players: &'a [Player], id: &str) -> &'a Player {
    players.iter().find(|p| p.id == id).unwrap()
}

fn scores(player: &Player) -> Vec<u8> {
    player.stats.iter().map(|s| s.value).collect()
}

fn ids(team: &Team) -> Vec<&str> {
    team.players.iter().map(|p| p.id.as_str()).collect()
}

// ===========================================================================
// Parsing
// ===========================================================================

#[test]
fn fixture_rows_normalize() {
    let config = shipped_config();
    let players = fixture_players("showcase_roster.csv", &config);
    assert_eq!(players.len(), 6);

    let jonas = find(&players, "p01");
    assert_eq!(jonas.name, "Jonas Weber");
    assert_eq!(jonas.foot, Foot::Left);
    assert_eq!(jonas.origin, "Cologne, GER");
    assert_eq!(jonas.dob, "2007-02-11");
    assert_eq!(jonas.image, "https://lh3.googleusercontent.com/d/1AbC_dEf");

    let luca = find(&players, "p02");
    assert_eq!(luca.number, "0");
    assert_eq!(luca.bio, "");
    assert_eq!(luca.image, "https://www.dropbox.com/s/xyz/luca.jpg?raw=1");

    let mats = find(&players, "p03");
    assert_eq!(mats.foot, Foot::Both);
    assert_eq!(mats.image, FALLBACK_IMAGE);

    let trialist = find(&players, "gen-5");
    assert_eq!(trialist.name, "Unnamed Trialist");
    assert_eq!(trialist.position, "ATH");
}

#[test]
fn dynamic_scoring_uses_sheet_spread() {
    let config = shipped_config();
    assert_eq!(config.scoring.strategy, ScoringStrategy::Dynamic);
    let players = fixture_players("showcase_roster.csv", &config);

    // Sprint 4.35..4.90, broad 240..280, CMJ 65..78.
    assert_eq!(scores(find(&players, "p01")), vec![73, 50, 0]);
    assert_eq!(scores(find(&players, "p04")), vec![100, 88, 38]);
    assert_eq!(scores(find(&players, "p03")), vec![0, 0, 100]);
}

#[test]
fn missing_and_unparsable_readings() {
    let config = shipped_config();
    let players = fixture_players("showcase_roster.csv", &config);
    let emil = find(&players, "p05");

    assert_eq!(emil.stats[0].value, 0);
    assert_eq!(emil.stats[0].display_value, "n/as");
    assert_eq!(emil.stats[1].display_value, "250cm");
    assert_eq!(emil.stats[2].value, 0);
    assert_eq!(emil.stats[2].display_value, "-");
}

#[test]
fn fixed_scoring_matches_reference_bounds() {
    let mut config = shipped_config();
    config.scoring.strategy = ScoringStrategy::Fixed;
    let players = fixture_players("showcase_roster.csv", &config);

    assert_eq!(scores(find(&players, "p01")), vec![70, 60, 70]);
}

#[test]
fn alternative_columns_are_read() {
    let config = shipped_config();
    let players = fixture_players("showcase_roster_alt_columns.csv", &config);

    assert_eq!(find(&players, "q1").dob, "2008-05-05");
    assert_eq!(find(&players, "q2").dob, "2007-07-07");
    assert_eq!(find(&players, "q1").showcase_team.as_deref(), Some("t3"));
}

// ===========================================================================
// Distribution
// ===========================================================================

#[test]
fn fixture_distributes_over_shipped_teams() {
    let config = shipped_config();
    let defaults = default_teams(&config.teams, &config.scoring.fixed_bounds);
    let players = fixture_players("showcase_roster.csv", &config);

    let teams = distribute(players, &defaults);
    assert_eq!(teams.len(), 6);
    assert_eq!(ids(&teams[0]), vec!["p02", "p01"]);
    assert_eq!(ids(&teams[1]), vec!["p03", "p04"]);
    assert_eq!(ids(&teams[5]), vec!["p05"]);
    for untouched in 2..5 {
        assert_eq!(teams[untouched], defaults[untouched]);
    }
    assert!(teams.iter().all(|t| t.player("gen-5").is_none()));
}

#[test]
fn deep_links_resolve_against_fetched_roster() {
    let config = shipped_config();
    let mut state = AppState::new(&config);
    state.replace_roster(fixture_players("showcase_roster.csv", &config));

    let link = DeepLink::parse(&deep_link("t2", "p04")).unwrap();
    let (team, player) = state.resolve(&link).unwrap();
    assert_eq!(team.name, "Team 2 (Red)");
    assert_eq!(player.unwrap().name, "Kai Tanaka");
}

// ===========================================================================
// Login flow over HTTP
// ===========================================================================

/// Serve one request: 200 with `csv` when the body carries `password`,
/// 401 otherwise.
async fn spawn_gateway(password: &'static str, csv: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 8192];
        let mut len = 0;
        // Read until the JSON body has arrived.
        while !String::from_utf8_lossy(&buf[..len]).contains('}') {
            let n = socket.read(&mut buf[len..]).await.unwrap();
            if n == 0 {
                break;
            }
            len += n;
        }
        let request = String::from_utf8_lossy(&buf[..len]).into_owned();

        let expected = format!(r#"{{"password":"{password}"}}"#);
        let (status, body) = if request.contains(&expected) {
            ("200 OK", csv)
        } else {
            ("401 Unauthorized", r#"{"error":"Unauthorized"}"#.to_string())
        };
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.flush().await.unwrap();
    });

    format!("http://{addr}/get-data")
}

#[tokio::test]
async fn login_over_http_installs_roster() {
    let config = shipped_config();
    let csv = fs::read_to_string(Path::new(FIXTURES).join("showcase_roster.csv")).unwrap();
    let url = spawn_gateway("letmein", csv).await;

    let mut state = AppState::new(&config);
    let source = HttpRosterSource::new(url);
    assert!(state.login(&source, "letmein").await);

    assert!(state.authenticated);
    assert_eq!(ids(state.team("t1").unwrap()), vec!["p02", "p01"]);
    assert_eq!(state.player("t6", "p05").unwrap().name, "Emil Novak");
}

#[tokio::test]
async fn login_over_http_with_wrong_password() {
    let config = shipped_config();
    let url = spawn_gateway("letmein", String::new()).await;

    let mut state = AppState::new(&config);
    let source = HttpRosterSource::new(url);
    assert!(!state.login(&source, "guess").await);

    assert!(!state.authenticated);
    assert_eq!(state.teams, state.default_teams);
}
