// Plain-text rendering of teams and player profiles.

use chrono::NaiveDate;

use showcase_core::roster::{Player, Stat, Team};

const BAR_WIDTH: usize = 20;

pub fn teams_list(teams: &[Team]) -> String {
    let id_width = teams.iter().map(|t| t.id.len()).max().unwrap_or(0);
    let mut out = String::new();
    for team in teams {
        out.push_str(&format!(
            "{:<id_width$}  {}  ({} players)\n",
            team.id,
            team.name,
            team.players.len()
        ));
        if !team.slogan.is_empty() {
            out.push_str(&format!("{:<id_width$}  {}\n", "", team.slogan));
        }
    }
    out
}

pub fn team_roster(team: &Team) -> String {
    let mut out = format!("{} [{}]\n", team.name, team.id);
    out.push_str(&"=".repeat(team.name.chars().count() + team.id.len() + 3));
    out.push('\n');

    for player in &team.players {
        let line = format!(
            "#{:<3} {:<24} {:<12} {}",
            player.number, player.name, player.position, player.current_team
        );
        if player.is_signed {
            out.push_str(&format!("{line}  [Signed]\n"));
        } else {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

/// Full profile of `player`; ages are computed as of `today`.
pub fn player_profile(team: &Team, player: &Player, today: NaiveDate) -> String {
    let mut out = format!("{} #{}  ({})\n", player.name, player.number, team.name);
    out.push_str(&player.position);
    if player.is_signed {
        out.push_str("  [Signed]");
    }
    out.push_str("\n\n");

    let born = match player.age_on(today) {
        Some(age) => format!("{} ({age})", player.dob),
        None => player.dob.clone(),
    };
    let fields = [
        ("Origin", player.origin.as_str()),
        ("Club", player.current_team.as_str()),
        ("Height", player.height.as_str()),
        ("Foot", player.foot.display_str()),
        ("GPA", player.gpa.as_str()),
        ("Eligibility", player.eligibility.as_str()),
        ("Born", born.as_str()),
    ];
    for (label, value) in fields {
        if !value.is_empty() {
            out.push_str(&format!("{label:<12} {value}\n"));
        }
    }

    if !player.bio.is_empty() {
        out.push_str(&format!("\n{}\n", player.bio));
    }

    out.push('\n');
    for stat in &player.stats {
        out.push_str(&stat_line(stat));
        out.push('\n');
    }
    out.push_str(&format!("\nImage: {}\n", player.image));
    out
}

/// One combine stat as `label  reading  [bar] score`.
fn stat_line(stat: &Stat) -> String {
    let filled = (usize::from(stat.value) * BAR_WIDTH + 50) / 100;
    format!(
        "{:<14} {:>8}  [{}{}] {:>3}",
        stat.label,
        stat.display_value,
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        stat.value
    )
}
