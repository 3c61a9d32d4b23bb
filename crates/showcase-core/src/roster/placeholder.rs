// Placeholder squads shown before a roster has been fetched.
//
// Values are drawn from a ChaCha8 generator seeded from the team id, so the
// same team always renders the same squad.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{FixedBounds, TeamShell};
use crate::ingest::stats::{score_reading, Metric, MetricBounds};
use crate::roster::player::{Foot, Player};
use crate::roster::team::Team;

pub const SQUAD_SIZE: usize = 15;

const PLACEHOLDER_BIO: &str = "An elite prospect known for technical discipline and explosive \
athleticism. Consistently outperforms in high-stakes matches and demonstrates exceptional \
leadership qualities on the field.";

const PLAYER_IMAGES: [&str; 5] = [
    "https://images.unsplash.com/photo-1518609878373-06d740f60d8b?q=80&w=1934&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1526232761682-d26e03ac148e?q=80&w=1929&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1628891435256-3f71ab48c02c?q=80&w=2070&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1560272564-c83b66b1ad12?q=80&w=1974&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1543351611-58f69d7c1781?q=80&w=1887&auto=format&fit=crop",
];

const CITIES: [&str; 8] = [
    "Berlin, GER",
    "Munich, GER",
    "London, UK",
    "Paris, FRA",
    "Madrid, ESP",
    "Hamburg, GER",
    "Cologne, GER",
    "Manchester, UK",
];

const ACADEMIES: [&str; 6] = [
    "FC Berlin Academy",
    "Munich Elite",
    "London Youth",
    "Paris SG U19",
    "Ruhr Valley HS",
    "North District Club",
];

/// Squad positions by slot: two keepers, five defenders, five midfielders,
/// three forwards.
const POSITIONS: [&str; SQUAD_SIZE] = [
    "GK",
    "GK",
    "LB • LWB",
    "CB",
    "CB • CDM",
    "CB",
    "RB • RWB",
    "CDM • CM",
    "CM • CAM",
    "LM • LW",
    "RM • RW",
    "CAM • CF",
    "LW • ST",
    "RW • ST",
    "ST",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Keeper,
    Defender,
    Midfielder,
    Forward,
}

impl Group {
    fn of(position: &str) -> Self {
        let has = |tag: &str| position.contains(tag);
        if has("GK") {
            Group::Keeper
        } else if has("CB") || has("LB") || has("RB") {
            Group::Defender
        } else if has("ST") || has("LW") || has("RW") || has("CF") {
            Group::Forward
        } else {
            Group::Midfielder
        }
    }
}

// ---------------------------------------------------------------------------
// Deterministic values
// ---------------------------------------------------------------------------

/// Generator for one team's squad, seeded from the team id. Ids longer than
/// the seed are folded in with xor.
fn team_rng(team_id: &str) -> ChaCha8Rng {
    let mut seed = [0u8; 32];
    for (i, byte) in team_id.bytes().enumerate() {
        seed[i % seed.len()] ^= byte;
    }
    ChaCha8Rng::from_seed(seed)
}

/// Value in `lo..=hi` hundredths, as a decimal.
fn hundredths(rng: &mut ChaCha8Rng, lo: u32, hi: u32) -> f64 {
    f64::from(rng.gen_range(lo..=hi)) / 100.0
}

fn team_ordinal(team_id: &str) -> usize {
    team_id
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

/// Raw combine readings for a slot, formatted as they would appear in the
/// sheet: sprint, broad jump, CMJ.
fn readings(rng: &mut ChaCha8Rng, position: &str) -> [String; 3] {
    let group = Group::of(position);

    let sprint = if group == Group::Forward || position.contains("WB") {
        hundredths(rng, 435, 465)
    } else if group == Group::Keeper {
        hundredths(rng, 480, 520)
    } else {
        hundredths(rng, 455, 490)
    };
    let broad: u32 = if group == Group::Keeper {
        rng.gen_range(250..=300)
    } else {
        rng.gen_range(230..=290)
    };
    let cmj: u32 = if group == Group::Keeper || position.contains("CB") {
        rng.gen_range(60..=85)
    } else {
        rng.gen_range(50..=80)
    };

    [format!("{sprint:.2}"), broad.to_string(), cmj.to_string()]
}

fn strong_foot(rng: &mut ChaCha8Rng, position: &str) -> Foot {
    if position.contains("LB") || position.contains("LW") {
        Foot::Left
    } else if position.contains("RW") || position.contains("RB") {
        Foot::Right
    } else if rng.gen_bool(0.2) {
        Foot::Both
    } else {
        Foot::Right
    }
}

// ---------------------------------------------------------------------------
// Squads
// ---------------------------------------------------------------------------

/// The placeholder squad for `team_id`, with stats scored against `bounds`.
pub fn placeholder_squad(team_id: &str, bounds: &FixedBounds) -> Vec<Player> {
    let metric_bounds = MetricBounds::fixed(bounds);
    let ordinal = team_ordinal(team_id);
    let mut rng = team_rng(team_id);

    POSITIONS
        .iter()
        .enumerate()
        .map(|(index, &position)| {
            let n = index + 1;

            let number = if n == 1 {
                "1".to_string()
            } else {
                rng.gen_range(2..=99u32).to_string()
            };
            let origin = CITIES[rng.gen_range(0..CITIES.len())];
            let club = ACADEMIES[rng.gen_range(0..ACADEMIES.len())];
            let height: u32 = rng.gen_range(172..=198);
            let gpa = f64::from(rng.gen_range(28..=40u32)) / 10.0;
            let eligibility: u32 = rng.gen_range(2024..=2028);
            let foot = strong_foot(&mut rng, position);

            let stats = Metric::ALL
                .iter()
                .zip(readings(&mut rng, position))
                .map(|(&metric, raw)| score_reading(&raw, metric, metric_bounds.get(metric), 0))
                .collect();

            Player {
                id: format!("{team_id}-p{n}"),
                name: format!("Player {n:02}"),
                number,
                position: position.to_string(),
                bio: PLACEHOLDER_BIO.to_string(),
                origin: origin.to_string(),
                current_team: club.to_string(),
                showcase_team: None,
                height: format!("{height} cm"),
                foot,
                gpa: format!("{gpa:.1}"),
                eligibility: format!("Fall {eligibility}"),
                dob: String::new(),
                is_signed: false,
                image: PLAYER_IMAGES[(n + ordinal) % PLAYER_IMAGES.len()].to_string(),
                stats,
            }
        })
        .collect()
}

/// One team per shell, each carrying its placeholder squad.
pub fn default_teams(shells: &[TeamShell], bounds: &FixedBounds) -> Vec<Team> {
    shells
        .iter()
        .map(|shell| Team::from_shell(shell, placeholder_squad(&shell.id, bounds)))
        .collect()
}
