// Roster model: players, teams, placeholder squads and deep links.

pub mod links;
pub mod placeholder;
pub mod player;
pub mod team;

pub use player::{Foot, Player, Stat};
pub use team::Team;
