// Configuration loading and parsing (showcase.toml, credentials.toml).

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::ingest::stats::{Bounds, Metric};

/// The one required config file, under `config/`.
pub const SHOWCASE_FILE: &str = "showcase.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to seed {path} from defaults: {source}")]
    SeedError {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceConfig,
    pub scoring: ScoringConfig,
    pub gateway: GatewayConfig,
    pub teams: Vec<TeamShell>,
    pub credentials: CredentialsConfig,
}

// ---------------------------------------------------------------------------
// showcase.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire showcase.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ShowcaseFile {
    source: SourceConfig,
    #[serde(default)]
    scoring: ScoringConfig,
    gateway: GatewayConfig,
    teams: Vec<TeamShell>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Full URL of the gateway's data endpoint.
    pub gateway_url: String,
}

/// How combine readings are turned into 0-100 scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringStrategy {
    /// Interpolate against the configured reference bounds.
    Fixed,
    /// Interpolate against the min/max observed across the whole sheet.
    #[default]
    Dynamic,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub strategy: ScoringStrategy,
    /// Score given to a reading that cannot be parsed as a number.
    #[serde(default)]
    pub fallback_score: u8,
    #[serde(default)]
    pub fixed_bounds: FixedBounds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            strategy: ScoringStrategy::default(),
            fallback_score: 0,
            fixed_bounds: FixedBounds::default(),
        }
    }
}

/// Reference (min, max) pairs for the fixed scoring strategy.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FixedBounds {
    pub sprint_40yd: Bounds,
    pub broad_jump: Bounds,
    pub cmj_vert: Bounds,
}

impl FixedBounds {
    pub fn get(&self, metric: Metric) -> Bounds {
        match metric {
            Metric::Sprint40 => self.sprint_40yd,
            Metric::BroadJump => self.broad_jump,
            Metric::CmjVert => self.cmj_vert,
        }
    }
}

impl Default for FixedBounds {
    fn default() -> Self {
        FixedBounds {
            sprint_40yd: Bounds { min: 4.2, max: 5.2 },
            broad_jump: Bounds { min: 200.0, max: 300.0 },
            cmj_vert: Bounds { min: 30.0, max: 80.0 },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub port: u16,
    /// Delay applied before answering a rejected password.
    #[serde(default = "default_failure_delay_ms")]
    pub failure_delay_ms: u64,
}

fn default_failure_delay_ms() -> u64 {
    1000
}

/// Static definition of a showcase squad. Rosters are attached at runtime.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TeamShell {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slogan: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub image_style: Option<String>,
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    /// Shared secret checked by the gateway.
    pub app_password: Option<String>,
    /// Published-to-web CSV link of the roster sheet.
    pub sheet_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/showcase.toml` and
/// (optionally) `config/credentials.toml`, relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- showcase.toml (required) ---
    let showcase_path = config_dir.join(SHOWCASE_FILE);
    let showcase_text = read_file(&showcase_path)?;

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    parse_showcase(&showcase_text, &showcase_path, credentials)
}

/// Parse and validate showcase.toml text. `path` only labels parse errors.
pub fn parse_showcase(
    text: &str,
    path: &Path,
    credentials: CredentialsConfig,
) -> Result<Config, ConfigError> {
    let showcase_file: ShowcaseFile =
        toml::from_str(text).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

    let config = Config {
        source: showcase_file.source,
        scoring: showcase_file.scoring,
        gateway: showcase_file.gateway,
        teams: showcase_file.teams,
        credentials,
    };

    validate(&config)?;

    Ok(config)
}

/// Seed `config/showcase.toml` from the shipped `defaults/showcase.toml` on
/// first run. Returns the written path, or `None` when the config already
/// exists. `credentials.toml` is never seeded; it holds secrets and only
/// ships as an `.example`.
pub fn seed_showcase_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(SHOWCASE_FILE);
    if target.exists() {
        return Ok(None);
    }

    let shipped = base_dir.join("defaults").join(SHOWCASE_FILE);
    if !shipped.is_file() {
        return Err(ConfigError::FileNotFound { path: shipped });
    }

    let seed_err = |source: std::io::Error| ConfigError::SeedError {
        path: target.clone(),
        source,
    };
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(seed_err)?;
    }
    std::fs::copy(&shipped, &target).map_err(seed_err)?;
    info!("seeded {} from {}", target.display(), shipped.display());

    Ok(Some(target))
}

/// Load config relative to the current working directory, seeding
/// `config/showcase.toml` first if it is missing.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    seed_showcase_config(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.source.gateway_url.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "source.gateway_url".into(),
            message: "must not be empty".into(),
        });
    }

    let fallback = config.scoring.fallback_score;
    if fallback > 100 {
        return Err(ConfigError::ValidationError {
            field: "scoring.fallback_score".into(),
            message: format!("must be between 0 and 100 inclusive, got {fallback}"),
        });
    }

    let b = &config.scoring.fixed_bounds;
    let bound_fields: &[(&str, Bounds)] = &[
        ("scoring.fixed_bounds.sprint_40yd", b.sprint_40yd),
        ("scoring.fixed_bounds.broad_jump", b.broad_jump),
        ("scoring.fixed_bounds.cmj_vert", b.cmj_vert),
    ];
    for (name, bounds) in bound_fields {
        if !bounds.min.is_finite() || !bounds.max.is_finite() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "bounds must be finite".into(),
            });
        }
        if bounds.min >= bounds.max {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("min must be < max, got {} >= {}", bounds.min, bounds.max),
            });
        }
    }

    if config.teams.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "teams".into(),
            message: "at least one team must be defined".into(),
        });
    }

    let mut seen = HashSet::new();
    for team in &config.teams {
        if team.id.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "teams.id".into(),
                message: format!("team '{}' has an empty id", team.name),
            });
        }
        if !seen.insert(team.id.as_str()) {
            return Err(ConfigError::ValidationError {
                field: "teams.id".into(),
                message: format!("duplicate team id '{}'", team.id),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
