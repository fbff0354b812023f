// Configuration loading and parsing (league.toml, strategy.toml).

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::draft::player::Position;
use crate::names::TeamMatch;
use crate::rules::RosterRules;
use crate::strategy::guidance::DraftFormat;
use crate::strategy::needs::{DepthTarget, DepthTargets};
use crate::strategy::recommend::{EngineSettings, RecommendOptions, Strategy};
use crate::valuation::scarcity::{ScarcityCurve, ScarcityPolicy};

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

    #[error("no config/{} and no default in {dir} to copy it from", .files.join(", config/"))]
    MissingDefaults { dir: PathBuf, files: Vec<String> },

    #[error("could not create {path}: {source}")]
    SetupFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub strategy: StrategyConfig,
    /// Rule tables handed to the engine.
    pub settings: EngineSettings,
    pub cache: CacheConfig,
    pub data_paths: DataPaths,
}

impl Config {
    /// Request options built from the configured defaults.
    pub fn recommend_options(&self) -> RecommendOptions {
        RecommendOptions {
            strategy: self.strategy.default_strategy,
            current_round: 1,
            consider_bye_weeks: self.strategy.consider_bye_weeks,
            analysis_limit: self.strategy.analysis_limit,
        }
    }
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueSection,
}

#[derive(Debug, Clone, Deserialize)]
struct LeagueSection {
    name: String,
    num_teams: usize,
    rounds: u32,
    #[serde(default = "default_true")]
    snake: bool,
    owner: String,
    roster: RosterSection,
    #[serde(default)]
    draft_format: Option<DraftFormatSection>,
}

#[derive(Debug, Clone, Deserialize)]
struct RosterSection {
    bench: usize,
    ir: usize,
    flex_positions: Vec<String>,
    starters: BTreeMap<String, usize>,
    limits: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Deserialize)]
struct DraftFormatSection {
    #[serde(default)]
    auction_rounds: Vec<u32>,
    #[serde(default)]
    keeper_round: Option<u32>,
}

/// League identity and draft shape.
#[derive(Debug, Clone)]
pub struct LeagueConfig {
    pub name: String,
    pub num_teams: usize,
    pub rounds: u32,
    pub snake: bool,
    /// Owner whose team recommendations are for.
    pub owner: String,
}

// ---------------------------------------------------------------------------
// strategy.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire strategy.toml file.
#[derive(Debug, Clone, Deserialize)]
struct StrategyFile {
    recommendation: RecommendationSection,
    matching: MatchingSection,
    cache: CacheSection,
    sources: SourcesSection,
    data_paths: DataPaths,
    #[serde(default)]
    depth_targets: BTreeMap<String, DepthTarget>,
    #[serde(default)]
    scarcity: BTreeMap<String, ScarcityCurve>,
}

#[derive(Debug, Clone, Deserialize)]
struct RecommendationSection {
    default_strategy: String,
    consider_bye_weeks: bool,
    analysis_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
struct MatchingSection {
    team_match: TeamMatch,
}

#[derive(Debug, Clone, Deserialize)]
struct CacheSection {
    rankings_ttl_hours: u64,
    draft_board_ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct SourcesSection {
    rankings: Vec<String>,
}

/// The public strategy config assembled from the strategy.toml sections.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    pub default_strategy: Strategy,
    pub consider_bye_weeks: bool,
    pub analysis_limit: usize,
    pub team_match: TeamMatch,
    /// Ranking source ids requested from the provider.
    pub ranking_sources: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub rankings_ttl: Duration,
    pub draft_board_ttl: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub rankings: String,
    pub draft_board: String,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// `config/strategy.toml`, relative to the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;
    let league_section = league_file.league;

    // --- strategy.toml (required) ---
    let strategy_path = config_dir.join("strategy.toml");
    let strategy_text = read_file(&strategy_path)?;
    let strategy_file: StrategyFile =
        toml::from_str(&strategy_text).map_err(|e| ConfigError::ParseError {
            path: strategy_path.clone(),
            source: e,
        })?;

    validate_league(&league_section)?;
    validate_strategy(&strategy_file)?;

    let settings = EngineSettings {
        rules: build_rules(&league_section.roster)?,
        scarcity: build_scarcity(&strategy_file.scarcity)?,
        depth_targets: build_depth_targets(&strategy_file.depth_targets)?,
        draft_format: league_section
            .draft_format
            .as_ref()
            .map_or_else(DraftFormat::default, |f| DraftFormat {
                auction_rounds: f.auction_rounds.clone(),
                keeper_round: f.keeper_round,
            }),
    };

    let default_strategy: Strategy = strategy_file
        .recommendation
        .default_strategy
        .parse()
        .map_err(|e: crate::error::EngineError| {
            invalid("recommendation.default_strategy", e.to_string())
        })?;

    Ok(Config {
        league: LeagueConfig {
            name: league_section.name,
            num_teams: league_section.num_teams,
            rounds: league_section.rounds,
            snake: league_section.snake,
            owner: league_section.owner.trim().to_string(),
        },
        strategy: StrategyConfig {
            default_strategy,
            consider_bye_weeks: strategy_file.recommendation.consider_bye_weeks,
            analysis_limit: strategy_file.recommendation.analysis_limit,
            team_match: strategy_file.matching.team_match,
            ranking_sources: strategy_file.sources.rankings,
        },
        settings,
        cache: CacheConfig {
            rankings_ttl: Duration::from_secs(strategy_file.cache.rankings_ttl_hours * 3600),
            draft_board_ttl: Duration::from_secs(strategy_file.cache.draft_board_ttl_seconds),
        },
        data_paths: strategy_file.data_paths,
    })
}

/// Files `load_config_from` reads from `config/`.
pub const CONFIG_FILES: [&str; 2] = ["league.toml", "strategy.toml"];

/// First-run setup: copy whichever of [`CONFIG_FILES`] is absent from
/// `config/` out of `defaults/`. Files already in `config/` are never
/// touched and nothing else in `defaults/` is looked at.
///
/// Returns the paths written. When a file is in neither directory, fails
/// with [`ConfigError::MissingDefaults`] listing every such file, before
/// anything is copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    let needed: Vec<&str> = CONFIG_FILES
        .into_iter()
        .filter(|file| !config_dir.join(file).is_file())
        .collect();
    if needed.is_empty() {
        return Ok(Vec::new());
    }

    let missing: Vec<String> = needed
        .iter()
        .filter(|file| !defaults_dir.join(file).is_file())
        .map(|file| file.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::MissingDefaults {
            dir: defaults_dir,
            files: missing,
        });
    }

    std::fs::create_dir_all(&config_dir).map_err(|source| ConfigError::SetupFailed {
        path: config_dir.clone(),
        source,
    })?;
    needed
        .into_iter()
        .map(|file| -> Result<PathBuf, ConfigError> {
            let target = config_dir.join(file);
            std::fs::copy(defaults_dir.join(file), &target).map_err(|source| {
                ConfigError::SetupFailed {
                    path: target.clone(),
                    source,
                }
            })?;
            info!("Created {} from defaults", target.display());
            Ok(target)
        })
        .collect()
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
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

fn parse_position(field: &str, key: &str, allow_flex: bool) -> Result<Position, ConfigError> {
    match Position::from_str_pos(key) {
        Some(pos) if pos.is_draftable() || (allow_flex && pos == Position::Flex) => Ok(pos),
        _ => Err(invalid(
            format!("{field}.{key}"),
            "unknown or non-draftable position",
        )),
    }
}

fn build_rules(roster: &RosterSection) -> Result<RosterRules, ConfigError> {
    let mut starters = BTreeMap::new();
    for (key, &count) in &roster.starters {
        starters.insert(parse_position("league.roster.starters", key, true)?, count);
    }

    let mut limits = BTreeMap::new();
    for (key, &count) in &roster.limits {
        limits.insert(parse_position("league.roster.limits", key, false)?, count);
    }

    let mut flex = BTreeSet::new();
    for key in &roster.flex_positions {
        flex.insert(parse_position("league.roster.flex_positions", key, false)?);
    }

    for (&position, &required) in &starters {
        if position == Position::Flex {
            continue;
        }
        let limit = limits.get(&position).copied().unwrap_or(0);
        if limit < required {
            return Err(invalid(
                format!("league.roster.limits.{position}"),
                format!("limit {limit} is below the {required} required starters"),
            ));
        }
    }

    Ok(RosterRules::new(starters, limits, roster.bench, roster.ir, flex))
}

fn build_depth_targets(
    overrides: &BTreeMap<String, DepthTarget>,
) -> Result<DepthTargets, ConfigError> {
    let mut targets = DepthTargets::default();
    for (key, target) in overrides {
        let position = parse_position("depth_targets", key, false)?;
        if target.recommended_depth > target.max_useful {
            return Err(invalid(
                format!("depth_targets.{key}"),
                "recommended_depth must not exceed max_useful",
            ));
        }
        targets.set(position, *target);
    }
    Ok(targets)
}

fn build_scarcity(
    overrides: &BTreeMap<String, ScarcityCurve>,
) -> Result<ScarcityPolicy, ConfigError> {
    let mut policy = ScarcityPolicy::default();
    for (key, curve) in overrides {
        let position = parse_position("scarcity", key, false)?;
        let bad_multiplier = curve.fallback <= 0.0 || curve.steps.iter().any(|s| s.multiplier <= 0.0);
        if bad_multiplier {
            return Err(invalid(format!("scarcity.{key}"), "multipliers must be > 0"));
        }
        policy = policy.with_curve(position, curve.clone());
    }
    Ok(policy)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_league(league: &LeagueSection) -> Result<(), ConfigError> {
    if league.num_teams == 0 {
        return Err(invalid("league.num_teams", "must be greater than 0"));
    }
    if league.rounds == 0 {
        return Err(invalid("league.rounds", "must be greater than 0"));
    }
    if league.owner.trim().is_empty() {
        return Err(invalid("league.owner", "must not be empty"));
    }
    if league.roster.starters.is_empty() {
        return Err(invalid("league.roster.starters", "must list at least one slot"));
    }
    Ok(())
}

fn validate_strategy(strategy: &StrategyFile) -> Result<(), ConfigError> {
    if strategy.recommendation.analysis_limit == 0 {
        return Err(invalid("recommendation.analysis_limit", "must be > 0"));
    }

    let ttl_fields: &[(&str, u64)] = &[
        ("cache.rankings_ttl_hours", strategy.cache.rankings_ttl_hours),
        ("cache.draft_board_ttl_seconds", strategy.cache.draft_board_ttl_seconds),
    ];
    for (name, val) in ttl_fields {
        if *val == 0 {
            return Err(invalid(*name, "must be > 0"));
        }
    }

    if strategy.sources.rankings.is_empty() {
        return Err(invalid("sources.rankings", "must list at least one source"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Workspace root, where defaults/ lives.
    fn project_root() -> PathBuf {
        let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let root = manifest.join("../..");
        assert!(
            root.join("defaults").exists(),
            "Cannot locate defaults/ directory from {:?}",
            manifest
        );
        root
    }

    /// Fresh temp dir with both default files copied into config/.
    fn temp_config(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let config_dir = tmp.join("config");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&config_dir).unwrap();
        let root = project_root();
        fs::copy(root.join("defaults/league.toml"), config_dir.join("league.toml")).unwrap();
        fs::copy(
            root.join("defaults/strategy.toml"),
            config_dir.join("strategy.toml"),
        )
        .unwrap();
        tmp
    }

    fn rewrite(tmp: &Path, file: &str, from: &str, to: &str) {
        let path = tmp.join("config").join(file);
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains(from), "{file} does not contain {from:?}");
        fs::write(&path, text.replace(from, to)).unwrap();
    }

    fn expect_validation_field(tmp: &Path, expected: &str) {
        match load_config_from(tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_valid_config_from_default_files() {
        let tmp = temp_config("gridpick_config_defaults");
        let config = load_config_from(&tmp).expect("should load valid config");

        assert_eq!(config.league.name, "Sunday Gridiron League");
        assert_eq!(config.league.num_teams, 10);
        assert_eq!(config.league.rounds, 16);
        assert!(config.league.snake);
        assert_eq!(config.league.owner, "Adam");

        // Default files mirror the built-in rule tables.
        assert_eq!(config.settings.rules, RosterRules::default());
        assert_eq!(config.settings.rules.max_roster_size(), 19);
        assert_eq!(config.settings.draft_format, DraftFormat::default());
        assert_eq!(config.settings.depth_targets, DepthTargets::default());
        assert_eq!(config.settings.scarcity, ScarcityPolicy::default());

        assert_eq!(config.strategy.default_strategy, Strategy::Balanced);
        assert!(config.strategy.consider_bye_weeks);
        assert_eq!(config.strategy.analysis_limit, 50);
        assert_eq!(config.strategy.team_match, TeamMatch::Prefix);
        assert_eq!(config.strategy.ranking_sources.len(), 4);
        assert_eq!(config.cache.rankings_ttl, Duration::from_secs(6 * 3600));
        assert_eq!(config.cache.draft_board_ttl, Duration::from_secs(30));
        assert_eq!(config.data_paths.rankings, "data/rankings.csv");

        let options = config.recommend_options();
        assert_eq!(options.analysis_limit, 50);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_fills_only_what_is_absent() {
        let tmp = std::env::temp_dir().join("gridpick_config_ensure");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("defaults/league.toml"), "default league").unwrap();
        fs::write(tmp.join("defaults/strategy.toml"), "default strategy").unwrap();
        fs::write(tmp.join("defaults/scoring.toml"), "unrelated").unwrap();
        fs::write(tmp.join("config/league.toml"), "user league").unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert_eq!(copied, vec![tmp.join("config/strategy.toml")]);
        assert_eq!(
            fs::read_to_string(tmp.join("config/league.toml")).unwrap(),
            "user league"
        );
        assert!(!tmp.join("config/scoring.toml").exists());

        // Second run has nothing to do.
        assert!(ensure_config_files(&tmp).unwrap().is_empty());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_names_missing_defaults() {
        let tmp = std::env::temp_dir().join("gridpick_config_partial_defaults");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults/league.toml"), "default league").unwrap();

        match ensure_config_files(&tmp).unwrap_err() {
            ConfigError::MissingDefaults { files, .. } => assert_eq!(files, vec!["strategy.toml"]),
            other => panic!("expected MissingDefaults, got: {other}"),
        }
        // Nothing is copied when the set is incomplete.
        assert!(!tmp.join("config/league.toml").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn config_without_defaults_is_enough() {
        let tmp = temp_config("gridpick_config_no_defaults");
        assert!(!tmp.join("defaults").exists());
        assert!(ensure_config_files(&tmp).unwrap().is_empty());
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_directories_is_an_error() {
        let tmp = std::env::temp_dir().join("gridpick_config_nothing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        let err = ensure_config_files(&tmp).unwrap_err();
        assert!(matches!(&err, ConfigError::MissingDefaults { files, .. } if files.len() == 2));
        assert!(err.to_string().contains("config/league.toml, config/strategy.toml"));
        assert!(matches!(
            load_config_from(&tmp),
            Err(ConfigError::FileNotFound { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_num_teams_zero() {
        let tmp = temp_config("gridpick_config_num_teams_zero");
        rewrite(&tmp, "league.toml", "num_teams = 10", "num_teams = 0");
        expect_validation_field(&tmp, "league.num_teams");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_strategy() {
        let tmp = temp_config("gridpick_config_bad_strategy");
        rewrite(
            &tmp,
            "strategy.toml",
            "default_strategy = \"balanced\"",
            "default_strategy = \"zero_rb\"",
        );
        expect_validation_field(&tmp, "recommendation.default_strategy");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_limit_below_starters() {
        let tmp = temp_config("gridpick_config_limit_below");
        rewrite(&tmp, "league.toml", "RB = 8", "RB = 1");
        expect_validation_field(&tmp, "league.roster.limits.RB");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_meta_slot_as_limit() {
        let tmp = temp_config("gridpick_config_meta_limit");
        rewrite(&tmp, "league.toml", "DST = 3", "DST = 3\nBE = 10");
        expect_validation_field(&tmp, "league.roster.limits.BE");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_ttl() {
        let tmp = temp_config("gridpick_config_zero_ttl");
        rewrite(
            &tmp,
            "strategy.toml",
            "draft_board_ttl_seconds = 30",
            "draft_board_ttl_seconds = 0",
        );
        expect_validation_field(&tmp, "cache.draft_board_ttl_seconds");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn bad_team_match_is_parse_error() {
        let tmp = temp_config("gridpick_config_bad_match");
        rewrite(&tmp, "strategy.toml", "team_match = \"prefix\"", "team_match = \"fuzzy\"");
        assert!(matches!(
            load_config_from(&tmp),
            Err(ConfigError::ParseError { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn scarcity_override_replaces_one_curve() {
        let tmp = temp_config("gridpick_config_scarcity");
        let path = tmp.join("config/strategy.toml");
        let mut text = fs::read_to_string(&path).unwrap();
        text.push_str(
            r#"
[scarcity.TE]
basis = "positional_rank"
fallback = 1.0
steps = [{ limit = 2, multiplier = 2.5 }]
"#,
        );
        fs::write(&path, text).unwrap();

        let config = load_config_from(&tmp).unwrap();
        let policy = &config.settings.scarcity;
        assert!((policy.multiplier(Position::TightEnd, 2, 30.0, 0.0) - 2.5).abs() < 1e-9);
        assert!((policy.multiplier(Position::TightEnd, 3, 30.0, 0.0) - 1.0).abs() < 1e-9);
        assert!((policy.multiplier(Position::RunningBack, 1, 1.0, 0.0) - 1.6).abs() < 1e-9);

        let _ = fs::remove_dir_all(&tmp);
    }
}
