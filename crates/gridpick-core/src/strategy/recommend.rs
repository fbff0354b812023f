// Strategy-weighted pick recommendation.
//
// Every available player is valued, then scored as
//   value * strategy multiplier * bye factor * urgency multiplier
// and ranked. The top candidate is the primary pick; the next three are
// alternatives.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::guidance::{
    position_recommendations, round_guidance, strategy_advice, DraftFormat,
    PositionRecommendation, RoundGuidance, RoundType, StrategicAdvice,
};
use super::needs::{analyze_roster_needs, DepthTargets, RosterAnalysis, Urgency};
use crate::draft::player::{Player, Position};
use crate::draft::roster::Team;
use crate::error::EngineError;
use crate::rules::RosterRules;
use crate::valuation::analysis::{analyze_available, PlayerAnalysis, Tier};
use crate::valuation::bye_week::{ByeWeekSummary, ConflictSeverity};
use crate::valuation::scarcity::{ScarcityLevel, ScarcityPolicy};

const ALTERNATIVE_COUNT: usize = 3;
/// Rounds in which the upside strategy still prefers proven top tiers.
const UPSIDE_EARLY_ROUNDS: u32 = 5;
const HIGH_CONFIDENCE_SCORE: f64 = 50.0;
const CLEAR_BEST_GAP: f64 = 10.0;

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// Drafting philosophy applied on top of raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Value tempered by roster needs.
    #[default]
    Balanced,
    /// Pure value, ignoring needs.
    BestAvailable,
    /// Ceiling over floor; sleepers in later rounds.
    Upside,
    /// Floor over ceiling; avoids volatile positions.
    Safe,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Balanced,
        Strategy::BestAvailable,
        Strategy::Upside,
        Strategy::Safe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Balanced => "balanced",
            Strategy::BestAvailable => "best_available",
            Strategy::Upside => "upside",
            Strategy::Safe => "safe",
        }
    }
}

impl FromStr for Strategy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .iter()
            .copied()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::InvalidStrategy {
                strategy: s.to_string(),
            })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy multiplier for one analyzed player.
pub fn strategy_multiplier(
    strategy: Strategy,
    analysis: &PlayerAnalysis,
    urgency: Urgency,
    current_round: u32,
) -> f64 {
    let tier_rank = analysis.value_metrics.tier_rank;
    let scarcity = analysis.scarcity_analysis.position_scarcity;

    match strategy {
        Strategy::BestAvailable => match tier_rank {
            0..=2 => 1.8,
            3 => 1.4,
            _ => 1.0,
        },
        Strategy::Balanced => {
            if urgency == Urgency::Critical {
                1.6
            } else if urgency == Urgency::High && tier_rank <= 3 {
                1.4
            } else if tier_rank <= 2 {
                1.3
            } else if matches!(urgency, Urgency::Medium | Urgency::High) {
                1.1
            } else {
                1.0
            }
        }
        Strategy::Upside if current_round <= UPSIDE_EARLY_ROUNDS => {
            if tier_rank <= 2 {
                1.5
            } else if scarcity == ScarcityLevel::High && tier_rank <= 3 {
                1.3
            } else {
                1.0
            }
        }
        Strategy::Upside => {
            let sleeper = analysis.average_rank > 100.0
                && analysis
                    .player
                    .commentary
                    .as_deref()
                    .is_some_and(|c| !c.trim().is_empty());
            if sleeper {
                1.4
            } else if scarcity == ScarcityLevel::High {
                1.2
            } else {
                1.0
            }
        }
        Strategy::Safe => {
            let position = analysis.position();
            if tier_rank <= 3 && scarcity != ScarcityLevel::High {
                1.4
            } else if matches!(position, Position::RunningBack | Position::WideReceiver)
                && tier_rank <= 4
            {
                1.2
            } else if matches!(position, Position::Kicker | Position::Defense) {
                0.7
            } else {
                1.0
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// League-level tables the recommender reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineSettings {
    pub rules: RosterRules,
    pub scarcity: ScarcityPolicy,
    pub depth_targets: DepthTargets,
    pub draft_format: DraftFormat,
}

/// Per-request knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendOptions {
    pub strategy: Strategy,
    pub current_round: u32,
    pub consider_bye_weeks: bool,
    /// Candidates kept after valuation, best first.
    pub analysis_limit: usize,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        RecommendOptions {
            strategy: Strategy::Balanced,
            current_round: 1,
            consider_bye_weeks: true,
            analysis_limit: 50,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub analysis: PlayerAnalysis,
    pub strategy_score: f64,
    pub strategy_multiplier: f64,
    pub position_need_factor: f64,
    pub bye_week_factor: f64,
    pub detailed_reasoning: Vec<String>,
}

impl ScoredCandidate {
    pub fn name(&self) -> &str {
        &self.analysis.player.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicGuidance {
    pub round_guidance: RoundGuidance,
    pub position_recommendations: Vec<PositionRecommendation>,
    pub bye_week_considerations: ByeWeekSummary,
    pub advice: StrategicAdvice,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceFactors {
    pub high_confidence: bool,
    pub clear_best_pick: bool,
    pub positional_need_urgent: bool,
    pub bye_week_conflicts: bool,
}

/// Everything the engine says about the team's next pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub primary_pick: Option<ScoredCandidate>,
    pub alternatives: Vec<ScoredCandidate>,
    pub strategy_used: Strategy,
    pub consider_bye_weeks: bool,
    pub current_round: u32,
    pub round_type: RoundType,
    pub total_options_analyzed: usize,
    pub team_analyzed: String,
    pub roster_analysis: RosterAnalysis,
    pub strategic_guidance: StrategicGuidance,
    pub confidence_factors: ConfidenceFactors,
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

/// Rank `available` for `team` and explain the top choices.
///
/// An empty pool yields no primary pick rather than an error.
pub fn recommend(
    team: &Team,
    available: &[Player],
    settings: &EngineSettings,
    options: &RecommendOptions,
) -> Recommendation {
    let analysis = analyze_available(
        available,
        Some(team),
        &settings.rules,
        &settings.scarcity,
        None,
        Some(options.analysis_limit),
    );
    let roster = analyze_roster_needs(team, &settings.depth_targets);

    let mut ranked: Vec<ScoredCandidate> = analysis
        .players
        .iter()
        .map(|a| score_candidate(a, &roster, options))
        .collect();

    ranked.sort_by(|a, b| {
        b.strategy_score
            .partial_cmp(&a.strategy_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                a.analysis
                    .average_rank
                    .partial_cmp(&b.analysis.average_rank)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });

    let mut ranked = ranked.into_iter();
    let mut primary_pick = ranked.next();
    let mut alternatives: Vec<ScoredCandidate> = ranked.take(ALTERNATIVE_COUNT).collect();

    if let Some(primary) = primary_pick.as_mut() {
        primary.detailed_reasoning = pick_reasoning(primary, &roster, options, false);
        info!(
            "Recommending {} for {} (score {:.2}, strategy {})",
            primary.name(),
            team.name,
            primary.strategy_score,
            options.strategy
        );
    } else {
        info!("No available players to recommend for {}", team.name);
    }
    for alt in alternatives.iter_mut() {
        alt.detailed_reasoning = pick_reasoning(alt, &roster, options, true);
    }

    let confidence_factors = ConfidenceFactors {
        high_confidence: primary_pick
            .as_ref()
            .is_some_and(|p| p.strategy_score > HIGH_CONFIDENCE_SCORE),
        clear_best_pick: match (primary_pick.as_ref(), alternatives.first()) {
            (Some(p), Some(alt)) => p.strategy_score - alt.strategy_score > CLEAR_BEST_GAP,
            _ => false,
        },
        positional_need_urgent: roster.has_critical_need(),
        bye_week_conflicts: analysis.bye_weeks.has_conflicts(),
    };

    let strategic_guidance = StrategicGuidance {
        round_guidance: round_guidance(options.current_round, &settings.draft_format),
        position_recommendations: position_recommendations(&analysis.players, &roster),
        bye_week_considerations: analysis.bye_weeks.clone(),
        advice: strategy_advice(team, &settings.rules, options.current_round),
    };

    debug!(
        "Scored {} candidates in round {}",
        analysis.players.len(),
        options.current_round
    );

    Recommendation {
        primary_pick,
        alternatives,
        strategy_used: options.strategy,
        consider_bye_weeks: options.consider_bye_weeks,
        current_round: options.current_round,
        round_type: settings.draft_format.round_type(options.current_round),
        total_options_analyzed: analysis.players.len(),
        team_analyzed: team.name.clone(),
        roster_analysis: roster,
        strategic_guidance,
        confidence_factors,
    }
}

fn score_candidate(
    analysis: &PlayerAnalysis,
    roster: &RosterAnalysis,
    options: &RecommendOptions,
) -> ScoredCandidate {
    let position = analysis.position();
    let urgency = roster.urgency(position);
    let strategy = strategy_multiplier(options.strategy, analysis, urgency, options.current_round);
    let bye = if options.consider_bye_weeks {
        analysis.bye_week_analysis.penalty
    } else {
        1.0
    };
    let need = roster.urgency_multiplier(position);

    ScoredCandidate {
        analysis: analysis.clone(),
        strategy_score: analysis.overall_value() * strategy * bye * need,
        strategy_multiplier: strategy,
        position_need_factor: need,
        bye_week_factor: bye,
        detailed_reasoning: Vec::new(),
    }
}

/// Plain-language justification for a candidate.
fn pick_reasoning(
    candidate: &ScoredCandidate,
    roster: &RosterAnalysis,
    options: &RecommendOptions,
    is_alternative: bool,
) -> Vec<String> {
    let a = &candidate.analysis;
    let position = a.position();
    let name = &a.player.name;
    let mut reasons = Vec::new();

    if is_alternative {
        reasons.push(format!(
            "Alternative option: {name} ({position}) offers different strategic value"
        ));
    } else {
        reasons.push(format!(
            "Primary recommendation: {name} ({position}) - Rank {:.0}",
            a.average_rank
        ));
    }

    match a.tier() {
        tier @ (Tier::Elite | Tier::Tier1) => reasons.push(format!(
            "Excellent value - {tier} player still available at this pick"
        )),
        Tier::Tier2 => {
            reasons.push("Good value - Solid Tier 2 option with reliable production".into())
        }
        _ => {}
    }

    let urgency = roster.urgency(position);
    match urgency {
        Urgency::Critical => reasons.push(format!(
            "Critical need - You have {} {position}s and need starters",
            roster.current_count(position)
        )),
        Urgency::High => reasons.push(format!(
            "Important need - Helps fill starting lineup depth at {position}"
        )),
        Urgency::Medium => reasons.push(format!(
            "Depth play - Adds valuable {position} depth to your roster"
        )),
        Urgency::Low | Urgency::None => {}
    }

    let strategy_note = match options.strategy {
        Strategy::BestAvailable => "Best available player regardless of position needs",
        Strategy::Balanced if urgency.is_pressing() => "Perfect balance of value and roster need",
        Strategy::Balanced => "Best available player with roster construction in mind",
        Strategy::Upside if options.current_round <= UPSIDE_EARLY_ROUNDS => {
            "High-ceiling player with league-winning potential"
        }
        Strategy::Upside => "Upside play - Could outperform ADP significantly",
        Strategy::Safe => "Reliable, consistent production with low bust risk",
    };
    reasons.push(strategy_note.to_string());

    let pos_rank = a.value_metrics.positional_rank;
    if a.scarcity_analysis.position_scarcity == ScarcityLevel::High {
        reasons.push(format!(
            "Positional scarcity - Only {pos_rank} quality {position}s left available"
        ));
    } else if matches!(position, Position::TightEnd | Position::Quarterback) && pos_rank <= 8 {
        reasons.push(format!(
            "Position timing - Good value for {position}{pos_rank} at this draft stage"
        ));
    }

    if options.consider_bye_weeks {
        let bye = &a.bye_week_analysis;
        if bye.severity == ConflictSeverity::High {
            reasons.push(format!(
                "Bye week concern - Week {} creates roster conflicts",
                bye.bye_week
            ));
        } else if bye.severity == ConflictSeverity::None && bye.helps_bye_diversity {
            reasons.push(format!(
                "Bye week help - Week {} improves roster flexibility",
                bye.bye_week
            ));
        }
    }

    let fit = if candidate.strategy_score > 60.0 {
        "Strong overall fit for your team and strategy"
    } else if candidate.strategy_score > 40.0 {
        "Solid pick that addresses multiple factors"
    } else {
        "Reasonable option given current board state"
    };
    reasons.push(fit.to_string());

    reasons
}
