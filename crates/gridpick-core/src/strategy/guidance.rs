// Round-by-round guidance, position timing and roster-level strategic advice.
//
// Nothing here changes candidate ordering; it only explains the board.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::needs::{RosterAnalysis, Urgency};
use crate::draft::player::{Position, DRAFTABLE_POSITIONS};
use crate::draft::roster::Team;
use crate::rules::RosterRules;
use crate::valuation::analysis::{PlayerAnalysis, Tier};

const EARLY_SNAKE_LAST_ROUND: u32 = 6;
const MID_SNAKE_LAST_ROUND: u32 = 12;
/// Rostered players sharing a bye week before it is flagged as heavy.
const HEAVY_BYE_PLAYERS: usize = 3;

// ---------------------------------------------------------------------------
// Draft format and round guidance
// ---------------------------------------------------------------------------

/// Special rounds of a hybrid auction/keeper/snake draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftFormat {
    pub auction_rounds: Vec<u32>,
    pub keeper_round: Option<u32>,
}

impl Default for DraftFormat {
    fn default() -> Self {
        DraftFormat {
            auction_rounds: vec![1, 2, 3],
            keeper_round: Some(4),
        }
    }
}

impl DraftFormat {
    /// A plain snake draft with no auction or keeper rounds.
    pub fn snake() -> Self {
        DraftFormat {
            auction_rounds: Vec::new(),
            keeper_round: None,
        }
    }

    pub fn round_type(&self, round: u32) -> RoundType {
        if self.auction_rounds.contains(&round) {
            RoundType::Auction
        } else if self.keeper_round == Some(round) {
            RoundType::Keeper
        } else if round <= EARLY_SNAKE_LAST_ROUND {
            RoundType::EarlySnake
        } else if round <= MID_SNAKE_LAST_ROUND {
            RoundType::MidSnake
        } else {
            RoundType::LateSnake
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    Auction,
    Keeper,
    EarlySnake,
    MidSnake,
    LateSnake,
}

impl RoundType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundType::Auction => "auction",
            RoundType::Keeper => "keeper",
            RoundType::EarlySnake => "early_snake",
            RoundType::MidSnake => "mid_snake",
            RoundType::LateSnake => "late_snake",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundGuidance {
    pub round_type: RoundType,
    pub key_focus: String,
    pub strategy_notes: Vec<String>,
}

/// Guidance for `round` under `format`.
pub fn round_guidance(round: u32, format: &DraftFormat) -> RoundGuidance {
    let round_type = format.round_type(round);
    let (key_focus, notes): (&str, [&str; 4]) = match round_type {
        RoundType::Auction => (
            "Target specific players you want",
            [
                "Focus on elite talent and positional scarcity",
                "Don't worry about traditional draft value",
                "Target players that fit your long-term roster construction",
                "Consider which positions will be thin in snake rounds",
            ],
        ),
        RoundType::Keeper => (
            "Value opportunity if drafting",
            [
                "Limited participation creates value opportunities",
                "Good chance for above-ADP picks",
                "Fill gaps not covered by your keeper",
                "Consider positions that will be scarce later",
            ],
        ),
        RoundType::EarlySnake => (
            "Secure elite talent and fill critical needs",
            [
                "Priority on RB/WR scarcity positions",
                "Avoid QB/TE/K/DST unless elite tier",
                "Build foundation with consistent producers",
                "Consider positional runs and timing",
            ],
        ),
        RoundType::MidSnake => (
            "Balance starters and depth",
            [
                "Fill remaining starter needs",
                "Begin building bench depth",
                "Consider QB/TE if not addressed",
                "Target high-upside players in deeper positions",
            ],
        ),
        RoundType::LateSnake => (
            "Depth, upside, and late-round value",
            [
                "Target handcuffs and lottery tickets",
                "Fill K/DST if not done yet",
                "Look for breakout candidates",
                "Consider stashing injured players",
            ],
        ),
    };

    RoundGuidance {
        round_type,
        key_focus: key_focus.to_string(),
        strategy_notes: notes.iter().map(|s| s.to_string()).collect(),
    }
}

// ---------------------------------------------------------------------------
// Position timing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopAvailable {
    pub name: String,
    pub rank: f64,
    pub tier: Tier,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecommendation {
    pub position: Position,
    pub urgency: Urgency,
    pub current_count: usize,
    pub top_available: Vec<TopAvailable>,
    pub recommendation: String,
}

/// Top three available players per position with timing advice. Positions
/// with nobody available are omitted.
///
/// `available` is expected in value order.
pub fn position_recommendations(
    available: &[PlayerAnalysis],
    roster: &RosterAnalysis,
) -> Vec<PositionRecommendation> {
    DRAFTABLE_POSITIONS
        .iter()
        .filter_map(|&position| {
            let top: Vec<&PlayerAnalysis> = available
                .iter()
                .filter(|a| a.position() == position)
                .take(3)
                .collect();
            let best = top.first()?;
            let urgency = roster.urgency(position);
            let current_count = roster.current_count(position);

            Some(PositionRecommendation {
                position,
                urgency,
                current_count,
                recommendation: timing_recommendation(position, urgency, current_count, best),
                top_available: top
                    .iter()
                    .map(|a| TopAvailable {
                        name: a.player.name.clone(),
                        rank: a.average_rank,
                        tier: a.tier(),
                        value: a.overall_value(),
                    })
                    .collect(),
            })
        })
        .collect()
}

fn timing_recommendation(
    position: Position,
    urgency: Urgency,
    current_count: usize,
    best: &PlayerAnalysis,
) -> String {
    let name = &best.player.name;
    let tier = best.tier();
    let top_tier = matches!(tier, Tier::Elite | Tier::Tier1);

    match (urgency, position) {
        (Urgency::Critical, _) => {
            format!("Draft now - Critical need and {name} ({tier}) available")
        }
        (Urgency::High, _) if matches!(tier, Tier::Elite | Tier::Tier1 | Tier::Tier2) => {
            format!("Strong consideration - {name} fills need with good value")
        }
        (_, Position::Kicker | Position::Defense) => {
            if best.average_rank < 150.0 {
                "Wait - Don't reach for K/DST this early".to_string()
            } else {
                format!("Reasonable timing for {name}")
            }
        }
        (_, Position::Quarterback) if current_count == 0 => {
            if top_tier {
                format!("Consider now - {name} is elite QB talent")
            } else if best.average_rank > 100.0 {
                "Can wait - QB depth still available later".to_string()
            } else {
                format!("Solid timing for {name}")
            }
        }
        (_, Position::TightEnd) if current_count == 0 => {
            if top_tier {
                format!("Consider now - Elite TE {name} available")
            } else {
                "Can wait - TE streaming options available".to_string()
            }
        }
        (Urgency::Medium | Urgency::High, _) => {
            format!("Good depth option - {name} adds roster flexibility")
        }
        _ => format!("Optional - {name} available if value aligns"),
    }
}

// ---------------------------------------------------------------------------
// Strategic advice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlexAnalysis {
    pub total_flex_options: usize,
    pub rb_depth: usize,
    pub wr_depth: usize,
    pub te_depth: usize,
    pub best_flex_option: Option<String>,
}

/// Roster-level advice in plain sentences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategicAdvice {
    pub primary_needs: Vec<String>,
    pub warnings: Vec<String>,
    pub opportunities: Vec<String>,
    pub flex_analysis: FlexAnalysis,
    pub strategy_notes: Vec<String>,
}

/// One entry of the prioritized need list behind `primary_needs`.
struct PrioritizedNeed {
    position: Position,
    deficit: usize,
    priority: f64,
}

/// Starter deficits scored by importance. Deficits are relative to
/// requirement; QB/RB/WR get a boost, as do FLEX-eligible positions while the
/// FLEX pool is thin. A FLEX depth shortfall is appended with fixed priority.
fn prioritized_needs(team: &Team, rules: &RosterRules) -> Vec<PrioritizedNeed> {
    let needs = rules.position_needs(team, true);
    let flex = rules.flex_eligibility(team, None);
    let thin_flex = flex.rb_options + flex.wr_options + flex.te_options < 3;

    let mut out: Vec<PrioritizedNeed> = rules
        .starter_requirements()
        .iter()
        .map(|(&position, &required)| {
            let deficit = needs.need(position);
            let mut priority = if required > 0 {
                deficit as f64 / required as f64
            } else {
                0.0
            };
            if matches!(
                position,
                Position::Quarterback | Position::RunningBack | Position::WideReceiver
            ) {
                priority *= 1.2;
            }
            if rules.is_flex_eligible(position) && thin_flex {
                priority *= 1.1;
            }
            PrioritizedNeed {
                position,
                deficit,
                priority,
            }
        })
        .collect();

    if let Some(depth) = needs.flex_depth.filter(|&d| d > 0) {
        out.push(PrioritizedNeed {
            position: Position::Flex,
            deficit: depth,
            priority: 0.8,
        });
    }

    out.sort_by(|a, b| {
        b.priority
            .partial_cmp(&a.priority)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    out
}

/// Advice for `team` at `current_round`: primary needs, limit warnings,
/// FLEX depth, round notes, QB urgency and heavy bye weeks.
pub fn strategy_advice(team: &Team, rules: &RosterRules, current_round: u32) -> StrategicAdvice {
    let mut advice = StrategicAdvice::default();

    for need in prioritized_needs(team, rules)
        .into_iter()
        .filter(|n| n.priority > 0.5)
        .take(3)
    {
        if need.deficit == 0 {
            continue;
        }
        if need.position == Position::Flex {
            advice.primary_needs.push(format!(
                "Need {} more FLEX-eligible players (RB/WR/TE) for starting lineup",
                need.deficit
            ));
        } else {
            advice.primary_needs.push(format!(
                "Need {} more {} for starting lineup",
                need.deficit, need.position
            ));
        }
    }

    for (position, remaining) in rules.remaining_slots(team) {
        if remaining == 1 {
            advice.warnings.push(format!(
                "Close to {position} roster limit ({remaining} slot remaining)"
            ));
        } else if remaining == 0 {
            advice
                .warnings
                .push(format!("At {position} roster limit - cannot draft more"));
        }
    }

    let flex = rules.flex_eligibility(team, None);
    let total_flex = flex.rb_options + flex.wr_options + flex.te_options;
    advice.flex_analysis = FlexAnalysis {
        total_flex_options: total_flex,
        rb_depth: flex.rb_options,
        wr_depth: flex.wr_options,
        te_depth: flex.te_options,
        best_flex_option: flex.best_flex_option.map(|p| p.name),
    };
    if total_flex < 3 {
        advice
            .opportunities
            .push("Need RB/WR/TE depth for FLEX position and bye week coverage".into());
    } else if total_flex >= 6 {
        advice
            .opportunities
            .push("Good FLEX depth - can focus on other positions or best available".into());
    }

    if current_round <= 3 {
        advice
            .strategy_notes
            .push("Early rounds: prioritize guaranteed starters and elite talent".into());
        let needs = rules.position_needs(team, false);
        if needs.need(Position::RunningBack) > 0 || needs.need(Position::WideReceiver) > 0 {
            advice
                .strategy_notes
                .push("Consider RB/WR early for FLEX flexibility".into());
        }
    } else if current_round <= 8 {
        advice
            .strategy_notes
            .push("Middle rounds: complete starting lineup and add key depth".into());
        if total_flex < 4 {
            advice
                .strategy_notes
                .push("Focus on RB/WR/TE depth for FLEX and bye week coverage".into());
        }
    } else if current_round <= 12 {
        advice
            .strategy_notes
            .push("Late rounds: target depth, handcuffs, and high-upside players".into());
    } else {
        if team.position_count(Position::Kicker) == 0 {
            advice
                .strategy_notes
                .push("Time to draft Kicker if not done".into());
        }
        if team.position_count(Position::Defense) == 0 {
            advice
                .strategy_notes
                .push("Time to draft Defense if not done".into());
        }
    }

    let qb_count = team.position_count(Position::Quarterback);
    if qb_count == 0 && current_round > 6 {
        advice
            .warnings
            .push("No QB drafted yet - becoming urgent".into());
    } else if qb_count >= 2 && current_round <= 8 {
        advice
            .opportunities
            .push("QB position stable - can focus elsewhere".into());
    }

    if current_round >= 6 {
        let mut by_week: BTreeMap<u32, usize> = BTreeMap::new();
        for player in &team.roster {
            *by_week.entry(player.bye_week).or_insert(0) += 1;
        }
        let heavy: Vec<String> = by_week
            .iter()
            .filter(|&(_, &n)| n >= HEAVY_BYE_PLAYERS)
            .map(|(week, _)| week.to_string())
            .collect();
        if !heavy.is_empty() {
            advice.warnings.push(format!(
                "Heavy bye week conflicts in week(s) {}",
                heavy.join(", ")
            ));
        }
    }

    advice
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::player::Player;
    use crate::strategy::needs::{analyze_roster_needs, DepthTargets};
    use crate::valuation::analysis::analyze_player;
    use crate::valuation::bye_week::ByeWeekImpact;
    use crate::valuation::scarcity::ScarcityPolicy;

    fn team_of(players: &[(&str, Position, u32)]) -> Team {
        let mut team = Team::new("Advice FC", 4);
        for (name, pos, bye) in players {
            team.add_player(Player::new(name, *pos, "PIT", *bye));
        }
        team
    }

    fn analysis(name: &str, pos: Position, rank: u32) -> PlayerAnalysis {
        let player = Player::new(name, pos, "SEA", 8).with_ranking("espn", rank, 50.0);
        analyze_player(&player, 1, 10, ByeWeekImpact::neutral(8), &ScarcityPolicy::default())
    }

    #[test]
    fn round_types_follow_format() {
        let format = DraftFormat::default();
        assert_eq!(round_guidance(1, &format).round_type, RoundType::Auction);
        assert_eq!(round_guidance(3, &format).round_type, RoundType::Auction);
        assert_eq!(round_guidance(4, &format).round_type, RoundType::Keeper);
        assert_eq!(round_guidance(6, &format).round_type, RoundType::EarlySnake);
        assert_eq!(round_guidance(7, &format).round_type, RoundType::MidSnake);
        assert_eq!(round_guidance(12, &format).round_type, RoundType::MidSnake);
        assert_eq!(round_guidance(13, &format).round_type, RoundType::LateSnake);

        let snake = DraftFormat::snake();
        let g = round_guidance(1, &snake);
        assert_eq!(g.round_type, RoundType::EarlySnake);
        assert_eq!(g.key_focus, "Secure elite talent and fill critical needs");
        assert_eq!(g.strategy_notes.len(), 4);
        assert_eq!(RoundType::LateSnake.as_str(), "late_snake");
    }

    #[test]
    fn qb_warning_when_none_drafted_late() {
        let team = team_of(&[
            ("RB A", Position::RunningBack, 5),
            ("RB B", Position::RunningBack, 6),
            ("WR A", Position::WideReceiver, 7),
            ("WR B", Position::WideReceiver, 9),
            ("TE A", Position::TightEnd, 10),
            ("WR C", Position::WideReceiver, 11),
            ("RB C", Position::RunningBack, 12),
        ]);
        let rules = RosterRules::default();

        let advice = strategy_advice(&team, &rules, 8);
        assert!(advice
            .warnings
            .contains(&"No QB drafted yet - becoming urgent".to_string()));

        let early = strategy_advice(&team, &rules, 5);
        assert!(!early
            .warnings
            .contains(&"No QB drafted yet - becoming urgent".to_string()));
    }

    #[test]
    fn limit_warnings() {
        let rules = RosterRules::default();
        let team = team_of(&[
            ("K1", Position::Kicker, 5),
            ("K2", Position::Kicker, 6),
            ("K3", Position::Kicker, 7),
            ("D1", Position::Defense, 8),
            ("D2", Position::Defense, 9),
        ]);
        let advice = strategy_advice(&team, &rules, 10);
        assert!(advice
            .warnings
            .contains(&"At K roster limit - cannot draft more".to_string()));
        assert!(advice
            .warnings
            .contains(&"Close to DST roster limit (1 slot remaining)".to_string()));
    }

    #[test]
    fn empty_roster_primary_needs_and_flex() {
        let rules = RosterRules::default();
        let advice = strategy_advice(&Team::new("Fresh", 1), &rules, 1);

        assert_eq!(advice.primary_needs.len(), 3);
        assert_eq!(advice.primary_needs[0], "Need 2 more RB for starting lineup");
        assert_eq!(advice.primary_needs[1], "Need 2 more WR for starting lineup");
        assert_eq!(advice.flex_analysis.total_flex_options, 0);
        assert!(advice.flex_analysis.best_flex_option.is_none());
        assert!(advice
            .opportunities
            .contains(&"Need RB/WR/TE depth for FLEX position and bye week coverage".to_string()));
        assert!(advice
            .strategy_notes
            .contains(&"Consider RB/WR early for FLEX flexibility".to_string()));
    }

    #[test]
    fn heavy_bye_week_flagged_from_round_six() {
        let team = team_of(&[
            ("QB A", Position::Quarterback, 9),
            ("RB A", Position::RunningBack, 9),
            ("WR A", Position::WideReceiver, 9),
            ("WR B", Position::WideReceiver, 5),
        ]);
        let rules = RosterRules::default();
        let late = strategy_advice(&team, &rules, 6);
        assert!(late
            .warnings
            .contains(&"Heavy bye week conflicts in week(s) 9".to_string()));
        let early = strategy_advice(&team, &rules, 5);
        assert!(early.warnings.iter().all(|w| !w.starts_with("Heavy bye")));
    }

    #[test]
    fn very_late_rounds_call_for_kicker_and_defense() {
        let team = team_of(&[("K1", Position::Kicker, 5)]);
        let advice = strategy_advice(&team, &RosterRules::default(), 14);
        assert_eq!(advice.strategy_notes, vec!["Time to draft Defense if not done"]);
    }

    #[test]
    fn position_recommendation_texts() {
        let team = team_of(&[("RB A", Position::RunningBack, 5)]);
        let roster = analyze_roster_needs(&team, &DepthTargets::default());
        let available = vec![
            analysis("Elite QB", Position::Quarterback, 20),
            analysis("Stream TE", Position::TightEnd, 120),
            analysis("Early K", Position::Kicker, 130),
            analysis("RB Two", Position::RunningBack, 40),
            analysis("RB Three", Position::RunningBack, 45),
            analysis("RB Four", Position::RunningBack, 50),
            analysis("RB Five", Position::RunningBack, 55),
        ];
        let recs = position_recommendations(&available, &roster);
        let by_pos = |pos: Position| recs.iter().find(|r| r.position == pos).unwrap();

        // Zero QBs is a Critical need.
        assert_eq!(
            by_pos(Position::Quarterback).recommendation,
            "Draft now - Critical need and Elite QB (Tier 1) available"
        );
        assert_eq!(
            by_pos(Position::RunningBack).recommendation,
            "Strong consideration - RB Two fills need with good value"
        );
        assert_eq!(by_pos(Position::RunningBack).top_available.len(), 3);
        assert!(recs.iter().all(|r| r.position != Position::WideReceiver));
    }

    #[test]
    fn timing_for_filled_positions() {
        let team = team_of(&[
            ("QB A", Position::Quarterback, 5),
            ("QB B", Position::Quarterback, 6),
            ("K A", Position::Kicker, 7),
        ]);
        let qb = analysis("Backup QB", Position::Quarterback, 90);
        let k = analysis("Another K", Position::Kicker, 130);
        let late_k = analysis("Late K", Position::Kicker, 180);

        assert_eq!(
            timing_recommendation(Position::Quarterback, Urgency::Low, 2, &qb),
            "Optional - Backup QB available if value aligns"
        );
        assert_eq!(
            timing_recommendation(Position::Kicker, Urgency::Low, 1, &k),
            "Wait - Don't reach for K/DST this early"
        );
        assert_eq!(
            timing_recommendation(Position::Kicker, Urgency::Low, 1, &late_k),
            "Reasonable timing for Late K"
        );
        assert_eq!(team.position_count(Position::Quarterback), 2);
    }
}
