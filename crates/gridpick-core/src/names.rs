// Player name and pro-team code normalization.
//
// Draft boards and ranking sources disagree on spelling: boards write
// "Travis Etienne Jr.   JAC", rankings write "Travis Etienne (JAX)", and the
// two sides use different team codes for the same club (SF vs SFO). Everything
// here exists so the two can be reconciled.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Pro-team codes recognized when splitting "Name TEAM" strings.
pub const TEAM_CODES: [&str; 33] = [
    "ARI", "ATL", "BAL", "BUF", "CAR", "CHI", "CIN", "CLE", "DAL", "DEN", "DET", "GB", "HOU",
    "IND", "JAC", "JAX", "KC", "LAC", "LAR", "LV", "MIA", "MIN", "NE", "NO", "NYG", "NYJ", "PHI",
    "PIT", "SEA", "SF", "TB", "TEN", "WAS",
];

/// Generational suffixes ignored when identifying a last name.
const NAME_SUFFIXES: [&str; 8] = ["jr", "jr.", "sr", "sr.", "ii", "iii", "iv", "v"];

/// Code for a player with no known pro team.
pub const UNKNOWN_TEAM: &str = "UNK";

/// Rankings-side team codes that differ from the draft board's.
const RANKINGS_TEAM_CODES: [(&str, &str); 7] = [
    ("GBP", "GB"),
    ("KCC", "KC"),
    ("LVR", "LV"),
    ("NEP", "NE"),
    ("NOS", "NO"),
    ("SFO", "SF"),
    ("TBB", "TB"),
];

// ---------------------------------------------------------------------------
// Team codes
// ---------------------------------------------------------------------------

/// Map a rankings-side team code onto the board's convention.
///
/// Blank codes and free agents become [`UNKNOWN_TEAM`]; codes without a
/// mapping pass through upper-cased.
pub fn normalize_team_code(code: &str) -> String {
    let upper = code.trim().to_ascii_uppercase();
    if upper.is_empty() || upper == "FA" || upper == UNKNOWN_TEAM {
        return UNKNOWN_TEAM.to_string();
    }
    RANKINGS_TEAM_CODES
        .iter()
        .find(|(from, _)| *from == upper)
        .map_or(upper, |(_, to)| (*to).to_string())
}

pub fn is_known_team_code(code: &str) -> bool {
    let upper = code.trim().to_ascii_uppercase();
    TEAM_CODES.contains(&upper.as_str())
}

/// How loosely two team codes are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamMatch {
    /// Case-insensitive equality.
    Exact,
    /// Either code contains the other (SF/SFO, GB/GBP).
    Substring,
    /// Substring, or the first two characters agree (LA/LAR). Also pairs
    /// NYG with NYJ.
    #[default]
    Prefix,
}

impl TeamMatch {
    pub fn teams_match(&self, a: &str, b: &str) -> bool {
        let a = a.trim().to_ascii_uppercase();
        let b = b.trim().to_ascii_uppercase();
        if a.is_empty() || b.is_empty() {
            return a == b;
        }
        if a == b {
            return true;
        }
        match self {
            TeamMatch::Exact => false,
            TeamMatch::Substring => a.contains(&b) || b.contains(&a),
            TeamMatch::Prefix => {
                a.contains(&b)
                    || b.contains(&a)
                    || (a.len() >= 2 && b.len() >= 2 && a.as_bytes()[..2] == b.as_bytes()[..2])
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Player names
// ---------------------------------------------------------------------------

/// Split a board cell like "Kenneth Walker III   SEA" into name and team.
///
/// The last whitespace token is taken as the team only when it is a known
/// team code; otherwise the whole (trimmed) field is the name.
pub fn split_name_team(field: &str) -> (String, Option<String>) {
    let parts: Vec<&str> = field.split_whitespace().collect();
    match parts.split_last() {
        Some((last, rest)) if !rest.is_empty() && is_known_team_code(last) => {
            (rest.join(" "), Some(last.to_ascii_uppercase()))
        }
        _ => (field.trim().to_string(), None),
    }
}

/// Comparison key for a player name: lower-cased, parenthesized tags removed,
/// `.`, `'` and `-` dropped, suffix tokens removed, whitespace collapsed.
///
/// "Marvin Harrison Jr. (ARI)" and "marvin harrison" share a key.
pub fn normalize_player_name(name: &str) -> String {
    let base = match name.find('(') {
        Some(idx) => &name[..idx],
        None => name,
    };
    let cleaned: String = base
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '.' | '\'' | '-'))
        .collect();

    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    let kept: Vec<&str> = tokens
        .iter()
        .enumerate()
        .filter(|&(i, tok)| i == 0 || !NAME_SUFFIXES.contains(tok))
        .map(|(_, tok)| *tok)
        .collect();
    kept.join(" ")
}

/// True when `search` is the start of the player's last name.
///
/// The last name is the final token before any trailing suffixes, so
/// "Walker" finds "Kenneth Walker III" but not "John Walker Smith".
/// Single-token names fall back to a substring check.
pub fn matches_last_name(search: &str, full_name: &str) -> bool {
    let search = search.trim().to_lowercase();
    let full = full_name.trim().to_lowercase();
    if search.is_empty() {
        return false;
    }

    let parts: Vec<&str> = full.split_whitespace().collect();
    if parts.len() < 2 {
        return full.contains(&search);
    }

    let mut idx = parts.len() - 1;
    while idx >= 1 && NAME_SUFFIXES.contains(&parts[idx]) {
        idx -= 1;
    }
    if idx >= 1 {
        parts[idx].starts_with(&search)
    } else {
        full.contains(&search)
    }
}

// ---------------------------------------------------------------------------
// Drafted-player index
// ---------------------------------------------------------------------------

/// Drafted players keyed by normalized name, for filtering a rankings pool.
#[derive(Debug, Clone, Default)]
pub struct DraftedIndex {
    strictness: TeamMatch,
    entries: HashMap<String, Vec<Option<String>>>,
}

impl DraftedIndex {
    pub fn new(strictness: TeamMatch) -> Self {
        DraftedIndex {
            strictness,
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: &str, team: Option<&str>) {
        let team = team
            .map(|t| t.trim().to_ascii_uppercase())
            .filter(|t| !t.is_empty() && t != UNKNOWN_TEAM);
        self.entries
            .entry(normalize_player_name(name))
            .or_default()
            .push(team);
    }

    /// A drafted entry without a team matches on name alone, as does a
    /// candidate without a team. Otherwise the codes must match under the
    /// configured strictness.
    pub fn contains(&self, name: &str, team: Option<&str>) -> bool {
        let Some(teams) = self.entries.get(&normalize_player_name(name)) else {
            return false;
        };
        let team = team
            .map(str::trim)
            .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case(UNKNOWN_TEAM));
        teams.iter().any(|drafted| match (drafted, team) {
            (None, _) | (_, None) => true,
            (Some(d), Some(t)) => self.strictness.teams_match(d, t),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
