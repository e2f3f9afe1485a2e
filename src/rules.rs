//! Keyword tables used to read a program sheet.
//!
//! Each table is evaluated in order and the first matching entry wins.

use once_cell::sync::Lazy;
use regex::Regex;

static WEEK_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)week\s+(\d+)").expect("week label pattern"));
static DAY_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)day\s+(\d+)").expect("day marker pattern"));
static NUMERIC_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.?\d*%?$").expect("numeric text pattern"));

/// Week number from a header label such as `"Week 3"`.
pub fn week_number(label: &str) -> Option<u32> {
    WEEK_LABEL
        .captures(label)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Day number from a marker such as `"Day 2"`.
pub fn day_number(label: &str) -> Option<u32> {
    DAY_MARKER
        .captures(label)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

pub fn is_day_marker(label: &str) -> bool {
    DAY_MARKER.is_match(label)
}

/// Test applied to a trimmed label cell.
#[derive(Debug, Clone, Copy)]
pub enum LabelMatcher {
    DayMarker,
    Contains(&'static str),
    Equals(&'static str),
    ContainsAny(&'static [&'static str]),
    /// Case-insensitive; the keywords must be lowercase.
    ContainsAnyIgnoreCase(&'static [&'static str]),
}

impl LabelMatcher {
    pub fn matches(&self, label: &str) -> bool {
        match self {
            LabelMatcher::DayMarker => is_day_marker(label),
            LabelMatcher::Contains(needle) => label.contains(needle),
            LabelMatcher::Equals(value) => label == *value,
            LabelMatcher::ContainsAny(needles) => needles.iter().any(|n| label.contains(n)),
            LabelMatcher::ContainsAnyIgnoreCase(needles) => {
                let lower = label.to_lowercase();
                needles.iter().any(|n| lower.contains(n))
            }
        }
    }
}

/// What a row's label says about the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Markers, comments and summary rows.
    Noise,
    /// Free-text accessory scheme.
    Accessories,
    /// Names a lift; still needs data to count as an exercise.
    ExerciseHeader,
    Unrecognised,
}

#[derive(Debug, Clone, Copy)]
pub struct LabelRule {
    pub matcher: LabelMatcher,
    pub kind: RowKind,
}

pub const EXERCISE_KEYWORDS: &[&str] = &[
    "snatch", "clean", "jerk", "squat", "pull", "press", "push", "curl",
];

pub const ROW_RULES: &[LabelRule] = &[
    LabelRule { matcher: LabelMatcher::DayMarker, kind: RowKind::Noise },
    LabelRule { matcher: LabelMatcher::Contains("Athlete Comments"), kind: RowKind::Noise },
    LabelRule { matcher: LabelMatcher::Contains("Accessories"), kind: RowKind::Accessories },
    LabelRule { matcher: LabelMatcher::Contains("Rate Your Readiness"), kind: RowKind::Noise },
    LabelRule { matcher: LabelMatcher::Contains("Split Squats"), kind: RowKind::Noise },
    LabelRule { matcher: LabelMatcher::Contains("Leaps"), kind: RowKind::Noise },
    LabelRule { matcher: LabelMatcher::Contains("Total"), kind: RowKind::Noise },
    LabelRule { matcher: LabelMatcher::Equals("Total Reps"), kind: RowKind::Noise },
    LabelRule { matcher: LabelMatcher::Equals("Total Tonnage"), kind: RowKind::Noise },
    LabelRule { matcher: LabelMatcher::Equals("Relative Intensity"), kind: RowKind::Noise },
    LabelRule {
        matcher: LabelMatcher::ContainsAnyIgnoreCase(EXERCISE_KEYWORDS),
        kind: RowKind::ExerciseHeader,
    },
];

pub fn classify_label(label: &str) -> RowKind {
    ROW_RULES
        .iter()
        .find(|rule| rule.matcher.matches(label))
        .map_or(RowKind::Unrecognised, |rule| rule.kind)
}

/// Labels that end the list of accessory names below an accessory cell.
pub const ACCESSORY_STOP_RULES: &[LabelMatcher] = &[
    LabelMatcher::DayMarker,
    LabelMatcher::Contains("Athlete Comments"),
    LabelMatcher::ContainsAny(&["Snatch", "Clean", "Jerk", "Squat", "Total", "Accessories"]),
];

pub fn ends_accessory_list(label: &str) -> bool {
    ACCESSORY_STOP_RULES.iter().any(|m| m.matches(label))
}

/// Lines inside an accessory cell that are headings, not exercises.
pub const ACCESSORY_HEADING_LINES: &[&str] = &["Accessories", "Athlete Comments:"];

/// Whether trimmed text can be an accessory exercise name.
pub fn is_accessory_name(candidate: &str) -> bool {
    candidate.chars().count() > 2 && !NUMERIC_TEXT.is_match(candidate) && !candidate.contains('%')
}

#[derive(Debug, Clone, Copy)]
pub struct CanonicalRule {
    pub aliases: &'static [&'static str],
    pub canonical: &'static str,
}

pub const CANONICAL_NAMES: &[CanonicalRule] = &[
    CanonicalRule { aliases: &["Clean & Jerk", "Clean and Jerk"], canonical: "Clean and Jerk" },
    CanonicalRule { aliases: &["Snatch Pull"], canonical: "Snatch Pull" },
    CanonicalRule { aliases: &["Clean Pull"], canonical: "Clean Pull" },
    CanonicalRule { aliases: &["Front Squat", "FS"], canonical: "Front Squat" },
    CanonicalRule { aliases: &["Back Squat", "BS"], canonical: "Back Squat" },
];

/// Resolve common aliases of the competition lifts; other labels pass through.
pub fn canonical_exercise_name(label: &str) -> String {
    CANONICAL_NAMES
        .iter()
        .find(|rule| rule.aliases.iter().any(|a| label.contains(a)))
        .map_or_else(|| label.to_string(), |rule| rule.canonical.to_string())
}
