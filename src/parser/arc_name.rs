//! Arc name matching.
//!
//! Arc names in the overview sheet, the per-arc file names, and the summary
//! and saga files drift apart in small ways: status markers, curly versus
//! straight apostrophes, and plural/singular forms. Lookups go through the
//! ordered [`STRATEGIES`] list and take the first candidate that resolves.

use super::get_regex;
use crate::constants::one_pace::APOSTROPHE_CHARS;
use regex::Regex;
use std::sync::OnceLock;

/// A way of deriving a lookup candidate from an arc name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStrategy {
    /// Name with its `(TBR)`/`(WIP)` marker removed.
    Exact,
    /// As `Exact`, with apostrophe-like characters removed.
    WithoutApostrophes,
    /// As `WithoutApostrophes`, with one trailing `s` removed.
    Singular,
}

pub const STRATEGIES: [NameStrategy; 3] = [
    NameStrategy::Exact,
    NameStrategy::WithoutApostrophes,
    NameStrategy::Singular,
];

impl NameStrategy {
    /// Candidate for `name`, or `None` when the strategy does not apply.
    #[must_use]
    pub fn apply(self, name: &str) -> Option<String> {
        let base = strip_status_marker(name);
        match self {
            Self::Exact => Some(base.to_string()),
            Self::WithoutApostrophes => Some(remove_apostrophes(base)),
            Self::Singular => remove_apostrophes(base)
                .strip_suffix('s')
                .map(ToString::to_string),
        }
    }
}

/// All distinct candidates for `name`, in strategy order.
#[must_use]
pub fn candidates(name: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(STRATEGIES.len());
    for candidate in STRATEGIES.iter().filter_map(|s| s.apply(name)) {
        if !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out
}

/// Runs `lookup` over the candidates of `name` and returns the first hit.
pub fn resolve<T, F>(name: &str, mut lookup: F) -> Option<T>
where
    F: FnMut(&str) -> Option<T>,
{
    candidates(name).iter().find_map(|c| lookup(c))
}

/// Drops a trailing `(TBR)` or `(WIP)` status marker.
#[must_use]
pub fn strip_status_marker(name: &str) -> &str {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = get_regex(&RE, r"\s*\((?:TBR|WIP)\)\s*$");
    re.find(name).map_or(name, |m| &name[..m.start()])
}

/// Drops a trailing `(TBR)` marker only; `(WIP)` stays part of the title.
#[must_use]
pub fn strip_tbr_marker(name: &str) -> &str {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = get_regex(&RE, r"\s*\(TBR\)\s*$");
    re.find(name).map_or(name, |m| &name[..m.start()])
}

fn remove_apostrophes(name: &str) -> String {
    name.chars()
        .filter(|c| !APOSTROPHE_CHARS.contains(c))
        .collect()
}
