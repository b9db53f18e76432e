//! Normalization of the episode/chapter range cells found in One Pace CSVs.

use super::get_regex;
use regex::Regex;
use std::sync::OnceLock;

/// Cleans a raw CSV range cell.
///
/// Collapses whitespace (including embedded newlines), drops `Ch.`/`Ep.`
/// prefixes at the start of the cell or of a comma-separated item, then
/// applies [`normalize_range`].
#[must_use]
pub fn clean_field(text: &str) -> String {
    static PREFIX: OnceLock<Regex> = OnceLock::new();

    if text.trim().is_empty() {
        return String::new();
    }

    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    // Each prefix only counts at the start or right after ", ".
    let prefix = get_regex(&PREFIX, r"(^|,\s)(?:Ch|Ep)\.\s*");
    let stripped = prefix.replace_all(&collapsed, "$1");

    normalize_range(&stripped).trim().to_string()
}

/// Gives ranges consistent spacing: `"40-41,42"` becomes `"40 - 41, 42"`.
///
/// Only hyphens with a digit on both sides are touched.
#[must_use]
pub fn normalize_range(text: &str) -> String {
    static COMMA: OnceLock<Regex> = OnceLock::new();
    static HYPHEN: OnceLock<Regex> = OnceLock::new();

    if text.is_empty() {
        return String::new();
    }

    let comma = get_regex(&COMMA, r",\s*");
    let hyphen = get_regex(&HYPHEN, r"(\d)\s*-\s*(\d)");

    let text = comma.replace_all(text, ", ");
    hyphen.replace_all(&text, "$1 - $2").into_owned()
}

/// Every unsigned integer embedded in `text`, in order.
#[must_use]
pub fn extract_numbers(text: &str) -> Vec<u32> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let digits = get_regex(&DIGITS, r"\d+");

    digits
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// Overall span of a set of range strings as `"min - max"`.
///
/// Returns `None` when no numbers are found, and a single value when the
/// span covers one number.
pub fn span<'a, I>(ranges: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let numbers: Vec<u32> = ranges.into_iter().flat_map(extract_numbers).collect();
    let min = numbers.iter().min()?;
    let max = numbers.iter().max()?;

    if min == max {
        Some(min.to_string())
    } else {
        Some(format!("{min} - {max}"))
    }
}
