use super::get_regex;
use crate::constants::reports::SORT_PAD_WIDTH;
use regex::Regex;
use std::sync::OnceLock;

const LEADING_ARTICLES: &[&str] = &["a ", "an ", "the "];

/// Formats a One Pace episode title.
///
/// `"Romance Dawn 01"` with range `"1 - 3"` becomes
/// `"Romance Dawn Pt. 1 (1 - 3)"`. Titles that are not `{arc} {n}` are kept
/// and only get the range appended.
#[must_use]
pub fn format_episode_title(raw_title: &str, arc_name: &str, anime_episodes: Option<&str>) -> String {
    let pattern = format!(r"^{}\s+(\d+)$", regex::escape(arc_name));
    let part = Regex::new(&pattern)
        .ok()
        .and_then(|re| re.captures(raw_title))
        .and_then(|caps| caps.get(1)?.as_str().parse::<u32>().ok());

    let base = match part {
        Some(num) => format!("{arc_name} Pt. {num}"),
        None => raw_title.to_string(),
    };

    match anime_episodes.filter(|r| !r.is_empty()) {
        Some(range) => format!("{base} ({range})"),
        None => base,
    }
}

/// Title suitable for sorting: leading article removed, transliterated to ASCII.
#[must_use]
pub fn sort_title(title: &str) -> String {
    let lower = title.to_lowercase();
    let stripped = LEADING_ARTICLES
        .iter()
        .find(|article| lower.starts_with(*article))
        .and_then(|article| title.get(article.len()..))
        .unwrap_or(title);

    deunicode::deunicode(stripped)
}

/// Left-pads every digit run in `text` with zeros to at least `width` digits.
#[must_use]
pub fn zero_pad(text: &str, width: usize) -> String {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let digits = get_regex(&DIGITS, r"\d+");

    digits
        .replace_all(text, |caps: &regex::Captures| {
            format!("{:0>width$}", &caps[0], width = width)
        })
        .into_owned()
}

/// Key that orders media entries by title, numbers compared by value.
#[must_use]
pub fn sort_key(title: &str) -> String {
    zero_pad(&title.to_lowercase(), SORT_PAD_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_episode_title_with_range() {
        assert_eq!(
            format_episode_title("Romance Dawn 01", "Romance Dawn", Some("1 - 3")),
            "Romance Dawn Pt. 1 (1 - 3)"
        );
        assert_eq!(
            format_episode_title("Romance Dawn 02", "Romance Dawn", Some("4")),
            "Romance Dawn Pt. 2 (4)"
        );
    }

    #[test]
    fn test_format_episode_title_without_range() {
        assert_eq!(
            format_episode_title("Orange Town 10", "Orange Town", None),
            "Orange Town Pt. 10"
        );
        assert_eq!(
            format_episode_title("Orange Town 10", "Orange Town", Some("")),
            "Orange Town Pt. 10"
        );
    }

    #[test]
    fn test_format_episode_title_non_matching() {
        assert_eq!(
            format_episode_title("Episode of Nami", "Arlong Park", Some("31")),
            "Episode of Nami (31)"
        );
        assert_eq!(
            format_episode_title("Arlong Park 03 Extended", "Arlong Park", None),
            "Arlong Park 03 Extended"
        );
    }

    #[test]
    fn test_format_episode_title_escapes_arc_name() {
        assert_eq!(
            format_episode_title("Loguetown (WIP) 2", "Loguetown (WIP)", None),
            "Loguetown (WIP) Pt. 2"
        );
    }

    #[test]
    fn test_sort_title_strips_article() {
        assert_eq!(sort_title("The Lion King"), "Lion King");
        assert_eq!(sort_title("An American Tail"), "American Tail");
        assert_eq!(sort_title("A Quiet Place"), "Quiet Place");
        assert_eq!(sort_title("the thing"), "thing");
    }

    #[test]
    fn test_sort_title_no_article() {
        assert_eq!(sort_title("A24"), "A24");
        assert_eq!(sort_title("Theodore"), "Theodore");
        assert_eq!(sort_title("Amélie"), "Amelie");
    }

    #[test]
    fn test_zero_pad() {
        assert_eq!(zero_pad("Episode 7", 6), "Episode 000007");
        assert_eq!(zero_pad("Episode 12", 6), "Episode 000012");
        assert_eq!(zero_pad("1234567", 6), "1234567");
        assert!(zero_pad("Episode 7", 6) < zero_pad("Episode 12", 6));
    }

    #[test]
    fn test_sort_key_orders_numbers_by_value() {
        let mut titles = vec!["Ocean's 12", "ocean's 8", "Ocean's 11"];
        titles.sort_by_key(|t| sort_key(t));
        assert_eq!(titles, vec!["ocean's 8", "Ocean's 11", "Ocean's 12"]);
    }
}
