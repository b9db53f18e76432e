use super::get_regex;
use crate::constants::scan::{SEASON_PREFIX, SPECIALS_FOLDER, UNKNOWN_YEAR};
use regex::Regex;
use std::sync::OnceLock;

/// Identity parsed from a media folder such as
/// `The Matrix (1999) {tmdb-603}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderInfo {
    pub db_id: u64,
    pub title: String,
    pub release_year: String,
}

/// Season folder classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonFolder {
    Season(u32),
    /// `Season <text>` that is not a number.
    Invalid,
    /// Not a season folder at all (extras, featurettes).
    Other,
}

/// Parses a media folder name; `None` when it carries no `{tmdb-N}`/`{tvdb-N}` tag.
#[must_use]
pub fn parse_media_folder(folder: &str) -> Option<FolderInfo> {
    static ID: OnceLock<Regex> = OnceLock::new();
    static YEAR: OnceLock<Regex> = OnceLock::new();

    let id_re = get_regex(&ID, r"\{t[vm]db-([0-9]+)\}");
    let year_re = get_regex(&YEAR, r"\(([0-9]{4})\)");

    let caps = id_re.captures(folder)?;
    let id_token = caps.get(0)?.as_str();
    let db_id = caps.get(1)?.as_str().parse().ok()?;

    let (year_token, release_year) = match year_re.captures(folder) {
        Some(year) => (year[0].to_string(), year[1].to_string()),
        None => (format!("({UNKNOWN_YEAR})"), UNKNOWN_YEAR.to_string()),
    };

    let title: String = folder
        .replace(id_token, "")
        .replace(&year_token, "")
        .trim()
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '\''))
        .collect();

    Some(FolderInfo {
        db_id,
        title,
        release_year,
    })
}

#[must_use]
pub fn parse_season_folder(folder: &str) -> SeasonFolder {
    let lower = folder.to_lowercase();

    if lower == SPECIALS_FOLDER {
        return SeasonFolder::Season(0);
    }

    match lower.strip_prefix(SEASON_PREFIX) {
        Some(number) => number
            .trim()
            .parse()
            .map_or(SeasonFolder::Invalid, SeasonFolder::Season),
        None => SeasonFolder::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_movie_folder() {
        let info = parse_media_folder("The Matrix (1999) {tmdb-603}").unwrap();
        assert_eq!(info.db_id, 603);
        assert_eq!(info.title, "The Matrix");
        assert_eq!(info.release_year, "1999");
    }

    #[test]
    fn test_parse_show_folder_tvdb() {
        let info = parse_media_folder("Bob's Burgers (2011) {tvdb-194031}").unwrap();
        assert_eq!(info.db_id, 194_031);
        assert_eq!(info.title, "Bobs Burgers");
        assert_eq!(info.release_year, "2011");
    }

    #[test]
    fn test_parse_folder_without_year() {
        let info = parse_media_folder("Cosmos {tmdb-1234}").unwrap();
        assert_eq!(info.title, "Cosmos");
        assert_eq!(info.release_year, "Unknown");
    }

    #[test]
    fn test_parse_folder_extra_parentheses() {
        let info = parse_media_folder("Godzilla (Shin) (2016) {tmdb-315011}").unwrap();
        assert_eq!(info.title, "Godzilla Shin");
        assert_eq!(info.release_year, "2016");
    }

    #[test]
    fn test_parse_folder_without_id() {
        assert!(parse_media_folder("Home Videos (2001)").is_none());
        assert!(parse_media_folder("Movie {imdb-tt0133093}").is_none());
    }

    #[test]
    fn test_parse_season_folder() {
        assert_eq!(parse_season_folder("Season 1"), SeasonFolder::Season(1));
        assert_eq!(parse_season_folder("season 12"), SeasonFolder::Season(12));
        assert_eq!(parse_season_folder("Season 01"), SeasonFolder::Season(1));
        assert_eq!(parse_season_folder("Specials"), SeasonFolder::Season(0));
        assert_eq!(parse_season_folder("Season Finale"), SeasonFolder::Invalid);
        assert_eq!(parse_season_folder("Featurettes"), SeasonFolder::Other);
    }
}
