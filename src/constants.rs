pub const YAML_EXTENSIONS: &[&str] = &["yml", "yaml"];

pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls"];

pub const SCHEMA_HEADER: &str =
    "# yaml-language-server: $schema=https://json-schema.org/draft-07/schema\n";

pub mod one_pace {

    pub const OVERVIEW_FILE: &str = "Arc Overview";

    pub const OVERVIEW_TOTALS_ROW: &str = "Totals";

    pub const APOSTROPHE_CHARS: &[char] = &['\'', '\u{2019}', '`'];

    /// Titles containing this marker have not been released yet.
    pub const UNRELEASED_MARKER: &str = "Forward";

    pub const TITLE_COLUMN: &str = "One Pace Episode";

    pub const CHAPTERS_COLUMN: &str = "Chapters";

    pub const EPISODES_COLUMN: &str = "Episodes";

    pub const OVERVIEW_ARC_COLUMN: &str = "Arcs";

    pub const OVERVIEW_EPISODES_COLUMN: &str = "Anime Episodes";

    pub const OVERVIEW_CHAPTERS_COLUMN: &str = "Manga Chapters";
}

pub mod scan {

    pub const UNKNOWN_YEAR: &str = "Unknown";

    pub const SPECIALS_FOLDER: &str = "specials";

    pub const SEASON_PREFIX: &str = "season ";
}

pub mod reports {

    /// Digit runs in sort keys are padded to this width.
    pub const SORT_PAD_WIDTH: usize = 6;
}
