pub mod arc_name;
pub mod folder;
pub mod range;
pub mod title;

use regex::Regex;
use std::sync::OnceLock;

pub(crate) fn get_regex(re: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    re.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern defined in code"))
}
