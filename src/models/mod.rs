pub mod media;
pub mod one_pace;
pub mod scan;

pub use media::{MediaEntry, MediaKind, MetadataDocument, ReleaseYear, SeasonEntry};
pub use one_pace::{ArcSeason, EpisodeRecord, ShowDocument, ShowEntry};
pub use scan::{ScanPayload, ScannedMovie, ScannedSeason, ScannedShow};
