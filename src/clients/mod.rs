pub mod github;
pub mod plex;
pub mod tmdb;

pub use github::{DispatchClient, DispatchError};
pub use plex::PlexClient;
pub use tmdb::TmdbClient;
