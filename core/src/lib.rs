//! Fetch-and-parse core for the Rust Quake Report client.
//!
//! The modules follow the load pipeline: a [`feed::FeedQuery`] names the
//! request, [`net::HttpFetcher`] performs it, [`parse::extract_records`]
//! turns the body into [`feed::EarthquakeRecord`]s, and [`loader`] runs the
//! whole cycle off the caller's context before handing the list back.

pub mod feed;
pub mod listing;
pub mod loader;
pub mod net;
pub mod parse;
pub mod prelude;
pub mod telemetry;

pub use feed::{EarthquakeRecord, FeedQuery};
pub use listing::QuakeList;
pub use loader::{load_records, FeedLoader, LoadReport};
pub use prelude::{FeedSource, QuakeError, QuakeResult};
