pub mod query;
pub mod record;

pub use query::FeedQuery;
pub use record::EarthquakeRecord;
