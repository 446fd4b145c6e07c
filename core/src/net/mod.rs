pub mod fetcher;

pub use fetcher::{FetchTimeouts, HttpFetcher};
