pub mod extract;

pub use extract::{extract_records, Extraction};
