use crate::feed::EarthquakeRecord;
use crate::prelude::QuakeError;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct FeedDocument {
    features: Vec<Value>,
}

#[derive(Deserialize)]
struct Feature {
    properties: Properties,
}

/// The only four properties consumed; everything else in the feature is ignored.
#[derive(Deserialize)]
struct Properties {
    mag: f64,
    place: String,
    time: i64,
    url: String,
}

impl From<Properties> for EarthquakeRecord {
    fn from(props: Properties) -> Self {
        EarthquakeRecord::new(props.mag, props.place, props.time, props.url)
    }
}

/// Outcome of walking a feed document.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// The text was empty; no parse was attempted.
    NoInput,
    /// Every feature produced a record. May be empty when `features` is `[]`.
    Complete(Vec<EarthquakeRecord>),
    /// The feature at `failed_at` was unusable; `records` holds the ones before it.
    Partial {
        records: Vec<EarthquakeRecord>,
        failed_at: usize,
        error: QuakeError,
    },
    /// The document is not a JSON object with a `features` array.
    Malformed(QuakeError),
}

impl Extraction {
    pub fn records(&self) -> &[EarthquakeRecord] {
        match self {
            Extraction::Complete(records) | Extraction::Partial { records, .. } => records,
            Extraction::NoInput | Extraction::Malformed(_) => &[],
        }
    }

    pub fn into_records(self) -> Vec<EarthquakeRecord> {
        match self {
            Extraction::Complete(records) | Extraction::Partial { records, .. } => records,
            Extraction::NoInput | Extraction::Malformed(_) => Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Extraction::Complete(_))
    }

    pub fn error(&self) -> Option<&QuakeError> {
        match self {
            Extraction::Partial { error, .. } | Extraction::Malformed(error) => Some(error),
            Extraction::NoInput | Extraction::Complete(_) => None,
        }
    }
}

/// Converts feed text into records, preserving feature order.
///
/// Stops at the first feature that lacks one of `mag`, `place`, `time`, `url`
/// (or carries the wrong type) and keeps what was built up to that point.
pub fn extract_records(json: &str) -> Extraction {
    if json.trim().is_empty() {
        return Extraction::NoInput;
    }

    let document: FeedDocument = match serde_json::from_str(json) {
        Ok(document) => document,
        Err(err) => return Extraction::Malformed(QuakeError::MalformedResponse(err.to_string())),
    };

    let mut records: Vec<EarthquakeRecord> = Vec::with_capacity(document.features.len());
    for (index, value) in document.features.into_iter().enumerate() {
        match serde_json::from_value::<Feature>(value) {
            Ok(feature) => records.push(feature.properties.into()),
            Err(err) => {
                return Extraction::Partial {
                    records,
                    failed_at: index,
                    error: QuakeError::MalformedResponse(format!("feature {index}: {err}")),
                }
            }
        }
    }

    Extraction::Complete(records)
}
