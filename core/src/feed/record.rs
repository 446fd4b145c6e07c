use serde::Serialize;

/// One seismic event taken from a feed.
///
/// Fields are fixed at construction; there are no setters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarthquakeRecord {
    magnitude: f64,
    location: String,
    time_epoch_millis: i64,
    detail_url: String,
}

impl EarthquakeRecord {
    pub fn new(
        magnitude: f64,
        location: impl Into<String>,
        time_epoch_millis: i64,
        detail_url: impl Into<String>,
    ) -> Self {
        Self {
            magnitude,
            location: location.into(),
            time_epoch_millis,
            detail_url: detail_url.into(),
        }
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Human-readable place description, e.g. `"10km SW of Testville"`.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Milliseconds since the Unix epoch, UTC.
    pub fn time_epoch_millis(&self) -> i64 {
        self.time_epoch_millis
    }

    pub fn detail_url(&self) -> &str {
        &self.detail_url
    }
}
