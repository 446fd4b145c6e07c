use crate::prelude::{QuakeError, QuakeResult};
use reqwest::Url;
use serde::{Deserialize, Serialize};

pub const USGS_EVENT_ENDPOINT: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";

/// Parameters of a seismic-event query against an FDSN event service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedQuery {
    pub endpoint: String,
    pub format: String,
    pub order_by: String,
    pub min_magnitude: f64,
    pub limit: u32,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            endpoint: USGS_EVENT_ENDPOINT.to_string(),
            format: "geojson".to_string(),
            order_by: "time".to_string(),
            min_magnitude: 6.0,
            limit: 10,
        }
    }
}

impl FeedQuery {
    /// Builds the absolute request URL.
    pub fn to_url(&self) -> QuakeResult<String> {
        let mut url = parse_absolute_url(&self.endpoint)?;
        url.query_pairs_mut()
            .append_pair("format", &self.format)
            .append_pair("orderby", &self.order_by)
            .append_pair("minmag", &self.min_magnitude.to_string())
            .append_pair("limit", &self.limit.to_string());
        Ok(url.into())
    }
}

/// Accepts only absolute `http`/`https` URLs with a host.
pub fn parse_absolute_url(raw: &str) -> QuakeResult<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|err| QuakeError::MalformedInput(format!("{raw}: {err}")))?;
    if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() {
        Ok(url)
    } else {
        Err(QuakeError::MalformedInput(format!(
            "{raw}: unsupported scheme '{}' or missing host",
            url.scheme()
        )))
    }
}
