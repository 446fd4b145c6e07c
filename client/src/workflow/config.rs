use anyhow::Context;
use quakecore::feed::FeedQuery;
use quakecore::net::FetchTimeouts;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Where to load records from, and how long to wait for them.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Raw request URL; when set, `query` is ignored.
    pub url: Option<String>,
    pub query: FeedQuery,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        let timeouts = FetchTimeouts::default();
        Self {
            url: None,
            query: FeedQuery::default(),
            connect_timeout_ms: timeouts.connect.as_millis() as u64,
            read_timeout_ms: timeouts.read.as_millis() as u64,
        }
    }
}

impl FeedConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading feed config {}", path_ref.display()))?;
        let config: FeedConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing feed config {}", path_ref.display()))?;
        config
            .validate()
            .with_context(|| format!("validating feed config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Rejects timeouts that would fail every request immediately.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.connect_timeout_ms == 0 {
            anyhow::bail!("connect_timeout_ms must be greater than zero");
        }
        if self.read_timeout_ms == 0 {
            anyhow::bail!("read_timeout_ms must be greater than zero");
        }
        Ok(())
    }

    pub fn from_args(
        url: Option<String>,
        min_magnitude: f64,
        limit: u32,
        order_by: String,
    ) -> Self {
        Self {
            url,
            query: FeedQuery {
                min_magnitude,
                limit,
                order_by,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn request_url(&self) -> anyhow::Result<String> {
        match &self.url {
            Some(url) => Ok(url.clone()),
            None => self.query.to_url().context("building feed request URL"),
        }
    }

    pub fn timeouts(&self) -> FetchTimeouts {
        FetchTimeouts {
            connect: Duration::from_millis(self.connect_timeout_ms),
            read: Duration::from_millis(self.read_timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_builds_query_url() {
        let cfg = FeedConfig::from_args(None, 4.5, 20, "magnitude".into());
        assert_eq!(
            cfg.request_url().unwrap(),
            "https://earthquake.usgs.gov/fdsnws/event/1/query?format=geojson&orderby=magnitude&minmag=4.5&limit=20"
        );
        assert_eq!(cfg.timeouts(), FetchTimeouts::default());
    }

    #[test]
    fn explicit_url_wins_over_query() {
        let cfg = FeedConfig::from_args(
            Some("http://localhost:8080/feed.json".into()),
            6.0,
            10,
            "time".into(),
        );
        assert_eq!(cfg.request_url().unwrap(), "http://localhost:8080/feed.json");
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"query:\n  min_magnitude: 5.5\n  limit: 3\nread_timeout_ms: 2500\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = FeedConfig::load(&path).unwrap();
        assert_eq!(cfg.query.min_magnitude, 5.5);
        assert_eq!(cfg.query.limit, 3);
        assert_eq!(cfg.query.format, "geojson");
        assert_eq!(cfg.timeouts().read, Duration::from_millis(2500));
        assert_eq!(cfg.timeouts().connect, Duration::from_millis(15_000));
    }

    #[test]
    fn config_load_reports_missing_file() {
        let err = FeedConfig::load("/nonexistent/quakereport.yaml").unwrap_err();
        assert!(err.to_string().contains("reading feed config"));
    }

    #[test]
    fn config_load_rejects_zero_timeouts() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"connect_timeout_ms: 0\n").unwrap();
        let path = temp.into_temp_path();
        let err = FeedConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("connect_timeout_ms"));

        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"read_timeout_ms: 0\n").unwrap();
        let path = temp.into_temp_path();
        let err = FeedConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("read_timeout_ms"));
    }
}
