//! Runs one fetch-then-parse cycle off the caller's context.
//!
//! The blocking fetch and the parse execute together on tokio's blocking
//! pool; the caller awaits only the finished record list.

use crate::feed::EarthquakeRecord;
use crate::net::{FetchTimeouts, HttpFetcher};
use crate::parse::{extract_records, Extraction};
use crate::prelude::{FeedSource, QuakeError};
use crate::telemetry::{LoadMetrics, LogManager, MetricsSnapshot};
use std::sync::Arc;
use tokio::sync::Mutex;

/// How a single load ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The body arrived and was handed to the parser.
    Parsed(Extraction),
    /// The fetch itself failed; nothing was parsed.
    FetchFailed(QuakeError),
    /// The background worker did not return a result.
    Aborted(String),
}

impl LoadOutcome {
    pub fn records(&self) -> &[EarthquakeRecord] {
        match self {
            LoadOutcome::Parsed(extraction) => extraction.records(),
            LoadOutcome::FetchFailed(_) | LoadOutcome::Aborted(_) => &[],
        }
    }

    pub fn into_records(self) -> Vec<EarthquakeRecord> {
        match self {
            LoadOutcome::Parsed(extraction) => extraction.into_records(),
            LoadOutcome::FetchFailed(_) | LoadOutcome::Aborted(_) => Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LoadOutcome::Parsed(extraction) if extraction.is_complete())
    }
}

/// Result of [`FeedLoader::load`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub url: String,
    pub outcome: LoadOutcome,
}

impl LoadReport {
    pub fn records(&self) -> &[EarthquakeRecord] {
        self.outcome.records()
    }

    pub fn into_records(self) -> Vec<EarthquakeRecord> {
        self.outcome.into_records()
    }
}

/// Fetches `url` through `source` and parses the body, logging any failure.
///
/// Never fails: the caller gets the parsed records, a partial prefix, or an
/// empty list.
pub async fn load_records(source: Arc<dyn FeedSource>, url: &str) -> Vec<EarthquakeRecord> {
    let logger = LogManager::new("loader");
    let outcome = execute(source, url.to_string()).await;
    log_outcome(&logger, url, &outcome);
    outcome.into_records()
}

/// Loader that allows only one load in flight at a time.
///
/// A load requested while another is running waits for it to finish.
pub struct FeedLoader {
    source: Arc<dyn FeedSource>,
    gate: Mutex<()>,
    metrics: LoadMetrics,
    logger: LogManager,
}

impl FeedLoader {
    pub fn new(source: Arc<dyn FeedSource>) -> Self {
        Self {
            source,
            gate: Mutex::new(()),
            metrics: LoadMetrics::new(),
            logger: LogManager::new("loader"),
        }
    }

    pub fn http(timeouts: FetchTimeouts) -> Self {
        Self::new(Arc::new(HttpFetcher::with_timeouts(timeouts)))
    }

    pub async fn load(&self, url: &str) -> LoadReport {
        let _guard = self.gate.lock().await;

        let outcome = execute(self.source.clone(), url.to_string()).await;
        log_outcome(&self.logger, url, &outcome);

        if !outcome.is_success() {
            self.metrics.record_failure();
        }
        self.metrics.record_load(outcome.records().len());

        LoadReport {
            url: url.to_string(),
            outcome,
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

async fn execute(source: Arc<dyn FeedSource>, url: String) -> LoadOutcome {
    let worker = tokio::task::spawn_blocking(move || match source.fetch(&url) {
        Ok(body) => LoadOutcome::Parsed(extract_records(&body)),
        Err(err) => LoadOutcome::FetchFailed(err),
    });

    match worker.await {
        Ok(outcome) => outcome,
        Err(err) => LoadOutcome::Aborted(err.to_string()),
    }
}

fn log_outcome(logger: &LogManager, url: &str, outcome: &LoadOutcome) {
    match outcome {
        LoadOutcome::Parsed(Extraction::Complete(records)) => {
            logger.record(&format!("loaded {} records from {}", records.len(), url));
        }
        LoadOutcome::Parsed(Extraction::NoInput) => {
            logger.warn(&format!("empty response from {url}"));
        }
        LoadOutcome::Parsed(Extraction::Partial {
            records,
            failed_at,
            error,
        }) => {
            logger.failure(
                &format!(
                    "problem parsing the earthquake results from {url}; kept {} records before feature {failed_at}",
                    records.len()
                ),
                error,
            );
        }
        LoadOutcome::Parsed(Extraction::Malformed(error)) => {
            logger.failure(&format!("problem parsing the earthquake results from {url}"), error);
        }
        LoadOutcome::FetchFailed(error) => {
            logger.failure(&format!("problem retrieving the earthquake results from {url}"), error);
        }
        LoadOutcome::Aborted(reason) => {
            logger.warn(&format!("load of {url} aborted: {reason}"));
        }
    }
}
