use crate::workflow::config::FeedConfig;
use log::info;
use quakecore::{FeedLoader, QuakeList};
use std::sync::{Arc, RwLock};

pub struct WorkflowResult {
    pub record_count: usize,
    pub complete: bool,
}

/// Performs loads against one request URL and swaps the result into a list.
#[derive(Clone)]
pub struct Runner {
    loader: Arc<FeedLoader>,
    url: String,
}

impl Runner {
    pub fn new(config: &FeedConfig) -> anyhow::Result<Self> {
        let url = config.request_url()?;
        let loader = FeedLoader::http(config.timeouts());
        Ok(Self::with_loader(Arc::new(loader), url))
    }

    pub fn with_loader(loader: Arc<FeedLoader>, url: impl Into<String>) -> Self {
        Self {
            loader,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Runs one load and replaces the whole list with its records.
    ///
    /// The list is only touched after the load has finished.
    pub async fn refresh(&self, list: &RwLock<QuakeList>) -> WorkflowResult {
        let report = self.loader.load(&self.url).await;
        let complete = report.outcome.is_success();
        let records = report.into_records();
        let record_count = records.len();

        match list.write() {
            Ok(mut guard) => guard.replace_all(records),
            Err(poisoned) => poisoned.into_inner().replace_all(records),
        }

        let metrics = self.loader.metrics();
        info!(
            "refresh -> {} records (complete: {}, loads {}, failures {})",
            record_count, complete, metrics.loads, metrics.failures
        );

        WorkflowResult {
            record_count,
            complete,
        }
    }
}
