/// Failures raised along the fetch-and-parse pipeline.
///
/// None of these abort a load: the loader logs them and degrades to an
/// empty or partial record list.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuakeError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("network failure: {0}")]
    NetworkFailure(String),
    #[error("unexpected HTTP status: {0}")]
    UnexpectedStatus(u16),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

pub type QuakeResult<T> = Result<T, QuakeError>;

/// Anything that can turn a request URL into raw feed text.
///
/// Implementations are called from a blocking worker, never from the
/// async caller directly.
pub trait FeedSource: Send + Sync {
    fn fetch(&self, url: &str) -> QuakeResult<String>;
}
