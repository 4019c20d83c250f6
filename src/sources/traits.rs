use crate::domain::FetchOutcome;

#[cfg_attr(test, mockall::automock)]
pub trait FeedSource {
    /// Fetch the feed. Network, status and parse failures come back as
    /// `FetchOutcome::NoData` so a flaky upstream never aborts the run.
    fn fetch(&self) -> FetchOutcome;
}
