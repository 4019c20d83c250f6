use crate::domain::{Decision, DeliveryOutcome, SkipReason};
use crate::errors::PushResult;
use crate::services::delivery_service::{DeliveryAgent, MailTransport};
use crate::services::format_service::ContentFormatter;
use crate::services::novelty_service::NoveltyTracker;
use crate::sources::FeedSource;
use crate::storage::PointerStore;

/// How a single fetch-check-send cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    Skipped(SkipReason),
    Delivered(DeliveryOutcome),
    /// Dry run: the document that would have been sent
    Previewed(String),
}

pub struct PushPipeline<S: FeedSource, P: PointerStore, T: MailTransport> {
    tracker: NoveltyTracker<S, P>,
    formatter: ContentFormatter,
    delivery: DeliveryAgent<T>,
}

impl<S: FeedSource, P: PointerStore, T: MailTransport> PushPipeline<S, P, T> {
    pub fn new(
        tracker: NoveltyTracker<S, P>,
        formatter: ContentFormatter,
        delivery: DeliveryAgent<T>,
    ) -> Self {
        Self {
            tracker,
            formatter,
            delivery,
        }
    }

    /// Fetch, decide, format and send.
    pub fn run(&self) -> PushResult<RunReport> {
        let entries = match self.tracker.decide()? {
            Decision::Push { entries, .. } => entries,
            Decision::Skip(reason) => return Ok(RunReport::Skipped(reason)),
        };

        let fragment = self.formatter.format(&entries);
        let outcome = self.delivery.send(&fragment)?;
        Ok(RunReport::Delivered(outcome))
    }

    /// Decide and render without recording the pointer or sending mail.
    pub fn dry_run(&self) -> PushResult<RunReport> {
        let entries = match self.tracker.peek()? {
            Decision::Push { entries, .. } => entries,
            Decision::Skip(reason) => return Ok(RunReport::Skipped(reason)),
        };

        let fragment = self.formatter.format(&entries);
        Ok(RunReport::Previewed(ContentFormatter::document(&fragment)))
    }
}
