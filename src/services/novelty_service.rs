use crate::domain::{Decision, FetchOutcome, PushReason, SkipReason};
use crate::errors::PushResult;
use crate::sources::FeedSource;
use crate::storage::PointerStore;

/// Decides whether the feed has new content since the last recorded run.
///
/// Only the newest entry's link is remembered. A feed that reorders or
/// backfills entries between runs can therefore cause a missed or repeated push.
pub struct NoveltyTracker<S: FeedSource, P: PointerStore> {
    source: S,
    store: P,
}

impl<S: FeedSource, P: PointerStore> NoveltyTracker<S, P> {
    pub fn new(source: S, store: P) -> Self {
        Self { source, store }
    }

    /// Fetch, compare with the stored pointer, and record the new pointer on push.
    pub fn decide(&self) -> PushResult<Decision> {
        self.evaluate(true)
    }

    /// Same decision as `decide` but never writes the pointer.
    pub fn peek(&self) -> PushResult<Decision> {
        self.evaluate(false)
    }

    /// The pointer from the previous run, treating an unreadable one as absent.
    fn previous_pointer(&self) -> Option<String> {
        match self.store.load() {
            Ok(pointer) => pointer,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read last pushed link, treating as first run");
                None
            }
        }
    }

    fn evaluate(&self, commit: bool) -> PushResult<Decision> {
        let previous = self.previous_pointer();

        let (entries, newest) = match self.source.fetch() {
            FetchOutcome::Entries { entries, newest } => (entries, newest),
            FetchOutcome::NoData { .. } => return Ok(Decision::Skip(SkipReason::NoData)),
        };

        let reason = match previous.as_deref() {
            None => PushReason::FirstRun,
            Some(last) if last != newest => PushReason::NewContent,
            Some(_) => {
                tracing::info!("No new entries since last run, skipping push");
                return Ok(Decision::Skip(SkipReason::Unchanged));
            }
        };

        if commit {
            self.store.save(&newest)?;
        }

        match reason {
            PushReason::FirstRun => tracing::info!("First run, pushing latest entries"),
            PushReason::NewContent => tracing::info!(newest = %newest, "New entries detected, pushing"),
        }

        Ok(Decision::Push { reason, entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeedEntry;
    use crate::errors::PushError;
    use crate::sources::traits::MockFeedSource;
    use crate::storage::traits::MockPointerStore;
    use crate::storage::FilePointerStore;
    use mockall::predicate::eq;
    use tempfile::TempDir;

    fn entries(links: &[&str]) -> Vec<FeedEntry> {
        links
            .iter()
            .map(|l| FeedEntry::new(l.to_string(), format!("title {}", l)))
            .collect()
    }

    fn source_returning(links: &'static [&'static str]) -> MockFeedSource {
        let mut source = MockFeedSource::new();
        source
            .expect_fetch()
            .returning(move || FetchOutcome::from_entries(entries(links)));
        source
    }

    fn no_data_source() -> MockFeedSource {
        let mut source = MockFeedSource::new();
        source.expect_fetch().returning(|| FetchOutcome::NoData {
            reason: "timed out".to_string(),
        });
        source
    }

    #[test]
    fn test_first_run_pushes_and_records_pointer() {
        let dir = TempDir::new().unwrap();
        let store = FilePointerStore::new(dir.path().join("last_link.txt"));
        let tracker = NoveltyTracker::new(source_returning(&["https://x/2", "https://x/1"]), store.clone());

        let decision = tracker.decide().unwrap();

        assert_eq!(
            decision,
            Decision::Push {
                reason: PushReason::FirstRun,
                entries: entries(&["https://x/2", "https://x/1"]),
            }
        );
        assert_eq!(store.load().unwrap(), Some("https://x/2".to_string()));
    }

    #[test]
    fn test_unchanged_link_skips_without_writing() {
        let mut store = MockPointerStore::new();
        store
            .expect_load()
            .returning(|| Ok(Some("https://x/1".to_string())));
        store.expect_save().never();

        let tracker = NoveltyTracker::new(source_returning(&["https://x/1"]), store);

        assert_eq!(tracker.decide().unwrap(), Decision::Skip(SkipReason::Unchanged));
    }

    #[test]
    fn test_changed_link_pushes_and_overwrites() {
        let mut store = MockPointerStore::new();
        store
            .expect_load()
            .returning(|| Ok(Some("https://x/1".to_string())));
        store
            .expect_save()
            .with(eq("https://x/2"))
            .times(1)
            .returning(|_| Ok(()));

        let tracker = NoveltyTracker::new(source_returning(&["https://x/2", "https://x/1"]), store);
        let decision = tracker.decide().unwrap();

        assert!(matches!(
            decision,
            Decision::Push {
                reason: PushReason::NewContent,
                ..
            }
        ));
    }

    #[test]
    fn test_two_consecutive_runs_push_once() {
        let dir = TempDir::new().unwrap();
        let store = FilePointerStore::new(dir.path().join("last_link.txt"));
        let tracker = NoveltyTracker::new(source_returning(&["https://x/1"]), store.clone());

        assert!(matches!(tracker.decide().unwrap(), Decision::Push { .. }));
        assert_eq!(tracker.decide().unwrap(), Decision::Skip(SkipReason::Unchanged));
        assert_eq!(store.load().unwrap(), Some("https://x/1".to_string()));
    }

    #[test]
    fn test_unreadable_pointer_degrades_to_first_run() {
        let mut store = MockPointerStore::new();
        store
            .expect_load()
            .returning(|| Err(PushError::State("corrupt".to_string())));
        store
            .expect_save()
            .with(eq("https://x/1"))
            .times(1)
            .returning(|_| Ok(()));

        let tracker = NoveltyTracker::new(source_returning(&["https://x/1"]), store);

        assert!(matches!(
            tracker.decide().unwrap(),
            Decision::Push {
                reason: PushReason::FirstRun,
                ..
            }
        ));
    }

    #[test]
    fn test_no_data_skips_in_any_state() {
        let mut store = MockPointerStore::new();
        store.expect_load().returning(|| Ok(None));
        store.expect_save().never();

        let tracker = NoveltyTracker::new(no_data_source(), store);
        assert_eq!(tracker.decide().unwrap(), Decision::Skip(SkipReason::NoData));

        let mut store = MockPointerStore::new();
        store
            .expect_load()
            .returning(|| Ok(Some("https://x/1".to_string())));
        store.expect_save().never();

        let tracker = NoveltyTracker::new(no_data_source(), store);
        assert_eq!(tracker.decide().unwrap(), Decision::Skip(SkipReason::NoData));
    }

    #[test]
    fn test_peek_never_writes() {
        let mut store = MockPointerStore::new();
        store.expect_load().returning(|| Ok(None));
        store.expect_save().never();

        let tracker = NoveltyTracker::new(source_returning(&["https://x/1"]), store);
        assert!(matches!(tracker.peek().unwrap(), Decision::Push { .. }));
    }

    #[test]
    fn test_save_failure_propagates() {
        let mut store = MockPointerStore::new();
        store.expect_load().returning(|| Ok(None));
        store.expect_save().returning(|_| {
            Err(PushError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        });

        let tracker = NoveltyTracker::new(source_returning(&["https://x/1"]), store);
        assert!(matches!(tracker.decide(), Err(PushError::Io(_))));
    }
}
