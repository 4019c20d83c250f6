use super::FeedEntry;

/// Result of one feed fetch. Transient trouble is `NoData`, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Entries {
        entries: Vec<FeedEntry>,
        newest: String,
    },
    NoData {
        reason: String,
    },
}

impl FetchOutcome {
    /// Build from a parsed entry list; an empty list is `NoData`.
    pub fn from_entries(entries: Vec<FeedEntry>) -> Self {
        match entries.first() {
            Some(first) => {
                let newest = first.identifier().to_string();
                Self::Entries { entries, newest }
            }
            None => Self::NoData {
                reason: "feed contained no entries".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushReason {
    FirstRun,
    NewContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoData,
    Unchanged,
}

/// What the novelty check decided for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Push {
        reason: PushReason,
        entries: Vec<FeedEntry>,
    },
    Skip(SkipReason),
}

/// Delivery results that are handled locally rather than propagated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { sent: usize },
    ConfigError(String),
    AuthFailed(String),
}
