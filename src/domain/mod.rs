pub mod entry;
pub mod outcome;
pub mod recipients;

pub use entry::FeedEntry;
pub use outcome::{Decision, DeliveryOutcome, FetchOutcome, PushReason, SkipReason};
pub use recipients::RecipientList;
