pub mod novelty_service;
pub mod format_service;
pub mod delivery_service;
pub mod pipeline;

pub use novelty_service::NoveltyTracker;
pub use format_service::ContentFormatter;
pub use delivery_service::{DeliveryAgent, MailSession, MailTransport, SmtpMailTransport};
pub use pipeline::{PushPipeline, RunReport};
