pub mod traits;
pub mod http;

pub use traits::FeedSource;
pub use http::HttpFeedSource;
