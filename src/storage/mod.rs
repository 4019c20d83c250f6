pub mod traits;
pub mod file;

pub use traits::PointerStore;
pub use file::FilePointerStore;
