use crate::errors::PushResult;

/// Persistence for the novelty pointer: the link of the newest entry pushed.
#[cfg_attr(test, mockall::automock)]
pub trait PointerStore {
    /// `Ok(None)` means no previous run. `Err` means the pointer exists but is unreadable.
    fn load(&self) -> PushResult<Option<String>>;
    fn save(&self, link: &str) -> PushResult<()>;
    /// Forget the pointer. Returns whether anything was removed.
    fn clear(&self) -> PushResult<bool>;
}
