use crate::model::error::Error;
use crate::model::error::task::TaskError;
use std::sync::atomic::{AtomicBool, Ordering};

/// Holds the `Syncing` flag for the duration of one cycle.
pub struct SyncGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SyncGuard<'a> {
    pub fn acquire(flag: &'a AtomicBool) -> Result<Self, Error> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| TaskError::IllegalRunState)?;
        Ok(Self { flag })
    }
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
