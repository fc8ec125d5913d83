use crate::error::SearchError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared abort flag handed to a running lookup.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// `Err(SearchError::Cancelled)` once the token has been tripped.
    pub fn check(&self) -> Result<(), SearchError> {
        if self.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CancelToken;
    use crate::error::SearchError;

    #[test]
    fn clones_share_the_flag() {
        let token = CancelToken::new();
        let worker = token.clone();
        assert!(worker.check().is_ok());
        token.cancel();
        assert!(worker.is_cancelled());
        assert_eq!(worker.check(), Err(SearchError::Cancelled));
    }
}
