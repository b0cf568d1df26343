//! Shared page target cell.
//!
//! One writable cell the UI layer writes and the turn scheduler and scene
//! composer read. A monotonic epoch stamps every accepted write so pollers
//! on the host side can detect changes without a callback registry.

use std::fmt;

/// A rejected page target write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStoreError {
    /// Requested target is past the back cover position.
    OutOfRange { requested: usize, max: usize },
}

impl fmt::Display for PageStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageStoreError::OutOfRange { requested, max } => {
                write!(f, "page {} out of range, book ends at {}", requested, max)
            }
        }
    }
}

impl std::error::Error for PageStoreError {}

/// Target page shared between the UI surface and the animation side.
///
/// A target of `n` means the first `n` sheets lie turned to the left.
/// `page_count` itself is a valid target: every sheet turned, back cover
/// facing the reader.
#[derive(Debug, Clone)]
pub struct PageStore {
    page_count: usize,
    target: usize,
    epoch: u64,
}

impl PageStore {
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count,
            target: 0,
            epoch: 0,
        }
    }

    /// Currently requested page.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Largest valid target (the back cover position).
    pub fn max_target(&self) -> usize {
        self.page_count
    }

    /// Bumped on every accepted write that changes the target.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Request a page. Returns whether the target actually moved; writing
    /// the current value is a no-op that leaves the epoch untouched.
    pub fn set_target(&mut self, page: usize) -> Result<bool, PageStoreError> {
        if page > self.page_count {
            return Err(PageStoreError::OutOfRange {
                requested: page,
                max: self.page_count,
            });
        }
        if page == self.target {
            return Ok(false);
        }
        self.target = page;
        self.epoch += 1;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_front_cover() {
        let store = PageStore::new(9);
        assert_eq!(store.target(), 0);
        assert_eq!(store.epoch(), 0);
        assert_eq!(store.max_target(), 9);
    }

    #[test]
    fn test_accepted_write_bumps_epoch() {
        let mut store = PageStore::new(9);
        assert_eq!(store.set_target(4), Ok(true));
        assert_eq!(store.target(), 4);
        assert_eq!(store.epoch(), 1);

        // Back cover position is a valid target.
        assert_eq!(store.set_target(9), Ok(true));
        assert_eq!(store.epoch(), 2);
    }

    #[test]
    fn test_rewriting_same_target_is_a_noop() {
        let mut store = PageStore::new(9);
        store.set_target(4).unwrap();
        assert_eq!(store.set_target(4), Ok(false));
        assert_eq!(store.epoch(), 1, "no-op writes must not stamp an epoch");
    }

    #[test]
    fn test_out_of_range_write_is_rejected() {
        let mut store = PageStore::new(9);
        store.set_target(4).unwrap();
        let err = store.set_target(10).unwrap_err();
        assert_eq!(
            err,
            PageStoreError::OutOfRange {
                requested: 10,
                max: 9
            }
        );
        assert_eq!(store.target(), 4, "rejected write must not change state");
        assert_eq!(store.epoch(), 1);
    }
}
