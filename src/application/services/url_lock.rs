//! Striped per-URL mutual exclusion.

use std::hash::{DefaultHasher, Hash, Hasher};
use tokio::sync::{Mutex, MutexGuard};

/// Default number of lock stripes.
pub const DEFAULT_STRIPES: usize = 256;

/// A fixed table of async mutexes indexed by a hash of the URL.
///
/// Two shortens of the same URL always contend on the same stripe, which
/// closes the window between the idempotency lookup and the save. Unrelated
/// URLs only serialise when they happen to share a stripe.
pub struct UrlLocks {
    stripes: Box<[Mutex<()>]>,
}

impl UrlLocks {
    /// Creates a table with `stripes` mutexes (at least one).
    pub fn new(stripes: usize) -> Self {
        let stripes = (0..stripes.max(1)).map(|_| Mutex::new(())).collect();
        Self { stripes }
    }

    /// Waits for exclusive access to `url`'s stripe.
    pub async fn lock(&self, url: &str) -> MutexGuard<'_, ()> {
        self.stripes[self.stripe_for(url)].lock().await
    }

    pub fn stripe_count(&self) -> usize {
        self.stripes.len()
    }

    fn stripe_for(&self, url: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        url.hash(&mut hasher);
        (hasher.finish() % self.stripes.len() as u64) as usize
    }
}

impl Default for UrlLocks {
    fn default() -> Self {
        Self::new(DEFAULT_STRIPES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_same_url_maps_to_same_stripe() {
        let locks = UrlLocks::new(64);
        let url = "https://example.com/a";
        assert_eq!(locks.stripe_for(url), locks.stripe_for(url));
        assert!(locks.stripe_for(url) < 64);
    }

    #[test]
    fn test_zero_stripes_is_clamped() {
        assert_eq!(UrlLocks::new(0).stripe_count(), 1);
    }

    #[tokio::test]
    async fn test_same_url_is_exclusive() {
        let locks = UrlLocks::new(8);

        let _guard = locks.lock("https://example.com").await;
        let second =
            tokio::time::timeout(Duration::from_millis(50), locks.lock("https://example.com"))
                .await;

        assert!(second.is_err());
    }

    #[tokio::test]
    async fn test_released_lock_can_be_reacquired() {
        let locks = UrlLocks::new(8);

        drop(locks.lock("https://example.com").await);
        let again =
            tokio::time::timeout(Duration::from_millis(50), locks.lock("https://example.com"))
                .await;

        assert!(again.is_ok());
    }
}
