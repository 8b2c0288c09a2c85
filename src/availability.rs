// Local mirror of the backend's seat grid. The table is replaced wholesale
// on every refresh and never patched in place, so readers always see either
// the previous snapshot or the new one, never a mix.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use crate::api::{SeatIndex, SeatServiceApi};

pub struct AvailabilityCache {
    snapshot: RwLock<Arc<[bool]>>,
}

impl Default for AvailabilityCache {
    fn default() -> Self {
        Self {
            snapshot: RwLock::new(Arc::from(Vec::new())),
        }
    }
}

impl AvailabilityCache {
    /// Starts empty; populate with `refresh`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the full table and swaps the snapshot. On failure the
    /// previous snapshot is retained unchanged and the error is logged; no
    /// retry is attempted. Returns whether the refresh took effect.
    pub async fn refresh(&self, service: &dyn SeatServiceApi) -> bool {
        match service.fetch_seats().await {
            Ok(seats) => {
                *self.snapshot.write() = Arc::from(seats);
                true
            }
            Err(err) => {
                warn!("Error fetching available seats: {err}");
                false
            }
        }
    }

    /// Cheap handle to the current table.
    pub fn snapshot(&self) -> Arc<[bool]> {
        self.snapshot.read().clone()
    }

    pub fn seat_count(&self) -> usize {
        self.snapshot.read().len()
    }

    /// Seats outside the table count as unavailable.
    pub fn is_available(&self, seat: SeatIndex) -> bool {
        self.snapshot
            .read()
            .get(seat as usize)
            .copied()
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockSeatService;

    #[tokio::test]
    async fn refresh_replaces_table_wholesale() {
        let service = MockSeatService::with_seats(vec![true, false, true]);
        let cache = AvailabilityCache::new();
        assert_eq!(cache.seat_count(), 0);

        assert!(cache.refresh(&service).await);
        assert_eq!(cache.snapshot().as_ref(), &[true, false, true]);
        assert!(cache.is_available(0));
        assert!(!cache.is_available(1));
        // Out-of-range indexes read as unavailable.
        assert!(!cache.is_available(99));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let service = MockSeatService::with_seats(vec![true, true]);
        let cache = AvailabilityCache::new();
        assert!(cache.refresh(&service).await);

        let before = cache.snapshot();
        service.fail_next_fetch();
        assert!(!cache.refresh(&service).await);

        // Same snapshot object, not merely equal contents.
        assert!(Arc::ptr_eq(&before, &cache.snapshot()));
    }

    #[tokio::test]
    async fn readers_keep_their_snapshot_across_refreshes() {
        let service = MockSeatService::with_seats(vec![true, true]);
        let cache = AvailabilityCache::new();
        assert!(cache.refresh(&service).await);

        let held = cache.snapshot();
        service.reserve(1).await.unwrap();
        assert!(cache.refresh(&service).await);

        assert_eq!(held.as_ref(), &[true, true]);
        assert_eq!(cache.snapshot().as_ref(), &[false, true]);
    }
}
