// Reserve/reset round-trips against the seat service and the local state
// they reconcile afterwards. Every operation ends back at idle; failures
// surface the server's message and leave everything else untouched.
//
// Overlapping operations are not serialized client-side: the last response
// to arrive wins when writing shared state. Double-booking prevention is
// the backend's job, not this layer's.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::api::{SeatIndex, SeatServiceApi};
use crate::availability::AvailabilityCache;
use crate::selection::SelectionManager;

/// Largest seat count a single reservation may request.
pub const MAX_SEATS_PER_BOOKING: i64 = 7;

/// Fixed message for counts rejected before any network call.
pub const INVALID_SEAT_COUNT_MESSAGE: &str = "Invalid number of seats";

/// The request kinds that can be in flight. Each is tracked by its own flag
/// so overlapping operations do not clobber each other's terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Reserve,
    Reset,
}

#[derive(Default)]
struct InFlight {
    fetch: AtomicBool,
    reserve: AtomicBool,
    reset: AtomicBool,
}

impl InFlight {
    fn flag(&self, operation: Operation) -> &AtomicBool {
        match operation {
            Operation::Fetch => &self.fetch,
            Operation::Reserve => &self.reserve,
            Operation::Reset => &self.reset,
        }
    }
}

pub struct ReservationCoordinator {
    service: Arc<dyn SeatServiceApi>,
    availability: AvailabilityCache,
    selection: SelectionManager,
    message: RwLock<String>,
    booked_seats: RwLock<Vec<SeatIndex>>,
    in_flight: InFlight,
}

impl ReservationCoordinator {
    pub fn new(service: Arc<dyn SeatServiceApi>) -> Self {
        Self {
            service,
            availability: AvailabilityCache::new(),
            selection: SelectionManager::new(),
            message: RwLock::new(String::new()),
            booked_seats: RwLock::new(Vec::new()),
            in_flight: InFlight::default(),
        }
    }

    /// Startup fetch of the availability grid.
    pub async fn init(&self) {
        self.refresh_availability().await;
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn availability(&self) -> &AvailabilityCache {
        &self.availability
    }

    /// Latest user-facing message from any operation.
    pub fn message(&self) -> String {
        self.message.read().clone()
    }

    /// Seats confirmed by the last successful reservation, in the order the
    /// backend assigned them. Cleared by a successful reset.
    pub fn booked_seats(&self) -> Vec<SeatIndex> {
        self.booked_seats.read().clone()
    }

    pub fn in_flight(&self, operation: Operation) -> bool {
        self.in_flight.flag(operation).load(Ordering::SeqCst)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight(Operation::Fetch)
            || self.in_flight(Operation::Reserve)
            || self.in_flight(Operation::Reset)
    }

    async fn refresh_availability(&self) {
        self.in_flight.fetch.store(true, Ordering::SeqCst);
        self.availability.refresh(self.service.as_ref()).await;
        self.in_flight.fetch.store(false, Ordering::SeqCst);
    }

    /// Submits a seat-count-only reservation intent. Counts outside [1,7]
    /// (or absent) set the fixed message and never reach the network. On
    /// success the booked seats are stored, availability is refreshed and
    /// the selection is cleared; on failure the server's message is
    /// surfaced verbatim and nothing else changes.
    pub async fn reserve(&self, num_seats: Option<i64>) {
        let Some(count) = num_seats.filter(|n| (1..=MAX_SEATS_PER_BOOKING).contains(n)) else {
            *self.message.write() = INVALID_SEAT_COUNT_MESSAGE.to_string();
            return;
        };

        self.in_flight.reserve.store(true, Ordering::SeqCst);
        debug!(num_seats = count, "sending reservation request");

        match self.service.reserve(count as u32).await {
            Ok(response) => {
                *self.message.write() = response.message;
                *self.booked_seats.write() = response.booked_seat_numbers;
                self.refresh_availability().await;
                self.selection.clear();
            }
            Err(err) => {
                *self.message.write() = err.to_string();
            }
        }

        self.in_flight.reserve.store(false, Ordering::SeqCst);
    }

    /// Clears every booking on the server, then resynchronizes local state:
    /// the raw response text becomes the message, availability is
    /// refreshed, and both selection and booking result are emptied. On
    /// failure only the message changes.
    pub async fn reset(&self) {
        self.in_flight.reset.store(true, Ordering::SeqCst);
        debug!("sending reset request");

        match self.service.reset().await {
            Ok(message) => {
                *self.message.write() = message;
                self.refresh_availability().await;
                self.selection.clear();
                self.booked_seats.write().clear();
            }
            Err(err) => {
                *self.message.write() = err.to_string();
            }
        }

        self.in_flight.reset.store(false, Ordering::SeqCst);
    }
}
