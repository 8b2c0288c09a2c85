// Client-side seat selection and reservation state machine.
// The backend service owns true availability and booking state; this crate
// mirrors it locally and submits advisory requests against it.

pub mod api;
pub mod availability;
pub mod coordinator;
pub mod selection;

// Re-export key types for convenience
pub use api::{ApiError, ClientConfig, HttpSeatService, ReserveResponse, SeatIndex, SeatServiceApi};
pub use availability::AvailabilityCache;
pub use coordinator::{
    Operation, ReservationCoordinator, INVALID_SEAT_COUNT_MESSAGE, MAX_SEATS_PER_BOOKING,
};
pub use selection::SelectionManager;
