// Remote seat-service contract and its HTTP implementation.
// Every call here is an advisory request: the backend decides which seats a
// reservation actually gets and whether it succeeds at all.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Position of one seat within the grid, assigned by the backend.
pub type SeatIndex = u32;

// Error types for the seat-service client
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Non-2xx response with a structured message. Display is the server
    /// message alone so callers can surface it verbatim.
    #[error("{message}")]
    Rejected { status_code: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ReserveRequest {
    #[serde(rename = "numSeats")]
    pub num_seats: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReserveResponse {
    pub message: String,
    #[serde(rename = "bookedSeatNumbers")]
    pub booked_seat_numbers: Vec<SeatIndex>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// The three operations the backend exposes. Reservations carry a seat
/// count only; seat assignment is entirely the backend's responsibility.
#[async_trait]
pub trait SeatServiceApi: Send + Sync + 'static {
    /// GET /seats — full availability table, one boolean per seat.
    async fn fetch_seats(&self) -> Result<Vec<bool>, ApiError>;

    /// POST /reserve — book `num_seats` seats, returns the assigned ones.
    async fn reserve(&self, num_seats: u32) -> Result<ReserveResponse, ApiError>;

    /// POST /reset — clear all bookings. The success payload is plain text,
    /// not JSON; it is returned as-is for display.
    async fn reset(&self) -> Result<String, ApiError>;
}

// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// `reqwest`-backed implementation of the seat service contract.
#[derive(Debug, Clone)]
pub struct HttpSeatService {
    client: reqwest::Client,
    base_url: String,
    timeout_ms: u64,
}

impl HttpSeatService {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_ms: config.timeout_ms,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.timeout_ms)
        } else {
            ApiError::Transport(err.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(rejection(status.as_u16(), &body))
    }
}

/// Non-2xx bodies carry `{ "message": … }`; anything undecodable falls back
/// to the HTTP status.
fn rejection(status_code: u16, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| format!("Request failed with status {status_code}"));
    ApiError::Rejected {
        status_code,
        message,
    }
}

#[async_trait]
impl SeatServiceApi for HttpSeatService {
    async fn fetch_seats(&self) -> Result<Vec<bool>, ApiError> {
        let response = self
            .client
            .get(self.url("seats"))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let response = Self::check_status(response).await?;

        response
            .json::<Vec<bool>>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn reserve(&self, num_seats: u32) -> Result<ReserveResponse, ApiError> {
        let response = self
            .client
            .post(self.url("reserve"))
            .json(&ReserveRequest { num_seats })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let response = Self::check_status(response).await?;

        response
            .json::<ReserveResponse>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn reset(&self) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.url("reset"))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let response = Self::check_status(response).await?;

        // The reset endpoint answers with a raw text body, unlike the other
        // two. Decode the bytes lossily instead of parsing JSON.
        let body: bytes::Bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

// Scriptable in-memory seat service for tests and benches
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    pub struct MockSeatService {
        seats: Mutex<Vec<bool>>,
        pub fetch_calls: AtomicUsize,
        pub reserve_calls: AtomicUsize,
        pub reset_calls: AtomicUsize,
        last_reserve_count: Mutex<Option<u32>>,
        fail_next_fetch: AtomicBool,
        reject_reserve: Mutex<Option<String>>,
        reject_reset: Mutex<Option<String>>,
        reset_payload: Mutex<String>,
    }

    impl MockSeatService {
        /// All `seat_count` seats start free.
        pub fn new(seat_count: usize) -> Self {
            Self::with_seats(vec![true; seat_count])
        }

        pub fn with_seats(seats: Vec<bool>) -> Self {
            Self {
                seats: Mutex::new(seats),
                fetch_calls: AtomicUsize::new(0),
                reserve_calls: AtomicUsize::new(0),
                reset_calls: AtomicUsize::new(0),
                last_reserve_count: Mutex::new(None),
                fail_next_fetch: AtomicBool::new(false),
                reject_reserve: Mutex::new(None),
                reject_reset: Mutex::new(None),
                reset_payload: Mutex::new("All seats have been reset".to_string()),
            }
        }

        /// Next GET /seats fails at the transport level.
        pub fn fail_next_fetch(&self) {
            self.fail_next_fetch.store(true, Ordering::SeqCst);
        }

        /// Next POST /reserve is rejected with this message.
        pub fn reject_reserve_with(&self, message: &str) {
            *self.reject_reserve.lock() = Some(message.to_string());
        }

        /// Next POST /reset is rejected with this message.
        pub fn reject_reset_with(&self, message: &str) {
            *self.reject_reset.lock() = Some(message.to_string());
        }

        /// Raw text body returned by a successful reset.
        pub fn set_reset_payload(&self, payload: &str) {
            *self.reset_payload.lock() = payload.to_string();
        }

        pub fn last_reserve_count(&self) -> Option<u32> {
            *self.last_reserve_count.lock()
        }

        pub fn seats(&self) -> Vec<bool> {
            self.seats.lock().clone()
        }
    }

    #[async_trait]
    impl SeatServiceApi for MockSeatService {
        async fn fetch_seats(&self) -> Result<Vec<bool>, ApiError> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_next_fetch.swap(false, Ordering::SeqCst) {
                return Err(ApiError::Transport("connection refused".to_string()));
            }
            Ok(self.seats.lock().clone())
        }

        async fn reserve(&self, num_seats: u32) -> Result<ReserveResponse, ApiError> {
            self.reserve_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_reserve_count.lock() = Some(num_seats);

            if let Some(message) = self.reject_reserve.lock().take() {
                return Err(ApiError::Rejected {
                    status_code: 400,
                    message,
                });
            }

            // Assign the lowest-numbered free seats, like the real backend.
            let mut seats = self.seats.lock();
            let assigned: Vec<SeatIndex> = seats
                .iter()
                .enumerate()
                .filter(|(_, &free)| free)
                .map(|(i, _)| i as SeatIndex)
                .take(num_seats as usize)
                .collect();

            if assigned.len() < num_seats as usize {
                return Err(ApiError::Rejected {
                    status_code: 400,
                    message: "Not enough seats available".to_string(),
                });
            }

            for &seat in &assigned {
                seats[seat as usize] = false;
            }

            Ok(ReserveResponse {
                message: format!("Successfully booked {} seats", num_seats),
                booked_seat_numbers: assigned,
            })
        }

        async fn reset(&self) -> Result<String, ApiError> {
            self.reset_calls.fetch_add(1, Ordering::SeqCst);

            if let Some(message) = self.reject_reset.lock().take() {
                return Err(ApiError::Rejected {
                    status_code: 500,
                    message,
                });
            }

            self.seats.lock().iter_mut().for_each(|seat| *seat = true);
            Ok(self.reset_payload.lock().clone())
        }
    }
}
