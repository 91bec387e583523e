//! Outbound access to the insurance API.
//!
//! `ApiClient` is the single point of communication with the backing
//! service. Requests carry JSON content negotiation and, when the session
//! holds a token, a bearer header. A 401 from any endpoint clears the
//! session and surfaces as `ApiError::Unauthorized`; everything else is
//! returned to the caller untouched (no retry, no timeout policy).

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
