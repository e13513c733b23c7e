//! One-time code procedures: request a code by email, then sign in with it.
//!
//! Codes live in memory only ([`store::OtpStore`]) and are delivered through
//! the [`EmailSender`](crate::api::email::EmailSender) seam. Callers only ever
//! see `400` for malformed input or a generic `500`; the reason a code was
//! refused is logged, never returned.

pub mod rate_limit;
pub mod request_otp;
pub mod sign_in;
mod state;
pub mod store;
mod utils;


pub use rate_limit::{NoopRateLimiter, RateLimitAction, RateLimitDecision, RateLimiter};
pub use state::{AuthConfig, AuthState};
