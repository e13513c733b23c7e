//! # otp-login
//!
//! Passwordless sign-in with an emailed one-time code.
//!
//! The crate has two halves that share the wire types in [`contract`]:
//!
//! - **Client flow:** [`flow::LoginFlow`] is the login wizard as a pure state
//!   machine (email, then a six-slot code, then success or error).
//!   [`flow::FlowDriver`] runs it on tokio, performing the remote calls through
//!   [`client::AuthApi`] and the two transition timers that swap the
//!   background effect ([`backdrop`]).
//! - **Backend:** [`api`] serves the `request-otp` and `sign-in` procedures,
//!   issuing six-digit codes with a TTL, an attempt budget and a resend
//!   cooldown.
//!
//! Every failure the backend reports (unknown email, wrong or expired code,
//! rate limiting) is an opaque `500` with a generic body, so callers cannot
//! probe which addresses exist.
//!
//! User preferences (accent colour, language, background) live in a small JSON
//! document handled by [`settings`].

pub mod api;
pub mod backdrop;
pub mod cli;
pub mod client;
pub mod contract;
pub mod flow;
pub mod settings;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
