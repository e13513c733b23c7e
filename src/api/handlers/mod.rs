//! Route handlers for the OTP backend.

pub mod auth;
pub mod health;
