//! Typed RPC contract shared by the login client and the backend.
//!
//! Both procedures are plain JSON `POST`s. Input validation lives here so the
//! server rejects exactly what the client would refuse to send.

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const REQUEST_OTP_PATH: &str = "/rpc/auth/request-otp";
pub const SIGN_IN_PATH: &str = "/rpc/auth/sign-in";

/// Minimum accepted length of a one-time code.
pub const OTP_MIN_LENGTH: usize = 6;

/// Why a code is being requested.
#[derive(ToSchema, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CodePurpose {
    EmailVerification,
    SignIn,
    #[serde(rename = "forget-password")]
    PasswordReset,
}

impl CodePurpose {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmailVerification => "email-verification",
            Self::SignIn => "sign-in",
            Self::PasswordReset => "forget-password",
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RequestOtpInput {
    pub email: String,
    #[serde(rename = "type")]
    pub purpose: CodePurpose,
}

#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SignInInput {
    pub email: String,
    pub otp: String,
}

/// Response body shared by every procedure.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BaseResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BaseResponse {
    #[must_use]
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
        }
    }
}

/// Error body returned with non-2xx statuses.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Basic email format check.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

impl RequestOtpInput {
    /// # Errors
    /// Returns a message describing the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if valid_email(self.email.trim()) {
            Ok(())
        } else {
            Err("Invalid email address".to_string())
        }
    }
}

impl SignInInput {
    /// # Errors
    /// Returns a message describing the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if !valid_email(self.email.trim()) {
            return Err("Invalid email address".to_string());
        }
        if self.otp.chars().count() < OTP_MIN_LENGTH {
            return Err(format!(
                "OTP must be at least {OTP_MIN_LENGTH} characters long"
            ));
        }
        Ok(())
    }
}
