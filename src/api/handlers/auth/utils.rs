//! Small helpers for the OTP handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use rand::{rngs::OsRng, Rng};
use serde_json::json;

use crate::api::email::EmailMessage;
use crate::contract::{CodePurpose, ErrorBody};

/// Normalize an email for lookup checks.
pub(super) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Six random decimal digits, zero padded.
pub(super) fn generate_otp() -> String {
    format!("{:06}", OsRng.gen_range(0..1_000_000u32))
}

pub(super) fn otp_message(email: &str, purpose: CodePurpose, otp: &str) -> EmailMessage {
    EmailMessage {
        to_email: email.to_string(),
        template: format!("otp-{}", purpose.as_str()),
        payload_json: json!({ "otp": otp, "type": purpose.as_str() }).to_string(),
    }
}

pub(super) fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            code: code.to_string(),
            message: message.to_string(),
        }),
    )
        .into_response()
}

pub(super) fn bad_request(message: &str) -> Response {
    error_response(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
}

/// Every failure of the underlying action looks the same to callers.
pub(super) fn internal_error() -> Response {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_SERVER_ERROR",
        "Internal server error",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn generate_otp_is_six_digits() {
        for _ in 0..100 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn otp_message_names_purpose() -> Result<(), serde_json::Error> {
        let message = otp_message("a@b.com", CodePurpose::SignIn, "123456");
        assert_eq!(message.to_email, "a@b.com");
        assert_eq!(message.template, "otp-sign-in");
        let payload: serde_json::Value = serde_json::from_str(&message.payload_json)?;
        assert_eq!(payload["otp"], "123456");
        Ok(())
    }

    #[test]
    fn error_statuses() {
        assert_eq!(bad_request("nope").status(), StatusCode::BAD_REQUEST);
        assert_eq!(internal_error().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
