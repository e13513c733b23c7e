//! `POST /rpc/auth/request-otp`

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::rate_limit::{RateLimitAction, RateLimitDecision};
use super::state::AuthState;
use super::store::IssueOutcome;
use super::utils::{bad_request, generate_otp, internal_error, normalize_email, otp_message};
use crate::contract::{BaseResponse, ErrorBody, RequestOtpInput};

/// Generate a one-time code and email it.
#[utoipa::path(
    post,
    path = "/rpc/auth/request-otp",
    request_body = RequestOtpInput,
    responses(
        (status = 200, description = "Code sent", body = BaseResponse),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 500, description = "Code could not be sent", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn request_otp(
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<RequestOtpInput>>,
) -> impl IntoResponse {
    let request: RequestOtpInput = match payload {
        Some(Json(payload)) => payload,
        None => return bad_request("Missing payload"),
    };

    if let Err(message) = request.validate() {
        return bad_request(&message);
    }

    let email = normalize_email(&request.email);
    if auth_state
        .rate_limiter()
        .check_email(&email, RateLimitAction::RequestOtp)
        == RateLimitDecision::Limited
    {
        warn!(purpose = request.purpose.as_str(), "request-otp rate limited");
        return internal_error();
    }

    let otp = generate_otp();
    match auth_state.store().issue(&email, request.purpose, &otp).await {
        IssueOutcome::Cooldown { retry_after } => {
            debug!(
                purpose = request.purpose.as_str(),
                retry_after_secs = retry_after.as_secs(),
                "request-otp inside resend cooldown"
            );
            return internal_error();
        }
        IssueOutcome::Issued => {}
    }

    let message = otp_message(&email, request.purpose, &otp);
    if let Err(err) = auth_state.email_sender().send(&message) {
        error!("Failed to send OTP email: {err}");
        auth_state.store().revoke(&email, request.purpose).await;
        return internal_error();
    }

    (
        StatusCode::OK,
        Json(BaseResponse::ok("OTP sent successfully")),
    )
        .into_response()
}
