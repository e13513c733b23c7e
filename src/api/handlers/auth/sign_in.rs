//! `POST /rpc/auth/sign-in`

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tracing::{debug, warn};

use super::rate_limit::{RateLimitAction, RateLimitDecision};
use super::state::AuthState;
use super::store::VerifyOutcome;
use super::utils::{bad_request, internal_error, normalize_email};
use crate::contract::{BaseResponse, CodePurpose, ErrorBody, SignInInput};

/// Check a sign-in code. Wrong, expired and unknown codes all fail the same way.
#[utoipa::path(
    post,
    path = "/rpc/auth/sign-in",
    request_body = SignInInput,
    responses(
        (status = 200, description = "Signed in", body = BaseResponse),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 500, description = "Verification failed", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn sign_in(
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<SignInInput>>,
) -> impl IntoResponse {
    let request: SignInInput = match payload {
        Some(Json(payload)) => payload,
        None => return bad_request("Missing payload"),
    };

    if let Err(message) = request.validate() {
        return bad_request(&message);
    }

    let email = normalize_email(&request.email);
    if auth_state
        .rate_limiter()
        .check_email(&email, RateLimitAction::SignIn)
        == RateLimitDecision::Limited
    {
        warn!("sign-in rate limited");
        return internal_error();
    }

    match auth_state
        .store()
        .verify(&email, CodePurpose::SignIn, request.otp.trim())
        .await
    {
        VerifyOutcome::Verified => (
            StatusCode::OK,
            Json(BaseResponse::ok("Signed in successfully")),
        )
            .into_response(),
        VerifyOutcome::Mismatch { remaining } => {
            debug!(remaining, "sign-in code mismatch");
            internal_error()
        }
        outcome => {
            debug!(?outcome, "sign-in code rejected");
            internal_error()
        }
    }
}
