use super::handlers::{auth, health};
use crate::contract::{BaseResponse, CodePurpose, ErrorBody, RequestOtpInput, SignInInput};
use axum::response::Json;
use utoipa::openapi::License;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::request_otp::request_otp,
        auth::sign_in::sign_in,
    ),
    components(schemas(
        health::Health,
        RequestOtpInput,
        SignInInput,
        CodePurpose,
        BaseResponse,
        ErrorBody,
    )),
    tags(
        (name = "auth", description = "One-time code sign in"),
        (name = "health", description = "Service status")
    )
)]
struct ApiDoc;

/// `OpenAPI` document with info taken from Cargo metadata.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = env!("CARGO_PKG_NAME").to_string();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();
    doc.info.description = optional_str(env!("CARGO_PKG_DESCRIPTION")).map(str::to_string);
    doc.info.license = optional_str(env!("CARGO_PKG_LICENSE")).map(|identifier| {
        let mut license = License::new(identifier);
        license.identifier = Some(identifier.to_string());
        license
    });
    doc
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi())
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
