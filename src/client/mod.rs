//! Client side of the auth contract.
//!
//! [`AuthApi`] is the seam the login flow talks to; [`HttpAuthClient`] is the
//! `reqwest` implementation used by the `login` command.

mod error;

pub use error::ApiError;

use crate::contract::{
    BaseResponse, ErrorBody, REQUEST_OTP_PATH, RequestOtpInput, SIGN_IN_PATH, SignInInput,
};
use reqwest::Client;
use serde::Serialize;
use std::{future::Future, time::Duration};
use tracing::{debug, instrument};
use url::Url;

/// Default request timeout applied to every call.
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

/// Remote operations consumed by the login flow.
pub trait AuthApi: Send + Sync + 'static {
    /// Ask the server to send a one-time code to `input.email`.
    fn request_code(
        &self,
        input: RequestOtpInput,
    ) -> impl Future<Output = Result<BaseResponse, ApiError>> + Send;

    /// Check a one-time code and sign the user in.
    fn verify_code(
        &self,
        input: SignInInput,
    ) -> impl Future<Output = Result<BaseResponse, ApiError>> + Send;
}

#[derive(Clone, Debug)]
pub struct HttpAuthClient {
    client: Client,
    base_url: Url,
}

impl HttpAuthClient {
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| ApiError::Config(format!("Invalid API URL {base_url}: {err}")))?;

        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn post_json<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<BaseResponse, ApiError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|err| ApiError::Config(format!("Invalid endpoint {path}: {err}")))?;

        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.message)
                .unwrap_or_else(|_| text.chars().take(MAX_ERROR_CHARS).collect());

            debug!("{} - {}, {}", path, status, message);

            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<BaseResponse>()
            .await
            .map_err(|err| ApiError::Parse(err.to_string()))
    }
}

impl AuthApi for HttpAuthClient {
    #[instrument(skip(self, input), fields(email = %input.email, purpose = input.purpose.as_str()))]
    async fn request_code(&self, input: RequestOtpInput) -> Result<BaseResponse, ApiError> {
        self.post_json(REQUEST_OTP_PATH, &input).await
    }

    // The code itself is never recorded in the span.
    #[instrument(skip(self, input), fields(email = %input.email))]
    async fn verify_code(&self, input: SignInInput) -> Result<BaseResponse, ApiError> {
        self.post_json(SIGN_IN_PATH, &input).await
    }
}
