//! Auth configuration and shared handler state.

use std::sync::Arc;
use std::time::Duration;

use super::rate_limit::RateLimiter;
use super::store::OtpStore;
use crate::api::email::EmailSender;

const DEFAULT_OTP_TTL_SECONDS: u64 = 5 * 60;
const DEFAULT_OTP_ATTEMPTS: u32 = 3;
const DEFAULT_RESEND_COOLDOWN_SECONDS: u64 = 30;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    frontend_base_url: String,
    otp_ttl_seconds: u64,
    otp_attempts: u32,
    resend_cooldown_seconds: u64,
}

impl AuthConfig {
    #[must_use]
    pub fn new(frontend_base_url: String) -> Self {
        Self {
            frontend_base_url,
            otp_ttl_seconds: DEFAULT_OTP_TTL_SECONDS,
            otp_attempts: DEFAULT_OTP_ATTEMPTS,
            resend_cooldown_seconds: DEFAULT_RESEND_COOLDOWN_SECONDS,
        }
    }

    #[must_use]
    pub fn with_otp_ttl_seconds(mut self, seconds: u64) -> Self {
        self.otp_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_otp_attempts(mut self, attempts: u32) -> Self {
        self.otp_attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_resend_cooldown_seconds(mut self, seconds: u64) -> Self {
        self.resend_cooldown_seconds = seconds;
        self
    }

    #[must_use]
    pub fn otp_ttl_seconds(&self) -> u64 {
        self.otp_ttl_seconds
    }

    #[must_use]
    pub fn otp_attempts(&self) -> u32 {
        self.otp_attempts
    }

    #[must_use]
    pub fn resend_cooldown_seconds(&self) -> u64 {
        self.resend_cooldown_seconds
    }

    pub(crate) fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }
}

pub struct AuthState {
    config: AuthConfig,
    store: OtpStore,
    email_sender: Arc<dyn EmailSender>,
    rate_limiter: Arc<dyn RateLimiter>,
}

impl AuthState {
    pub fn new(
        config: AuthConfig,
        email_sender: Arc<dyn EmailSender>,
        rate_limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        let store = OtpStore::new(
            Duration::from_secs(config.otp_ttl_seconds()),
            config.otp_attempts(),
            Duration::from_secs(config.resend_cooldown_seconds()),
        );
        Self {
            config,
            store,
            email_sender,
            rate_limiter,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(super) fn store(&self) -> &OtpStore {
        &self.store
    }

    pub(super) fn email_sender(&self) -> &dyn EmailSender {
        self.email_sender.as_ref()
    }

    pub(super) fn rate_limiter(&self) -> &dyn RateLimiter {
        self.rate_limiter.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::super::rate_limit::NoopRateLimiter;
    use super::{AuthConfig, AuthState};
    use crate::api::email::LogEmailSender;
    use std::sync::Arc;

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new("http://localhost:3000".to_string());

        assert_eq!(config.frontend_base_url(), "http://localhost:3000");
        assert_eq!(config.otp_ttl_seconds(), super::DEFAULT_OTP_TTL_SECONDS);
        assert_eq!(config.otp_attempts(), super::DEFAULT_OTP_ATTEMPTS);
        assert_eq!(
            config.resend_cooldown_seconds(),
            super::DEFAULT_RESEND_COOLDOWN_SECONDS
        );

        let config = config
            .with_otp_ttl_seconds(60)
            .with_otp_attempts(5)
            .with_resend_cooldown_seconds(0);

        assert_eq!(config.otp_ttl_seconds(), 60);
        assert_eq!(config.otp_attempts(), 5);
        assert_eq!(config.resend_cooldown_seconds(), 0);
    }

    #[test]
    fn auth_state_keeps_config() {
        let config = AuthConfig::new("http://localhost:3000".to_string()).with_otp_attempts(7);
        let state = AuthState::new(config, Arc::new(LogEmailSender), Arc::new(NoopRateLimiter));
        assert_eq!(state.config().otp_attempts(), 7);
    }
}
