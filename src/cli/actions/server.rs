use crate::api::{
    self,
    email::LogEmailSender,
    handlers::auth::{AuthConfig, AuthState, NoopRateLimiter},
};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub frontend_base_url: String,
    pub otp_ttl_seconds: u64,
    pub otp_attempts: u32,
    pub resend_cooldown_seconds: u64,
}

impl Args {
    fn auth_config(&self) -> AuthConfig {
        AuthConfig::new(self.frontend_base_url.clone())
            .with_otp_ttl_seconds(self.otp_ttl_seconds)
            .with_otp_attempts(self.otp_attempts)
            .with_resend_cooldown_seconds(self.resend_cooldown_seconds)
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let auth_state = Arc::new(AuthState::new(
        args.auth_config(),
        Arc::new(LogEmailSender),
        Arc::new(NoopRateLimiter),
    ));

    api::new(args.port, auth_state).await
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("frontend_base_url", args.frontend_base_url.clone()),
        ("otp_ttl_seconds", args.otp_ttl_seconds.to_string()),
        ("otp_attempts", args.otp_attempts.to_string()),
        (
            "resend_cooldown_seconds",
            args.resend_cooldown_seconds.to_string(),
        ),
    ];
    info!("{}", startup_message(&entries));
}

fn startup_message(entries: &[(&str, String)]) -> String {
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "{} {} - {}\n\nStartup configuration:",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    message
}

fn short_commit(hash: &str) -> String {
    let trimmed = hash.trim();
    if trimmed.len() > 7 {
        trimmed[..7].to_string()
    } else {
        trimmed.to_string()
    }
}
