//! In-memory one-time code store.
//!
//! Codes are keyed by normalized email and purpose. Issuing a new code
//! replaces the previous one; a verified, expired or exhausted code is removed.

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::contract::CodePurpose;

struct OtpEntry {
    code: SecretString,
    issued_at: Instant,
    attempts: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssueOutcome {
    Issued,
    Cooldown { retry_after: Duration },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerifyOutcome {
    Verified,
    Mismatch { remaining: u32 },
    Expired,
    Exhausted,
    Missing,
}

pub struct OtpStore {
    ttl: Duration,
    max_attempts: u32,
    cooldown: Duration,
    entries: Mutex<HashMap<(String, CodePurpose), OtpEntry>>,
}

impl OtpStore {
    #[must_use]
    pub fn new(ttl: Duration, max_attempts: u32, cooldown: Duration) -> Self {
        Self {
            ttl,
            max_attempts,
            cooldown,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Store `code` for `email`, unless the previous code is still inside the
    /// resend cooldown.
    pub async fn issue(&self, email: &str, purpose: CodePurpose, code: &str) -> IssueOutcome {
        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| entry.issued_at.elapsed() < self.ttl);

        let key = (email.to_string(), purpose);
        if let Some(entry) = entries.get(&key) {
            let elapsed = entry.issued_at.elapsed();
            if elapsed < self.cooldown {
                return IssueOutcome::Cooldown {
                    retry_after: self.cooldown - elapsed,
                };
            }
        }

        entries.insert(
            key,
            OtpEntry {
                code: SecretString::from(code.to_string()),
                issued_at: Instant::now(),
                attempts: 0,
            },
        );
        IssueOutcome::Issued
    }

    /// Drop the code for `email`, used when delivery failed.
    pub async fn revoke(&self, email: &str, purpose: CodePurpose) {
        self.entries
            .lock()
            .await
            .remove(&(email.to_string(), purpose));
    }

    pub async fn verify(&self, email: &str, purpose: CodePurpose, otp: &str) -> VerifyOutcome {
        let mut entries = self.entries.lock().await;
        let key = (email.to_string(), purpose);

        let Some(entry) = entries.get_mut(&key) else {
            return VerifyOutcome::Missing;
        };

        if entry.issued_at.elapsed() >= self.ttl {
            entries.remove(&key);
            return VerifyOutcome::Expired;
        }

        if entry.code.expose_secret() == otp {
            entries.remove(&key);
            return VerifyOutcome::Verified;
        }

        entry.attempts += 1;
        if entry.attempts >= self.max_attempts {
            entries.remove(&key);
            return VerifyOutcome::Exhausted;
        }

        VerifyOutcome::Mismatch {
            remaining: self.max_attempts - entry.attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    const EMAIL: &str = "alice@example.com";

    fn store() -> OtpStore {
        OtpStore::new(Duration::from_secs(300), 3, Duration::from_secs(30))
    }

    #[tokio::test]
    async fn verified_code_is_single_use() {
        let store = store();
        assert_eq!(
            store.issue(EMAIL, CodePurpose::SignIn, "123456").await,
            IssueOutcome::Issued
        );
        assert_eq!(
            store.verify(EMAIL, CodePurpose::SignIn, "123456").await,
            VerifyOutcome::Verified
        );
        assert_eq!(
            store.verify(EMAIL, CodePurpose::SignIn, "123456").await,
            VerifyOutcome::Missing
        );
    }

    #[tokio::test]
    async fn purposes_are_independent() {
        let store = store();
        store.issue(EMAIL, CodePurpose::SignIn, "123456").await;
        assert_eq!(
            store
                .verify(EMAIL, CodePurpose::EmailVerification, "123456")
                .await,
            VerifyOutcome::Missing
        );
    }

    #[tokio::test]
    async fn attempts_run_out() {
        let store = store();
        store.issue(EMAIL, CodePurpose::SignIn, "123456").await;
        assert_eq!(
            store.verify(EMAIL, CodePurpose::SignIn, "000000").await,
            VerifyOutcome::Mismatch { remaining: 2 }
        );
        assert_eq!(
            store.verify(EMAIL, CodePurpose::SignIn, "000000").await,
            VerifyOutcome::Mismatch { remaining: 1 }
        );
        assert_eq!(
            store.verify(EMAIL, CodePurpose::SignIn, "000000").await,
            VerifyOutcome::Exhausted
        );
        // The right code no longer works once the entry is gone.
        assert_eq!(
            store.verify(EMAIL, CodePurpose::SignIn, "123456").await,
            VerifyOutcome::Missing
        );
    }

    #[tokio::test(start_paused = true)]
    async fn codes_expire() {
        let store = store();
        store.issue(EMAIL, CodePurpose::SignIn, "123456").await;
        advance(Duration::from_secs(301)).await;
        assert_eq!(
            store.verify(EMAIL, CodePurpose::SignIn, "123456").await,
            VerifyOutcome::Expired
        );
    }

    #[tokio::test(start_paused = true)]
    async fn resend_respects_cooldown() {
        let store = store();
        store.issue(EMAIL, CodePurpose::SignIn, "111111").await;

        advance(Duration::from_secs(10)).await;
        assert_eq!(
            store.issue(EMAIL, CodePurpose::SignIn, "222222").await,
            IssueOutcome::Cooldown {
                retry_after: Duration::from_secs(20)
            }
        );

        advance(Duration::from_secs(20)).await;
        assert_eq!(
            store.issue(EMAIL, CodePurpose::SignIn, "333333").await,
            IssueOutcome::Issued
        );
        assert_eq!(
            store.verify(EMAIL, CodePurpose::SignIn, "111111").await,
            VerifyOutcome::Mismatch { remaining: 2 }
        );
        assert_eq!(
            store.verify(EMAIL, CodePurpose::SignIn, "333333").await,
            VerifyOutcome::Verified
        );
    }

    #[tokio::test]
    async fn revoke_drops_code() {
        let store = store();
        store.issue(EMAIL, CodePurpose::SignIn, "123456").await;
        store.revoke(EMAIL, CodePurpose::SignIn).await;
        assert_eq!(
            store.verify(EMAIL, CodePurpose::SignIn, "123456").await,
            VerifyOutcome::Missing
        );
        assert_eq!(
            store.issue(EMAIL, CodePurpose::SignIn, "654321").await,
            IssueOutcome::Issued
        );
    }
}
