//! Login flow transition function.
//!
//! [`LoginFlow::update`] is synchronous and side-effect free: it mutates the
//! flow and returns the [`Effect`]s the caller must perform. Remote call
//! results and timer expiries come back in as [`Event`]s tagged with the
//! epoch they were issued in.

use super::code::{CodeInput, SlotInput};
use super::scene::{FlowState, Scene};
use crate::client::ApiError;
use crate::contract::{BaseResponse, CodePurpose, RequestOtpInput, SignInInput};
use std::{fmt, time::Duration};
use tracing::debug;

/// Delay between mounting the outro and unmounting the intro.
pub const DEFAULT_CROSSFADE: Duration = Duration::from_millis(50);
/// Delay between verification resolving and the terminal step.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(2000);

/// Transition timer delays, both measured from the verification result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    pub crossfade: Duration,
    pub settle: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            crossfade: DEFAULT_CROSSFADE,
            settle: DEFAULT_SETTLE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Timer {
    /// Unmount the intro effect.
    HideIntro,
    /// Clear loading and enter the terminal step.
    Settle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestReason {
    Submit,
    Resend,
}

pub type CallResult = Result<BaseResponse, ApiError>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    EmailEdited(String),
    SubmitEmail,
    CodeRequested { epoch: u64, result: CallResult },
    DigitEntered { index: usize, value: String },
    Backspace { index: usize },
    VerifyResolved { epoch: u64, result: CallResult },
    TimerElapsed { epoch: u64, timer: Timer },
    Back,
    GoBack,
    Resend,
    CodeResent { epoch: u64, result: CallResult },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::EmailEdited(_) => "email_edited",
            Self::SubmitEmail => "submit_email",
            Self::CodeRequested { .. } => "code_requested",
            Self::DigitEntered { .. } => "digit_entered",
            Self::Backspace { .. } => "backspace",
            Self::VerifyResolved { .. } => "verify_resolved",
            Self::TimerElapsed { .. } => "timer_elapsed",
            Self::Back => "back",
            Self::GoBack => "go_back",
            Self::Resend => "resend",
            Self::CodeResent { .. } => "code_resent",
        }
    }

    /// Epoch carried by completions of effects.
    #[must_use]
    pub const fn epoch(&self) -> Option<u64> {
        match self {
            Self::CodeRequested { epoch, .. }
            | Self::VerifyResolved { epoch, .. }
            | Self::TimerElapsed { epoch, .. }
            | Self::CodeResent { epoch, .. } => Some(*epoch),
            _ => None,
        }
    }
}

/// Work the caller performs on behalf of the flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    RequestCode {
        epoch: u64,
        reason: RequestReason,
        input: RequestOtpInput,
    },
    VerifyCode {
        epoch: u64,
        input: SignInInput,
    },
    StartTimer {
        epoch: u64,
        timer: Timer,
        after: Duration,
    },
    CancelTimers,
}

/// Sending a code failed; the user stays where they are.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestFailure {
    pub message: String,
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Could not send a code: {}", self.message)
    }
}

impl std::error::Error for RequestFailure {}

/// The code was refused or the check errored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationFailure {
    pub message: String,
}

impl fmt::Display for VerificationFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Verification failed: {}", self.message)
    }
}

impl std::error::Error for VerificationFailure {}

/// An event the flow refused. The flow is unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    NotAllowed { step: FlowState, event: &'static str },
    Guard(&'static str),
    Stale { epoch: u64, current: u64 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotAllowed { step, event } => write!(f, "{event} is not valid in step {step}"),
            Self::Guard(reason) => write!(f, "{reason}"),
            Self::Stale { epoch, current } => {
                write!(f, "stale completion from epoch {epoch} (current {current})")
            }
        }
    }
}

impl std::error::Error for Rejection {}

#[derive(Clone, Debug)]
pub struct LoginFlow {
    timings: Timings,
    scene: Scene,
    email: String,
    code: CodeInput,
    loading: bool,
    requesting: bool,
    resend_open: bool,
    epoch: u64,
    verdict: Option<Result<(), VerificationFailure>>,
    request_error: Option<RequestFailure>,
    verification_error: Option<VerificationFailure>,
}

impl Default for LoginFlow {
    fn default() -> Self {
        Self::new(Timings::default())
    }
}

impl LoginFlow {
    #[must_use]
    pub fn new(timings: Timings) -> Self {
        Self {
            timings,
            scene: Scene::email(),
            email: String::new(),
            code: CodeInput::new(),
            loading: false,
            requesting: false,
            resend_open: true,
            epoch: 0,
            verdict: None,
            request_error: None,
            verification_error: None,
        }
    }

    #[must_use]
    pub fn step(&self) -> FlowState {
        self.scene.step()
    }

    #[must_use]
    pub fn scene(&self) -> Scene {
        self.scene
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn code(&self) -> &CodeInput {
        &self.code
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn is_requesting(&self) -> bool {
        self.requesting
    }

    #[must_use]
    pub fn resend_open(&self) -> bool {
        self.resend_open
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn timings(&self) -> Timings {
        self.timings
    }

    #[must_use]
    pub fn request_error(&self) -> Option<&RequestFailure> {
        self.request_error.as_ref()
    }

    #[must_use]
    pub fn verification_error(&self) -> Option<&VerificationFailure> {
        self.verification_error.as_ref()
    }

    /// Apply one event.
    ///
    /// # Errors
    /// Returns a [`Rejection`] when the event is not valid in the current
    /// step, a guard fails, or a completion belongs to an older epoch.
    pub fn update(&mut self, event: Event) -> Result<Vec<Effect>, Rejection> {
        if let Some(epoch) = event.epoch() {
            if epoch != self.epoch {
                return Err(Rejection::Stale {
                    epoch,
                    current: self.epoch,
                });
            }
        }

        let before = self.scene;
        let effects = self.apply(event)?;
        if self.scene != before {
            debug!(
                from = %before.step(),
                to = %self.scene.step(),
                backdrop = ?self.scene.backdrop(),
                "login flow scene changed"
            );
        }
        Ok(effects)
    }

    fn apply(&mut self, event: Event) -> Result<Vec<Effect>, Rejection> {
        match (self.scene.step(), event) {
            (FlowState::Email, Event::EmailEdited(value)) => {
                // The address must stay the one the code is sent to.
                if self.requesting {
                    return Err(Rejection::Guard("a code request is already in flight"));
                }
                self.email = value;
                Ok(Vec::new())
            }
            (FlowState::Email, Event::SubmitEmail) => self.submit_email(),
            (FlowState::Email, Event::CodeRequested { result, .. }) => {
                Ok(self.code_requested(result))
            }
            (FlowState::Code, Event::DigitEntered { index, value }) => {
                self.digit_entered(index, &value)
            }
            (FlowState::Code, Event::Backspace { index }) => {
                if self.loading {
                    return Err(Rejection::Guard("verification in progress"));
                }
                self.code.backspace(index).map_err(Rejection::Guard)?;
                Ok(Vec::new())
            }
            (FlowState::Code, Event::VerifyResolved { result, .. }) => self.verify_resolved(result),
            (FlowState::Code, Event::TimerElapsed { timer, .. }) => self.timer_elapsed(timer),
            // The settle timer may win the race; the intro is already gone.
            (
                FlowState::Success | FlowState::Error,
                Event::TimerElapsed {
                    timer: Timer::HideIntro,
                    ..
                },
            ) => Ok(Vec::new()),
            (FlowState::Code, Event::Back) => {
                if self.loading {
                    return Err(Rejection::Guard("cannot go back while verifying"));
                }
                Ok(self.restart(Scene::email()))
            }
            (FlowState::Error, Event::GoBack) => Ok(self.restart(Scene::code())),
            (FlowState::Code, Event::Resend) => self.resend(),
            (FlowState::Code, Event::CodeResent { result, .. }) => Ok(self.code_resent(result)),
            (step, event) => Err(Rejection::NotAllowed {
                step,
                event: event.name(),
            }),
        }
    }

    fn submit_email(&mut self) -> Result<Vec<Effect>, Rejection> {
        if self.requesting {
            return Err(Rejection::Guard("a code request is already in flight"));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(Rejection::Guard("email is required"));
        }

        let input = RequestOtpInput {
            email: email.to_string(),
            purpose: CodePurpose::SignIn,
        };
        self.requesting = true;
        self.request_error = None;

        Ok(vec![Effect::RequestCode {
            epoch: self.epoch,
            reason: RequestReason::Submit,
            input,
        }])
    }

    fn code_requested(&mut self, result: CallResult) -> Vec<Effect> {
        self.requesting = false;
        match outcome(result) {
            Ok(()) => {
                self.scene = Scene::code();
                self.code.clear();
                self.resend_open = true;
            }
            Err(message) => {
                self.request_error = Some(RequestFailure { message });
            }
        }
        Vec::new()
    }

    fn digit_entered(&mut self, index: usize, value: &str) -> Result<Vec<Effect>, Rejection> {
        if self.loading {
            return Err(Rejection::Guard("verification in progress"));
        }

        match self.code.input(index, value).map_err(Rejection::Guard)? {
            SlotInput::Pending => Ok(Vec::new()),
            SlotInput::Complete => {
                self.loading = true;
                Ok(vec![Effect::VerifyCode {
                    epoch: self.epoch,
                    input: SignInInput {
                        email: self.email.trim().to_string(),
                        otp: self.code.code(),
                    },
                }])
            }
        }
    }

    fn verify_resolved(&mut self, result: CallResult) -> Result<Vec<Effect>, Rejection> {
        if !self.loading || self.verdict.is_some() {
            return Err(Rejection::Guard("no verification pending"));
        }

        self.verdict = Some(outcome(result).map_err(|message| VerificationFailure { message }));
        self.scene = Scene::resolving();

        // Both delays are measured from this instant, not chained.
        Ok(vec![
            Effect::StartTimer {
                epoch: self.epoch,
                timer: Timer::HideIntro,
                after: self.timings.crossfade,
            },
            Effect::StartTimer {
                epoch: self.epoch,
                timer: Timer::Settle,
                after: self.timings.settle,
            },
        ])
    }

    fn timer_elapsed(&mut self, timer: Timer) -> Result<Vec<Effect>, Rejection> {
        match timer {
            Timer::HideIntro => {
                if self.verdict.is_none() {
                    return Err(Rejection::Guard("no transition in progress"));
                }
                self.scene = Scene::settling();
            }
            Timer::Settle => {
                let verdict = self
                    .verdict
                    .take()
                    .ok_or(Rejection::Guard("no transition in progress"))?;
                self.loading = false;
                match verdict {
                    Ok(()) => self.scene = Scene::success(),
                    Err(failure) => {
                        self.verification_error = Some(failure);
                        self.scene = Scene::error();
                    }
                }
            }
        }
        Ok(Vec::new())
    }

    fn resend(&mut self) -> Result<Vec<Effect>, Rejection> {
        if self.loading {
            return Err(Rejection::Guard("verification in progress"));
        }
        if !self.resend_open {
            return Err(Rejection::Guard("resend already in flight"));
        }

        self.resend_open = false;
        self.request_error = None;

        Ok(vec![Effect::RequestCode {
            epoch: self.epoch,
            reason: RequestReason::Resend,
            input: RequestOtpInput {
                email: self.email.trim().to_string(),
                purpose: CodePurpose::SignIn,
            },
        }])
    }

    fn code_resent(&mut self, result: CallResult) -> Vec<Effect> {
        self.resend_open = true;
        match outcome(result) {
            // A code typed while the resend was in flight is already being verified.
            Ok(()) if !self.loading => self.code.clear(),
            Ok(()) => {}
            Err(message) => self.request_error = Some(RequestFailure { message }),
        }
        Vec::new()
    }

    /// Leave the current step, dropping any in-flight work.
    fn restart(&mut self, scene: Scene) -> Vec<Effect> {
        self.epoch += 1;
        self.scene = scene;
        self.code.clear();
        self.loading = false;
        self.requesting = false;
        self.resend_open = true;
        self.verdict = None;
        self.verification_error = None;
        vec![Effect::CancelTimers]
    }
}

fn outcome(result: CallResult) -> Result<(), String> {
    match result {
        Ok(response) if response.success => Ok(()),
        Ok(response) => Err(response
            .message
            .unwrap_or_else(|| "request was not successful".to_string())),
        Err(err) => Err(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::scene::Backdrop;
    use std::collections::HashSet;

    type TestResult = Result<(), Rejection>;

    fn ok() -> CallResult {
        Ok(BaseResponse::ok("done"))
    }

    fn server_error() -> CallResult {
        Err(ApiError::Http {
            status: 500,
            message: "Internal server error".to_string(),
        })
    }

    fn at_code_step() -> Result<LoginFlow, Rejection> {
        let mut flow = LoginFlow::default();
        flow.update(Event::EmailEdited("a@b.com".to_string()))?;
        flow.update(Event::SubmitEmail)?;
        flow.update(Event::CodeRequested {
            epoch: 0,
            result: ok(),
        })?;
        Ok(flow)
    }

    fn enter_code(flow: &mut LoginFlow, code: &str) -> Result<Vec<Effect>, Rejection> {
        let mut effects = Vec::new();
        for (index, digit) in code.chars().enumerate() {
            effects.extend(flow.update(Event::DigitEntered {
                index,
                value: digit.to_string(),
            })?);
        }
        Ok(effects)
    }

    fn settle(flow: &mut LoginFlow, result: CallResult) -> TestResult {
        let epoch = flow.epoch();
        flow.update(Event::VerifyResolved { epoch, result })?;
        flow.update(Event::TimerElapsed {
            epoch,
            timer: Timer::HideIntro,
        })?;
        flow.update(Event::TimerElapsed {
            epoch,
            timer: Timer::Settle,
        })?;
        Ok(())
    }

    #[test]
    fn submit_requests_sign_in_code() -> TestResult {
        let mut flow = LoginFlow::default();
        flow.update(Event::EmailEdited("a@b.com".to_string()))?;
        let effects = flow.update(Event::SubmitEmail)?;
        assert_eq!(
            effects,
            vec![Effect::RequestCode {
                epoch: 0,
                reason: RequestReason::Submit,
                input: RequestOtpInput {
                    email: "a@b.com".to_string(),
                    purpose: CodePurpose::SignIn,
                },
            }]
        );
        assert_eq!(flow.step(), FlowState::Email);

        flow.update(Event::CodeRequested {
            epoch: 0,
            result: ok(),
        })?;
        assert_eq!(flow.step(), FlowState::Code);
        assert_eq!(flow.scene(), Scene::code());
        Ok(())
    }

    #[test]
    fn empty_email_is_rejected() {
        let mut flow = LoginFlow::default();
        assert_eq!(
            flow.update(Event::SubmitEmail),
            Err(Rejection::Guard("email is required"))
        );
        let _ = flow.update(Event::EmailEdited("   ".to_string()));
        assert!(flow.update(Event::SubmitEmail).is_err());
        assert!(!flow.is_requesting());
    }

    #[test]
    fn duplicate_submit_while_requesting_is_rejected() -> TestResult {
        let mut flow = LoginFlow::default();
        flow.update(Event::EmailEdited("a@b.com".to_string()))?;
        flow.update(Event::SubmitEmail)?;
        assert!(flow.update(Event::SubmitEmail).is_err());
        Ok(())
    }

    #[test]
    fn email_is_frozen_while_requesting() -> TestResult {
        let mut flow = LoginFlow::default();
        flow.update(Event::EmailEdited("a@b.com".to_string()))?;
        flow.update(Event::SubmitEmail)?;
        assert_eq!(
            flow.update(Event::EmailEdited("other@x.com".to_string())),
            Err(Rejection::Guard("a code request is already in flight"))
        );
        assert_eq!(flow.email(), "a@b.com");

        flow.update(Event::CodeRequested {
            epoch: 0,
            result: ok(),
        })?;
        let mut effects = Vec::new();
        for (index, digit) in "123456".chars().enumerate() {
            effects.extend(flow.update(Event::DigitEntered {
                index,
                value: digit.to_string(),
            })?);
        }
        let verified: Vec<&str> = effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::VerifyCode { input, .. } => Some(input.email.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(verified, vec!["a@b.com"]);
        Ok(())
    }

    #[test]
    fn failed_request_stays_on_email() -> TestResult {
        let mut flow = LoginFlow::default();
        flow.update(Event::EmailEdited("a@b.com".to_string()))?;
        flow.update(Event::SubmitEmail)?;
        flow.update(Event::CodeRequested {
            epoch: 0,
            result: server_error(),
        })?;
        assert_eq!(flow.step(), FlowState::Email);
        assert!(flow.request_error().is_some());
        assert!(!flow.is_requesting());

        // A new submit clears the previous error.
        flow.update(Event::SubmitEmail)?;
        assert!(flow.request_error().is_none());
        Ok(())
    }

    #[test]
    fn unsuccessful_response_counts_as_failure() -> TestResult {
        let mut flow = LoginFlow::default();
        flow.update(Event::EmailEdited("a@b.com".to_string()))?;
        flow.update(Event::SubmitEmail)?;
        flow.update(Event::CodeRequested {
            epoch: 0,
            result: Ok(BaseResponse {
                success: false,
                message: Some("nope".to_string()),
            }),
        })?;
        assert_eq!(flow.step(), FlowState::Email);
        assert_eq!(
            flow.request_error().map(|failure| failure.message.as_str()),
            Some("nope")
        );
        Ok(())
    }

    #[test]
    fn completed_code_issues_one_verify() -> TestResult {
        let mut flow = at_code_step()?;
        let effects = enter_code(&mut flow, "123456")?;
        assert_eq!(
            effects,
            vec![Effect::VerifyCode {
                epoch: 0,
                input: SignInInput {
                    email: "a@b.com".to_string(),
                    otp: "123456".to_string(),
                },
            }]
        );
        assert!(flow.is_loading());

        // Re-completing the last slot does not submit again.
        assert!(flow
            .update(Event::DigitEntered {
                index: 5,
                value: "6".to_string(),
            })
            .is_err());
        Ok(())
    }

    #[test]
    fn verify_success_choreography() -> TestResult {
        let mut flow = at_code_step()?;
        enter_code(&mut flow, "123456")?;

        let effects = flow.update(Event::VerifyResolved {
            epoch: 0,
            result: ok(),
        })?;
        assert_eq!(
            effects,
            vec![
                Effect::StartTimer {
                    epoch: 0,
                    timer: Timer::HideIntro,
                    after: Duration::from_millis(50),
                },
                Effect::StartTimer {
                    epoch: 0,
                    timer: Timer::Settle,
                    after: Duration::from_millis(2000),
                },
            ]
        );
        assert!(flow.scene().initial_visible());
        assert!(flow.scene().reverse_visible());
        assert!(flow.is_loading());

        flow.update(Event::TimerElapsed {
            epoch: 0,
            timer: Timer::HideIntro,
        })?;
        assert!(!flow.scene().initial_visible());
        assert_eq!(flow.step(), FlowState::Code);

        flow.update(Event::TimerElapsed {
            epoch: 0,
            timer: Timer::Settle,
        })?;
        assert_eq!(flow.step(), FlowState::Success);
        assert!(!flow.is_loading());
        Ok(())
    }

    #[test]
    fn verify_failure_routes_to_error() -> TestResult {
        let mut flow = at_code_step()?;
        enter_code(&mut flow, "123456")?;
        settle(&mut flow, server_error())?;
        assert_eq!(flow.step(), FlowState::Error);
        assert!(!flow.is_loading());
        assert!(flow.verification_error().is_some());
        Ok(())
    }

    #[test]
    fn settle_before_hide_intro_still_lands_on_outro() -> TestResult {
        let mut flow = at_code_step()?;
        enter_code(&mut flow, "123456")?;
        flow.update(Event::VerifyResolved {
            epoch: 0,
            result: ok(),
        })?;
        flow.update(Event::TimerElapsed {
            epoch: 0,
            timer: Timer::Settle,
        })?;
        assert_eq!(flow.scene(), Scene::success());
        flow.update(Event::TimerElapsed {
            epoch: 0,
            timer: Timer::HideIntro,
        })?;
        assert_eq!(flow.scene(), Scene::success());
        Ok(())
    }

    #[test]
    fn go_back_from_error_resets_code_and_backdrop() -> TestResult {
        let mut flow = at_code_step()?;
        enter_code(&mut flow, "123456")?;
        settle(&mut flow, server_error())?;

        let effects = flow.update(Event::GoBack)?;
        assert_eq!(effects, vec![Effect::CancelTimers]);
        assert_eq!(flow.step(), FlowState::Code);
        assert!(flow.code().is_empty());
        assert!(flow.scene().initial_visible());
        assert!(!flow.scene().reverse_visible());
        assert!(flow.verification_error().is_none());

        // The user can try again.
        let effects = enter_code(&mut flow, "654321")?;
        assert_eq!(effects.len(), 1);
        Ok(())
    }

    #[test]
    fn back_from_code_resets_to_email() -> TestResult {
        let mut flow = at_code_step()?;
        enter_code(&mut flow, "123")?;
        let effects = flow.update(Event::Back)?;
        assert_eq!(effects, vec![Effect::CancelTimers]);
        assert_eq!(flow.step(), FlowState::Email);
        assert_eq!(flow.scene().backdrop(), Backdrop::Intro);
        assert!(flow.code().is_empty());
        assert_eq!(flow.email(), "a@b.com");
        Ok(())
    }

    #[test]
    fn back_is_blocked_while_loading() -> TestResult {
        let mut flow = at_code_step()?;
        enter_code(&mut flow, "123456")?;
        assert_eq!(
            flow.update(Event::Back),
            Err(Rejection::Guard("cannot go back while verifying"))
        );
        assert_eq!(flow.step(), FlowState::Code);
        Ok(())
    }

    #[test]
    fn back_from_email_is_rejected() {
        let mut flow = LoginFlow::default();
        assert_eq!(
            flow.update(Event::Back),
            Err(Rejection::NotAllowed {
                step: FlowState::Email,
                event: "back",
            })
        );
        assert_eq!(flow.scene(), Scene::email());
        assert_eq!(flow.epoch(), 0);
    }

    #[test]
    fn resend_gate_suppresses_duplicates() -> TestResult {
        let mut flow = at_code_step()?;
        enter_code(&mut flow, "12")?;

        let effects = flow.update(Event::Resend)?;
        assert!(matches!(
            effects.as_slice(),
            [Effect::RequestCode {
                reason: RequestReason::Resend,
                ..
            }]
        ));
        assert!(!flow.resend_open());
        assert!(flow.update(Event::Resend).is_err());

        flow.update(Event::CodeResent {
            epoch: 0,
            result: ok(),
        })?;
        assert!(flow.resend_open());
        assert!(flow.code().is_empty());
        Ok(())
    }

    #[test]
    fn failed_resend_keeps_code() -> TestResult {
        let mut flow = at_code_step()?;
        enter_code(&mut flow, "12")?;
        flow.update(Event::Resend)?;
        flow.update(Event::CodeResent {
            epoch: 0,
            result: server_error(),
        })?;
        assert!(flow.resend_open());
        assert_eq!(flow.code().code(), "12");
        assert!(flow.request_error().is_some());
        Ok(())
    }

    #[test]
    fn completions_from_old_epoch_are_stale() -> TestResult {
        let mut flow = at_code_step()?;
        flow.update(Event::Resend)?;
        flow.update(Event::Back)?;
        assert_eq!(
            flow.update(Event::CodeResent {
                epoch: 0,
                result: ok(),
            }),
            Err(Rejection::Stale {
                epoch: 0,
                current: 1,
            })
        );
        assert_eq!(flow.step(), FlowState::Email);
        Ok(())
    }

    #[test]
    fn success_is_terminal() -> TestResult {
        let mut flow = at_code_step()?;
        enter_code(&mut flow, "123456")?;
        settle(&mut flow, ok())?;
        for event in [Event::Back, Event::GoBack, Event::Resend, Event::SubmitEmail] {
            assert!(flow.update(event).is_err());
        }
        assert_eq!(flow.scene(), Scene::success());
        Ok(())
    }

    #[test]
    fn visited_scenes_are_all_valid() -> TestResult {
        let valid: HashSet<Scene> = Scene::ALL.into_iter().collect();
        let mut seen = HashSet::new();

        let mut flow = at_code_step()?;
        seen.insert(flow.scene());
        enter_code(&mut flow, "123456")?;
        let epoch = flow.epoch();
        flow.update(Event::VerifyResolved {
            epoch,
            result: server_error(),
        })?;
        seen.insert(flow.scene());
        flow.update(Event::TimerElapsed {
            epoch,
            timer: Timer::HideIntro,
        })?;
        seen.insert(flow.scene());
        flow.update(Event::TimerElapsed {
            epoch,
            timer: Timer::Settle,
        })?;
        seen.insert(flow.scene());
        flow.update(Event::GoBack)?;
        flow.update(Event::Back)?;
        seen.insert(flow.scene());

        enter_code_after_resubmit(&mut flow)?;
        seen.insert(flow.scene());

        assert!(seen.is_subset(&valid));
        assert_eq!(seen, valid);
        Ok(())
    }

    fn enter_code_after_resubmit(flow: &mut LoginFlow) -> TestResult {
        flow.update(Event::SubmitEmail)?;
        let epoch = flow.epoch();
        flow.update(Event::CodeRequested { epoch, result: ok() })?;
        enter_code(flow, "111111")?;
        settle(flow, ok())
    }
}
