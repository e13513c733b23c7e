//! Email → code → success/error login wizard.
//!
//! [`LoginFlow`] is the pure state machine, [`FlowDriver`] runs it against an
//! [`AuthApi`](crate::client::AuthApi) with real timers. The visible step and
//! the background effects are a single [`Scene`], so the machine cannot
//! produce a combination that hides both effects.

mod code;
mod driver;
mod machine;
mod scene;

pub use code::{CodeInput, SlotInput, CODE_LENGTH};
pub use driver::FlowDriver;
pub use machine::{
    CallResult, Effect, Event, LoginFlow, Rejection, RequestFailure, RequestReason, Timer,
    Timings, VerificationFailure, DEFAULT_CROSSFADE, DEFAULT_SETTLE,
};
pub use scene::{Backdrop, FlowState, Scene};
