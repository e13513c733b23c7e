//! Runs a [`LoginFlow`] on the tokio runtime.
//!
//! The driver owns the flow and is the only place it is mutated. Remote calls
//! and timers run as spawned tasks that post their completion back through a
//! channel; [`FlowDriver::next`] applies them one at a time.

use super::machine::{Effect, Event, LoginFlow, Rejection, RequestReason, Timings};
use crate::client::AuthApi;
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinHandle, time::sleep};
use tracing::{debug, warn};

pub struct FlowDriver<A: AuthApi> {
    api: Arc<A>,
    flow: LoginFlow,
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
    timers: Vec<JoinHandle<()>>,
    calls: Vec<JoinHandle<()>>,
}

impl<A: AuthApi> FlowDriver<A> {
    #[must_use]
    pub fn new(api: Arc<A>, timings: Timings) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            flow: LoginFlow::new(timings),
            tx,
            rx,
            timers: Vec::new(),
            calls: Vec::new(),
        }
    }

    #[must_use]
    pub fn flow(&self) -> &LoginFlow {
        &self.flow
    }

    /// Apply a user event and start whatever work it requires.
    ///
    /// # Errors
    /// Returns the [`Rejection`] from the flow; nothing is started in that case.
    pub fn dispatch(&mut self, event: Event) -> Result<(), Rejection> {
        let name = event.name();
        let effects = self.flow.update(event).inspect_err(|rejection| {
            debug!(event = name, step = %self.flow.step(), "login flow event rejected: {rejection}");
        })?;

        for effect in effects {
            self.perform(effect);
        }

        Ok(())
    }

    /// Wait for the next remote call or timer to complete and apply it.
    ///
    /// Pends forever when nothing is in flight, so callers usually race it
    /// against user input.
    ///
    /// # Errors
    /// Returns the [`Rejection`] for stale or out-of-place completions.
    pub async fn next(&mut self) -> Result<(), Rejection> {
        // The driver holds a sender, so the channel never closes.
        let Some(event) = self.rx.recv().await else {
            return std::future::pending().await;
        };
        self.dispatch(event)
    }

    /// Number of spawned calls and timers that have not finished yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.timers
            .iter()
            .chain(self.calls.iter())
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Abort every pending timer and remote call.
    pub fn shutdown(&mut self) {
        for handle in self.timers.drain(..).chain(self.calls.drain(..)) {
            handle.abort();
        }
    }

    fn perform(&mut self, effect: Effect) {
        self.timers.retain(|handle| !handle.is_finished());
        self.calls.retain(|handle| !handle.is_finished());

        match effect {
            Effect::RequestCode {
                epoch,
                reason,
                input,
            } => {
                let api = Arc::clone(&self.api);
                let tx = self.tx.clone();
                self.calls.push(tokio::spawn(async move {
                    let result = api.request_code(input).await;
                    if let Err(err) = &result {
                        warn!("request code failed: {err}");
                    }
                    let event = match reason {
                        RequestReason::Submit => Event::CodeRequested { epoch, result },
                        RequestReason::Resend => Event::CodeResent { epoch, result },
                    };
                    let _ = tx.send(event);
                }));
            }
            Effect::VerifyCode { epoch, input } => {
                let api = Arc::clone(&self.api);
                let tx = self.tx.clone();
                self.calls.push(tokio::spawn(async move {
                    let result = api.verify_code(input).await;
                    if let Err(err) = &result {
                        warn!("verify code failed: {err}");
                    }
                    let _ = tx.send(Event::VerifyResolved { epoch, result });
                }));
            }
            Effect::StartTimer {
                epoch,
                timer,
                after,
            } => {
                let tx = self.tx.clone();
                self.timers.push(tokio::spawn(async move {
                    sleep(after).await;
                    let _ = tx.send(Event::TimerElapsed { epoch, timer });
                }));
            }
            Effect::CancelTimers => {
                for handle in self.timers.drain(..) {
                    handle.abort();
                }
            }
        }
    }
}

impl<A: AuthApi> Drop for FlowDriver<A> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
