use crate::{
    backdrop::{DotMatrix, LayerClock},
    client::HttpAuthClient,
    flow::{Event, FlowDriver, FlowState, LoginFlow, Rejection, Scene, Timings, CODE_LENGTH},
    settings::{Language, Settings},
};
use anyhow::{Context, Result};
use std::{path::PathBuf, sync::Arc, time::Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const FRAME_COLS: usize = 48;
const FRAME_ROWS: usize = 6;

#[derive(Debug)]
pub struct Args {
    pub api_url: String,
    pub settings_path: PathBuf,
    pub timings: Timings,
}

/// Run the login wizard on stdin/stdout until the user signs in or quits.
/// # Errors
/// Returns an error if the API URL is invalid or stdin cannot be read.
pub async fn execute(args: Args) -> Result<()> {
    let settings = Settings::load(&args.settings_path);
    let client = HttpAuthClient::new(&args.api_url)
        .with_context(|| format!("Invalid API URL: {}", args.api_url))?;
    let mut driver = FlowDriver::new(Arc::new(client), args.timings);
    let mut screen = Screen::new(settings);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    screen.draw(driver.flow());

    while !driver.flow().step().is_terminal() {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                match input_events(driver.flow(), &line) {
                    Input::Quit => break,
                    Input::Events(events) => {
                        for event in events {
                            if let Err(rejection) = driver.dispatch(event) {
                                screen.reject(&rejection);
                                break;
                            }
                        }
                    }
                }
            }
            result = driver.next() => {
                if let Err(rejection) = result {
                    debug!("Ignored completion: {rejection}");
                }
            }
        }

        screen.draw(driver.flow());
    }

    debug!(
        step = %driver.flow().step(),
        pending = driver.in_flight(),
        "Leaving login"
    );
    driver.shutdown();

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Quit,
    Events(Vec<Event>),
}

/// Translate one line of terminal input into flow events for the current step.
fn input_events(flow: &LoginFlow, line: &str) -> Input {
    let line = line.trim();
    if line == ":quit" {
        return Input::Quit;
    }

    let events = match flow.step() {
        FlowState::Email => vec![Event::EmailEdited(line.to_string()), Event::SubmitEmail],
        FlowState::Code => match line {
            ":back" => vec![Event::Back],
            ":resend" => vec![Event::Resend],
            "<" => delete_events(flow),
            digits => {
                let start = flow.code().focus();
                digits
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .zip(start..CODE_LENGTH)
                    .map(|(c, index)| Event::DigitEntered {
                        index,
                        value: c.to_string(),
                    })
                    .collect()
            }
        },
        FlowState::Error => vec![Event::GoBack],
        FlowState::Success => Vec::new(),
    };

    Input::Events(events)
}

// A filled slot is cleared in place; an empty one hands focus back first.
fn delete_events(flow: &LoginFlow) -> Vec<Event> {
    let focus = flow.code().focus();
    if !flow.code().slots()[focus].is_empty() {
        return vec![Event::DigitEntered {
            index: focus,
            value: String::new(),
        }];
    }
    if focus == 0 {
        return Vec::new();
    }
    vec![
        Event::Backspace { index: focus },
        Event::DigitEntered {
            index: focus - 1,
            value: String::new(),
        },
    ]
}

struct Text {
    email_prompt: &'static str,
    sending: &'static str,
    request_failed: &'static str,
    code_sent: &'static str,
    code_hint: &'static str,
    verifying: &'static str,
    resending: &'static str,
    success: &'static str,
    failed: &'static str,
    retry: &'static str,
}

const ENGLISH: Text = Text {
    email_prompt: "Email address:",
    sending: "Sending code...",
    request_failed: "Could not send a code",
    code_sent: "Enter the code we sent to",
    code_hint: "Type the digits, '<' deletes, ':resend' sends a new code, ':back' changes the email, ':quit' exits.",
    verifying: "Verifying...",
    resending: "A new code is on its way.",
    success: "Signed in successfully.",
    failed: "Verification failed",
    retry: "Press Enter to try again.",
};

const HUNGARIAN: Text = Text {
    email_prompt: "E-mail cím:",
    sending: "Kód küldése...",
    request_failed: "Nem sikerült elküldeni a kódot",
    code_sent: "Írd be a kódot, amit ide küldtünk:",
    code_hint: "Írd be a számjegyeket, '<' töröl, ':resend' új kódot küld, ':back' az e-mail módosítása, ':quit' kilépés.",
    verifying: "Ellenőrzés...",
    resending: "Úton van az új kód.",
    success: "Sikeres bejelentkezés.",
    failed: "Sikertelen ellenőrzés",
    retry: "Nyomj Entert az újrapróbáláshoz.",
};

const fn text(language: Language) -> &'static Text {
    match language {
        Language::English => &ENGLISH,
        Language::Hungarian => &HUNGARIAN,
    }
}

fn format_slots(flow: &LoginFlow) -> String {
    flow.code()
        .slots()
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let value = if slot.is_empty() { " " } else { slot.as_str() };
            if index == flow.code().focus() && !flow.is_loading() {
                format!("<{value}>")
            } else {
                format!("[{value}]")
            }
        })
        .collect()
}

/// Text for the current step, without the background frame.
fn describe(flow: &LoginFlow, text: &Text) -> String {
    let mut lines = Vec::new();

    match flow.step() {
        FlowState::Email => {
            if flow.is_requesting() {
                lines.push(text.sending.to_string());
            } else {
                if let Some(failure) = flow.request_error() {
                    lines.push(format!("{}: {}", text.request_failed, failure.message));
                }
                lines.push(text.email_prompt.to_string());
            }
        }
        FlowState::Code => {
            lines.push(format!("{} {}", text.code_sent, flow.email().trim()));
            lines.push(format_slots(flow));
            if flow.is_loading() {
                lines.push(text.verifying.to_string());
            } else {
                if !flow.resend_open() {
                    lines.push(text.resending.to_string());
                } else if let Some(failure) = flow.request_error() {
                    lines.push(format!("{}: {}", text.request_failed, failure.message));
                }
                lines.push(text.code_hint.to_string());
            }
        }
        FlowState::Success => lines.push(text.success.to_string()),
        FlowState::Error => {
            let message = flow
                .verification_error()
                .map(|failure| failure.message.as_str())
                .unwrap_or_default();
            lines.push(format!("{}: {message}", text.failed));
            lines.push(text.retry.to_string());
        }
    }

    lines.join("\n")
}

/// Redraws only when the visible state changes.
struct Screen {
    settings: Settings,
    matrix: DotMatrix,
    clock: LayerClock,
    last: Option<(Scene, String)>,
}

impl Screen {
    fn new(settings: Settings) -> Self {
        Self {
            settings,
            matrix: DotMatrix::default(),
            clock: LayerClock::new(),
            last: None,
        }
    }

    fn draw(&mut self, flow: &LoginFlow) {
        let body = describe(flow, text(self.settings.language));
        let view = (flow.scene(), body);
        let layers = self.clock.tick(view.0.backdrop(), Instant::now());
        if self.last.as_ref() == Some(&view) {
            return;
        }

        if self.settings.theme.site_background {
            let frame = self.matrix.render(FRAME_COLS, FRAME_ROWS, &layers);
            print!(
                "\x1b[38;5;{}m{frame}\x1b[0m",
                self.settings.theme.accent_color.ansi()
            );
        }
        println!("{}", view.1);

        self.last = Some(view);
    }

    fn reject(&mut self, rejection: &Rejection) {
        if let Rejection::Guard(reason) = rejection {
            println!("! {reason}");
        }
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::BaseResponse;

    fn flow_on_code() -> Result<LoginFlow, Rejection> {
        let mut flow = LoginFlow::default();
        flow.update(Event::EmailEdited("user@example.com".to_string()))?;
        flow.update(Event::SubmitEmail)?;
        flow.update(Event::CodeRequested {
            epoch: 0,
            result: Ok(BaseResponse::ok("OTP sent successfully")),
        })?;
        Ok(flow)
    }

    fn digit(index: usize, value: &str) -> Event {
        Event::DigitEntered {
            index,
            value: value.to_string(),
        }
    }

    #[test]
    fn email_line_submits_trimmed_address() {
        let flow = LoginFlow::default();
        assert_eq!(
            input_events(&flow, "  user@example.com \n"),
            Input::Events(vec![
                Event::EmailEdited("user@example.com".to_string()),
                Event::SubmitEmail
            ])
        );
        assert_eq!(input_events(&flow, ":quit"), Input::Quit);
    }

    #[test]
    fn digits_fill_from_focus() -> Result<(), Rejection> {
        let mut flow = flow_on_code()?;
        assert_eq!(
            input_events(&flow, "12 3"),
            Input::Events(vec![digit(0, "1"), digit(1, "2"), digit(2, "3")])
        );

        flow.update(digit(0, "1"))?;
        flow.update(digit(1, "2"))?;
        // Extra characters past the last slot are dropped.
        assert_eq!(
            input_events(&flow, "3456789"),
            Input::Events(vec![
                digit(2, "3"),
                digit(3, "4"),
                digit(4, "5"),
                digit(5, "6")
            ])
        );
        Ok(())
    }

    #[test]
    fn commands_on_code_step() -> Result<(), Rejection> {
        let flow = flow_on_code()?;
        assert_eq!(input_events(&flow, ":back"), Input::Events(vec![Event::Back]));
        assert_eq!(
            input_events(&flow, ":resend"),
            Input::Events(vec![Event::Resend])
        );
        // Nothing to delete on the first empty slot.
        assert_eq!(input_events(&flow, "<"), Input::Events(Vec::new()));
        Ok(())
    }

    #[test]
    fn delete_steps_back_over_empty_slot() -> Result<(), Rejection> {
        let mut flow = flow_on_code()?;
        flow.update(digit(0, "1"))?;
        flow.update(digit(1, "2"))?;
        assert_eq!(flow.code().focus(), 2);

        assert_eq!(
            input_events(&flow, "<"),
            Input::Events(vec![Event::Backspace { index: 2 }, digit(1, "")])
        );

        flow.update(Event::Backspace { index: 2 })?;
        flow.update(digit(1, ""))?;
        assert_eq!(flow.code().code(), "1");
        assert_eq!(flow.code().focus(), 1);
        Ok(())
    }

    #[test]
    fn error_step_goes_back_on_any_line() -> Result<(), Rejection> {
        let mut flow = flow_on_code()?;
        for (index, value) in "123456".chars().enumerate() {
            flow.update(digit(index, &value.to_string()))?;
        }
        let epoch = flow.epoch();
        flow.update(Event::VerifyResolved {
            epoch,
            result: Ok(BaseResponse {
                success: false,
                message: Some("Invalid code".to_string()),
            }),
        })?;
        flow.update(Event::TimerElapsed {
            epoch,
            timer: crate::flow::Timer::Settle,
        })?;

        assert_eq!(flow.step(), FlowState::Error);
        assert_eq!(input_events(&flow, ""), Input::Events(vec![Event::GoBack]));
        let body = describe(&flow, &ENGLISH);
        assert!(body.contains("Verification failed"));
        Ok(())
    }

    #[test]
    fn describe_code_step_marks_focus() -> Result<(), Rejection> {
        let mut flow = flow_on_code()?;
        flow.update(digit(0, "7"))?;

        let body = describe(&flow, &ENGLISH);
        assert!(body.contains("user@example.com"));
        assert!(body.contains("[7]< >[ ][ ][ ][ ]"));
        Ok(())
    }

    #[test]
    fn describe_uses_language() {
        let flow = LoginFlow::default();
        assert_eq!(describe(&flow, text(Language::English)), "Email address:");
        assert_eq!(describe(&flow, text(Language::Hungarian)), "E-mail cím:");
    }
}
