//! Maps validated CLI matches to the action to run.

use crate::cli::{
    actions::{login, server, settings, Action},
    commands,
};
use crate::flow::Timings;
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use std::{path::PathBuf, time::Duration};

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if the subcommand or one of its arguments is missing.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((commands::server::CMD, sub_m)) => Ok(Action::Server(server_args(sub_m)?)),
        Some((commands::login::CMD, sub_m)) => Ok(Action::Login(login_args(sub_m)?)),
        Some((commands::settings::CMD, sub_m)) => Ok(Action::Settings(settings_args(sub_m)?)),
        Some((other, _)) => Err(anyhow!("unknown subcommand: {other}")),
        None => Err(anyhow!("missing subcommand")),
    }
}

fn required<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str) -> Result<T> {
    matches
        .get_one::<T>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn server_args(matches: &ArgMatches) -> Result<server::Args> {
    use commands::server::{
        ARG_FRONTEND_BASE_URL, ARG_OTP_ATTEMPTS, ARG_OTP_TTL_SECONDS, ARG_PORT,
        ARG_RESEND_COOLDOWN_SECONDS,
    };

    Ok(server::Args {
        port: matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080),
        frontend_base_url: required(matches, ARG_FRONTEND_BASE_URL)?,
        otp_ttl_seconds: required(matches, ARG_OTP_TTL_SECONDS)?,
        otp_attempts: required(matches, ARG_OTP_ATTEMPTS)?,
        resend_cooldown_seconds: required(matches, ARG_RESEND_COOLDOWN_SECONDS)?,
    })
}

fn login_args(matches: &ArgMatches) -> Result<login::Args> {
    use commands::login::{ARG_API_URL, ARG_CROSSFADE_MS, ARG_SETTINGS, ARG_SETTLE_MS};

    Ok(login::Args {
        api_url: required(matches, ARG_API_URL)?,
        settings_path: PathBuf::from(required::<String>(matches, ARG_SETTINGS)?),
        timings: Timings {
            crossfade: Duration::from_millis(required(matches, ARG_CROSSFADE_MS)?),
            settle: Duration::from_millis(required(matches, ARG_SETTLE_MS)?),
        },
    })
}

fn settings_args(matches: &ArgMatches) -> Result<settings::Args> {
    use commands::settings::{
        ARG_ACCENT_COLOR, ARG_CURSOR_TRAIL, ARG_LANGUAGE, ARG_MODE, ARG_SETTINGS,
        ARG_SITE_BACKGROUND,
    };

    Ok(settings::Args {
        path: PathBuf::from(required::<String>(matches, ARG_SETTINGS)?),
        accent_color: matches.get_one(ARG_ACCENT_COLOR).copied(),
        language: matches.get_one(ARG_LANGUAGE).copied(),
        mode: matches.get_one(ARG_MODE).copied(),
        cursor_trail: matches.get_one::<bool>(ARG_CURSOR_TRAIL).copied(),
        site_background: matches.get_one::<bool>(ARG_SITE_BACKGROUND).copied(),
    })
}
