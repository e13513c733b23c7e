use clap::{Arg, Command};

pub const CMD: &str = "login";
pub const ARG_API_URL: &str = "api-url";
pub const ARG_SETTINGS: &str = "settings";
pub const ARG_CROSSFADE_MS: &str = "crossfade-ms";
pub const ARG_SETTLE_MS: &str = "settle-ms";

#[must_use]
pub fn subcommand() -> Command {
    Command::new(CMD)
        .about("Sign in interactively with an emailed one-time code")
        .arg(
            Arg::new(ARG_API_URL)
                .long("api-url")
                .help("Base URL of the otp-login server")
                .env("OTP_LOGIN_API_URL")
                .default_value("http://127.0.0.1:8080"),
        )
        .arg(
            Arg::new(ARG_SETTINGS)
                .long("settings")
                .help("Settings file")
                .env("OTP_LOGIN_SETTINGS")
                .default_value(crate::settings::DEFAULT_SETTINGS_FILE),
        )
        .arg(
            Arg::new(ARG_CROSSFADE_MS)
                .long("crossfade-ms")
                .help("Delay before the intro effect is removed after verification")
                .env("OTP_LOGIN_CROSSFADE_MS")
                .default_value("50")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_SETTLE_MS)
                .long("settle-ms")
                .help("Delay before the result is shown after verification")
                .env("OTP_LOGIN_SETTLE_MS")
                .default_value("2000")
                .value_parser(clap::value_parser!(u64)),
        )
}
