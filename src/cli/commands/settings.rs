use crate::settings::{AccentColor, Language, ThemeMode};
use clap::{Arg, Command};

pub const CMD: &str = "settings";
pub const ARG_SETTINGS: &str = "settings";
pub const ARG_ACCENT_COLOR: &str = "accent-color";
pub const ARG_LANGUAGE: &str = "language";
pub const ARG_MODE: &str = "mode";
pub const ARG_CURSOR_TRAIL: &str = "cursor-trail";
pub const ARG_SITE_BACKGROUND: &str = "site-background";

#[must_use]
pub fn subcommand() -> Command {
    Command::new(CMD)
        .about("Show or change the saved settings")
        .arg(
            Arg::new(ARG_SETTINGS)
                .long("settings")
                .help("Settings file")
                .env("OTP_LOGIN_SETTINGS")
                .default_value(crate::settings::DEFAULT_SETTINGS_FILE),
        )
        .arg(
            Arg::new(ARG_ACCENT_COLOR)
                .long("accent-color")
                .help("Accent color, e.g. purple, teal, rose")
                .env("OTP_LOGIN_ACCENT_COLOR")
                .value_parser(|value: &str| value.parse::<AccentColor>().map_err(|e| e.to_string())),
        )
        .arg(
            Arg::new(ARG_LANGUAGE)
                .long("language")
                .help("Interface language: en, hu")
                .env("OTP_LOGIN_LANGUAGE")
                .value_parser(|value: &str| value.parse::<Language>().map_err(|e| e.to_string())),
        )
        .arg(
            Arg::new(ARG_MODE)
                .long("mode")
                .help("Theme mode: light, dark")
                .env("OTP_LOGIN_MODE")
                .value_parser(|value: &str| value.parse::<ThemeMode>().map_err(|e| e.to_string())),
        )
        .arg(
            Arg::new(ARG_CURSOR_TRAIL)
                .long("cursor-trail")
                .help("Enable the cursor trail")
                .env("OTP_LOGIN_CURSOR_TRAIL")
                .value_parser(clap::value_parser!(bool)),
        )
        .arg(
            Arg::new(ARG_SITE_BACKGROUND)
                .long("site-background")
                .help("Show the animated background")
                .env("OTP_LOGIN_SITE_BACKGROUND")
                .value_parser(clap::value_parser!(bool)),
        )
}
