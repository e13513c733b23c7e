use clap::{Arg, Command};

pub const CMD: &str = "server";
pub const ARG_PORT: &str = "port";
pub const ARG_FRONTEND_BASE_URL: &str = "frontend-base-url";
pub const ARG_OTP_TTL_SECONDS: &str = "otp-ttl-seconds";
pub const ARG_OTP_ATTEMPTS: &str = "otp-attempts";
pub const ARG_RESEND_COOLDOWN_SECONDS: &str = "resend-cooldown-seconds";

#[must_use]
pub fn subcommand() -> Command {
    Command::new(CMD)
        .about("Serve the request-otp and sign-in procedures")
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("OTP_LOGIN_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_FRONTEND_BASE_URL)
                .long("frontend-base-url")
                .help("Frontend base URL allowed by CORS")
                .env("OTP_LOGIN_FRONTEND_BASE_URL")
                .default_value("http://localhost:3000"),
        )
        .arg(
            Arg::new(ARG_OTP_TTL_SECONDS)
                .long("otp-ttl-seconds")
                .help("Lifetime of a one-time code in seconds")
                .env("OTP_LOGIN_OTP_TTL_SECONDS")
                .default_value("300")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_OTP_ATTEMPTS)
                .long("otp-attempts")
                .help("Verification attempts allowed per code")
                .env("OTP_LOGIN_OTP_ATTEMPTS")
                .default_value("3")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new(ARG_RESEND_COOLDOWN_SECONDS)
                .long("resend-cooldown-seconds")
                .help("Minimum delay before another code is sent to the same address")
                .env("OTP_LOGIN_RESEND_COOLDOWN_SECONDS")
                .default_value("30")
                .value_parser(clap::value_parser!(u64)),
        )
}
