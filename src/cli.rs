use clap::{Parser, Subcommand};
use std::ffi::OsString;

#[derive(Debug, Parser)]
#[command(
    name = "uptime-kuma",
    version,
    about = "Register HTTP monitors for new sites in Uptime Kuma",
    after_help = "Environment: UPTIME_KUMA_URL (required), UPTIME_KUMA_TOKEN, UPTIME_KUMA_USER, UPTIME_KUMA_PASSWORD"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Register an HTTP monitor named DOMAIN that checks URL
    Add {
        domain: String,
        url: String,
        /// Anything after URL is accepted and ignored.
        #[arg(hide = true, allow_hyphen_values = true)]
        ignored: Vec<String>,
    },
}

/// Parses command-line arguments, accepting the subcommand in any case.
pub fn parse_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args = args.into_iter().map(Into::<OsString>::into).enumerate().map(|(i, arg)| {
        if i == 1 && arg.to_str().is_some_and(|s| s.eq_ignore_ascii_case("add")) {
            OsString::from("add")
        } else {
            arg
        }
    });
    Cli::try_parse_from(args)
}
