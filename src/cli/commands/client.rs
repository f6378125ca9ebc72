use crate::api::DEFAULT_API_URL;
use clap::{Arg, ArgMatches, Command};
use std::{path::PathBuf, time::Duration};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_DATA_DIR: &str = "data-dir";
pub const ARG_TIMEOUT: &str = "timeout";

const APP_DIR: &str = "barbershop";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long("api-url")
                .help("Base URL of the booking API")
                .env("BARBERSHOP_API_URL")
                .global(true)
                .default_value(DEFAULT_API_URL),
        )
        .arg(
            Arg::new(ARG_DATA_DIR)
                .long("data-dir")
                .help("Directory holding the persisted session")
                .long_help(
                    "Directory holding the persisted session. Defaults to the platform data directory (e.g. $XDG_DATA_HOME/barbershop on Linux).",
                )
                .env("BARBERSHOP_DATA_DIR")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long("timeout")
                .help("Request timeout in seconds (default: wait indefinitely)")
                .env("BARBERSHOP_TIMEOUT_SECONDS")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub api_url: String,
    pub data_dir: PathBuf,
    pub timeout: Option<Duration>,
}

impl Options {
    /// Parse connection arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the API URL is empty or not a valid URL.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let api_url = match matches.get_one::<String>(ARG_API_URL) {
            Some(value) if !value.trim().is_empty() => value.trim().to_string(),
            _ => anyhow::bail!("missing required argument: --{ARG_API_URL}"),
        };
        url::Url::parse(&api_url)
            .map_err(|err| anyhow::anyhow!("invalid --{ARG_API_URL} {api_url}: {err}"))?;

        let data_dir = matches
            .get_one::<PathBuf>(ARG_DATA_DIR)
            .filter(|dir| !dir.as_os_str().is_empty())
            .cloned()
            .unwrap_or_else(default_data_dir);

        let timeout = matches
            .get_one::<u64>(ARG_TIMEOUT)
            .copied()
            .map(Duration::from_secs);

        Ok(Self {
            api_url,
            data_dir,
            timeout,
        })
    }
}

/// Platform data directory (e.g. `$XDG_DATA_HOME` on Linux), `./.barbershop`
/// when none can be determined.
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".barbershop"))
}
