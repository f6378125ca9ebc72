use clap::{Arg, Command};

pub const CMD_NAVIGATE: &str = "navigate";
pub const CMD_ROUTES: &str = "routes";

pub const ARG_PATH: &str = "path";

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_NAVIGATE)
                .about("Resolve a path through the route guards for the current session")
                .arg(
                    Arg::new(ARG_PATH)
                        .help("Path to open, e.g. /admin/barbers")
                        .required(true),
                ),
        )
        .subcommand(Command::new(CMD_ROUTES).about("List routes and their access requirements"))
}
