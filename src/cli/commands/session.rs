use crate::session::UserType;
use clap::{builder::ValueParser, Arg, Command};

pub const CMD_LOGIN: &str = "login";
pub const CMD_REGISTER: &str = "register";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_WHOAMI: &str = "whoami";
pub const CMD_UPDATE_ME: &str = "update-me";

pub const ARG_USERNAME: &str = "username";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_PASSWORD2: &str = "password2";
pub const ARG_EMAIL: &str = "email";
pub const ARG_FIRST_NAME: &str = "first-name";
pub const ARG_LAST_NAME: &str = "last-name";
pub const ARG_USER_TYPE: &str = "user-type";
pub const ARG_PHONE: &str = "phone";
pub const ARG_BIRTH_DATE: &str = "birth-date";

#[must_use]
pub fn validator_user_type() -> ValueParser {
    ValueParser::from(move |value: &str| -> std::result::Result<UserType, String> {
        value.parse::<UserType>()
    })
}

/// Accepts a calendar date as `YYYY-MM-DD`, the date format of the profile endpoints.
#[must_use]
pub fn validator_birth_date() -> ValueParser {
    ValueParser::from(move |value: &str| -> std::result::Result<String, String> {
        if is_calendar_date(value) {
            Ok(value.to_string())
        } else {
            Err("expected a valid date as YYYY-MM-DD".to_string())
        }
    })
}

fn is_calendar_date(value: &str) -> bool {
    let parts: Vec<&str> = value.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return false;
    };
    if year.len() != 4
        || month.len() != 2
        || day.len() != 2
        || !parts.iter().all(|part| part.bytes().all(|b| b.is_ascii_digit()))
    {
        return false;
    }
    let (Ok(year), Ok(month), Ok(day)) = (
        year.parse::<u32>(),
        month.parse::<u32>(),
        day.parse::<u32>(),
    ) else {
        return false;
    };
    let leap = year % 4 == 0 && (year % 100 != 0 || year % 400 == 0);
    let last_day = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if leap => 29,
        2 => 28,
        _ => return false,
    };
    (1..=last_day).contains(&day)
}

fn profile_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_FIRST_NAME)
                .long("first-name")
                .help("First name"),
        )
        .arg(Arg::new(ARG_LAST_NAME).long("last-name").help("Last name"))
        .arg(Arg::new(ARG_PHONE).long("phone").help("Phone number"))
        .arg(
            Arg::new(ARG_BIRTH_DATE)
                .long("birth-date")
                .help("Birth date (YYYY-MM-DD)")
                .value_parser(validator_birth_date()),
        )
}

fn login() -> Command {
    Command::new(CMD_LOGIN)
        .about("Sign in and persist the session")
        .arg(
            Arg::new(ARG_USERNAME)
                .short('u')
                .long("username")
                .help("Account username")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .short('p')
                .long("password")
                .help("Account password")
                .env("BARBERSHOP_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
}

fn register() -> Command {
    let command = Command::new(CMD_REGISTER)
        .about("Create an account and sign in with it")
        .arg(
            Arg::new(ARG_USERNAME)
                .short('u')
                .long("username")
                .help("Account username")
                .required(true),
        )
        .arg(
            Arg::new(ARG_EMAIL)
                .long("email")
                .help("Email address")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .short('p')
                .long("password")
                .help("Account password")
                .env("BARBERSHOP_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_PASSWORD2)
                .long("password2")
                .help("Password confirmation")
                .required(true),
        )
        .arg(
            Arg::new(ARG_USER_TYPE)
                .long("user-type")
                .help("Account type: client, barber or admin")
                .default_value("client")
                .value_parser(validator_user_type()),
        );
    profile_args(command)
}

fn update_me() -> Command {
    let command = Command::new(CMD_UPDATE_ME)
        .about("Update the signed-in user's profile")
        .arg(Arg::new(ARG_EMAIL).long("email").help("Email address"));
    profile_args(command)
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(login())
        .subcommand(register())
        .subcommand(Command::new(CMD_LOGOUT).about("Sign out and clear the persisted session"))
        .subcommand(Command::new(CMD_WHOAMI).about("Show the restored session"))
        .subcommand(update_me())
}
