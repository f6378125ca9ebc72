//! Maps validated CLI matches to an action.

use crate::cli::actions::Action;
use crate::cli::commands::{
    client::Options,
    navigation::{ARG_PATH, CMD_NAVIGATE, CMD_ROUTES},
    session::{
        ARG_BIRTH_DATE, ARG_EMAIL, ARG_FIRST_NAME, ARG_LAST_NAME, ARG_PASSWORD, ARG_PASSWORD2,
        ARG_PHONE, ARG_USERNAME, ARG_USER_TYPE, CMD_LOGIN, CMD_LOGOUT, CMD_REGISTER,
        CMD_UPDATE_ME, CMD_WHOAMI,
    },
};
use crate::session::{RegisterProfile, UserType, UserUpdate};
use anyhow::{Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;

// Filters empty strings, which clap passes through when env vars are set to "".
fn get_non_empty(matches: &ArgMatches, id: &str) -> Option<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .filter(|value| !value.trim().is_empty())
}

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    get_non_empty(matches, id).with_context(|| format!("missing required argument: --{id}"))
}

fn secret(matches: &ArgMatches, id: &str) -> Result<SecretString> {
    required(matches, id).map(SecretString::from)
}

fn register_profile(matches: &ArgMatches) -> Result<RegisterProfile> {
    let mut profile = RegisterProfile::new(
        &required(matches, ARG_USERNAME)?,
        &required(matches, ARG_EMAIL)?,
        secret(matches, ARG_PASSWORD)?,
        secret(matches, ARG_PASSWORD2)?,
    )
    .with_user_type(
        matches
            .get_one::<UserType>(ARG_USER_TYPE)
            .copied()
            .unwrap_or_default(),
    );

    profile.first_name = get_non_empty(matches, ARG_FIRST_NAME).unwrap_or_default();
    profile.last_name = get_non_empty(matches, ARG_LAST_NAME).unwrap_or_default();
    profile.phone = get_non_empty(matches, ARG_PHONE);
    profile.birth_date = get_non_empty(matches, ARG_BIRTH_DATE);
    Ok(profile)
}

fn user_update(matches: &ArgMatches) -> UserUpdate {
    UserUpdate {
        email: get_non_empty(matches, ARG_EMAIL),
        first_name: get_non_empty(matches, ARG_FIRST_NAME),
        last_name: get_non_empty(matches, ARG_LAST_NAME),
        phone: get_non_empty(matches, ARG_PHONE),
        birth_date: get_non_empty(matches, ARG_BIRTH_DATE),
    }
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let (name, sub) = matches
        .subcommand()
        .context("missing subcommand, see --help")?;

    if name == CMD_ROUTES {
        return Ok(Action::Routes);
    }

    let globals = Options::parse(matches)?;

    let action = match name {
        CMD_LOGIN => Action::Login {
            globals,
            username: required(sub, ARG_USERNAME)?,
            password: secret(sub, ARG_PASSWORD)?,
        },
        CMD_REGISTER => Action::Register {
            globals,
            profile: register_profile(sub)?,
        },
        CMD_LOGOUT => Action::Logout { globals },
        CMD_WHOAMI => Action::WhoAmI { globals },
        CMD_UPDATE_ME => Action::UpdateMe {
            globals,
            update: user_update(sub),
        },
        CMD_NAVIGATE => Action::Navigate {
            globals,
            path: required(sub, ARG_PATH)?,
        },
        other => anyhow::bail!("unknown subcommand: {other}"),
    };

    Ok(action)
}
