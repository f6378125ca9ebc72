use crate::{
    api::{ApiClient, ApiConfig},
    cli::commands::client::Options,
    session::{AuthError, RegisterProfile, SessionStore, UpdateUserError, UserUpdate},
    storage::{FileStorage, MemoryStorage, Storage},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Builds the session store for one CLI process: durable state lives in the
/// data directory, tab-scoped state in memory.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built.
pub fn open_store(options: &Options) -> Result<SessionStore> {
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::in_dir(&options.data_dir));
    debug!("using session data dir {}", options.data_dir.display());

    let config = ApiConfig::new(&options.api_url).with_timeout(options.timeout);
    let api = ApiClient::new(config, storage.clone()).context("failed to build HTTP client")?;

    Ok(SessionStore::restore(
        Arc::new(api),
        storage,
        Arc::new(MemoryStorage::new()),
    ))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report_json<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(encoded) => eprintln!("{encoded}"),
        Err(err) => eprintln!("{err}"),
    }
}

fn auth_failure(err: AuthError) -> anyhow::Error {
    report_json(&err);
    anyhow::Error::new(err)
}

fn update_failure(err: UpdateUserError) -> anyhow::Error {
    match &err {
        UpdateUserError::Payload(payload) => report_json(payload),
        UpdateUserError::Message(message) => report_json(&json!({ "message": message })),
    }
    anyhow::Error::new(err)
}

/// # Errors
/// Returns an error if the login is rejected or the server is unreachable.
pub async fn login(options: &Options, username: &str, password: &SecretString) -> Result<()> {
    let store = open_store(options)?;
    let response = store
        .login(username, password)
        .await
        .map_err(auth_failure)?;

    print_json(&json!({
        "authenticated": true,
        "user": response.user,
    }))
}

/// # Errors
/// Returns an error if the registration is rejected or the server is unreachable.
pub async fn register(options: &Options, profile: &RegisterProfile) -> Result<()> {
    let store = open_store(options)?;
    let response = store.register(profile).await.map_err(auth_failure)?;

    print_json(&json!({
        "authenticated": true,
        "user": response.user,
        "new_barber_registration": store.take_new_barber_registration(),
    }))
}

/// # Errors
/// Returns an error only if the session store cannot be opened.
pub async fn logout(options: &Options) -> Result<()> {
    let store = open_store(options)?;
    store.logout().await;
    print_json(&json!({ "authenticated": false }))
}

/// # Errors
/// Returns an error if the session store cannot be opened.
pub fn whoami(options: &Options) -> Result<()> {
    let store = open_store(options)?;
    let session = store.session();

    print_json(&json!({
        "authenticated": session.is_authenticated(),
        "role": session.role(),
        "user": session.user(),
    }))
}

/// # Errors
/// Returns an error if nothing is to be updated or the server rejects the update.
pub async fn update_me(options: &Options, update: &UserUpdate) -> Result<()> {
    if update.is_empty() {
        anyhow::bail!("nothing to update: pass at least one profile field");
    }

    let store = open_store(options)?;
    let user = store.update_user(update).await.map_err(update_failure)?;
    print_json(&user)
}
