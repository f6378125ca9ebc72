use crate::cli::actions::{navigation, session, Action};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Login {
            globals,
            username,
            password,
        } => session::login(&globals, &username, &password).await,
        Action::Register { globals, profile } => session::register(&globals, &profile).await,
        Action::Logout { globals } => session::logout(&globals).await,
        Action::WhoAmI { globals } => session::whoami(&globals),
        Action::UpdateMe { globals, update } => session::update_me(&globals, &update).await,
        Action::Navigate { globals, path } => navigation::navigate(&globals, &path),
        Action::Routes => navigation::routes(),
    }
}
