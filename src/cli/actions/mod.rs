pub mod navigation;
pub mod session;

// Internal "interpreter" for `Action`.
mod run;

use crate::cli::commands::client::Options;
use crate::session::{RegisterProfile, UserUpdate};
use secrecy::SecretString;

#[derive(Debug)]
pub enum Action {
    Login {
        globals: Options,
        username: String,
        password: SecretString,
    },
    Register {
        globals: Options,
        profile: RegisterProfile,
    },
    Logout {
        globals: Options,
    },
    WhoAmI {
        globals: Options,
    },
    UpdateMe {
        globals: Options,
        update: UserUpdate,
    },
    Navigate {
        globals: Options,
        path: String,
    },
    Routes,
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
