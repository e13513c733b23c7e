pub mod login;
pub mod server;
pub mod settings;

// Keeps the match out of mod.rs as actions grow.
mod run;

#[derive(Debug)]
pub enum Action {
    Server(server::Args),
    Login(login::Args),
    Settings(settings::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
