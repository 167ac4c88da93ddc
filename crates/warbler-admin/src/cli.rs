use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "warbler-admin", about = "Inspect and maintain a Warbler store", version)]
pub struct Cli {
    /// Defaults to `stats`
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print row counts for users, messages, follows and likes as JSON
    Stats,
    /// List users as JSON, optionally narrowed by a username substring
    Users {
        search: Option<String>,
    },
    /// Delete every user, message, follow and like
    Reset,
}

impl Cli {
    pub fn command(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Stats)
    }
}
