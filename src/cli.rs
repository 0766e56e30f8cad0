use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "placement-board", about = "Pay-to-apply job board with placement guarantee")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run migrations and start the HTTP server (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Create an admin account, or promote an existing user
    CreateAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Set the global application fee, in minor units
    SetFee {
        #[arg(long)]
        amount_cents: i32,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}
