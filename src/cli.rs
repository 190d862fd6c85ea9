use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "chefai",
    version,
    about = "AI weekly meal planner: dietary profile -> prompt -> Gemini -> validated plan"
)]
pub struct Args {
    /// Optional TOML config file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API.
    Serve {
        /// Override the configured bind address.
        #[arg(long)]
        bind: Option<String>,
    },
    /// One-shot generation from a TOML profile file, rendered to the
    /// terminal. Useful for exercising the prompt and extraction path
    /// without a browser client.
    Generate {
        /// Profile file (TOML, camelCase keys matching the wire format).
        #[arg(long)]
        profile: PathBuf,
        /// Print the accepted plan as JSON instead of rendering it.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}
