mod cmd;
mod logging;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mdbatch", version, about = "Batch rewriting for Markdown note collections")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print the resolved profile
    Doctor,

    /// Run the configured rewriters over every note under the root
    Run(RunArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Notes directory; overrides the profile root
    pub root: Option<PathBuf>,

    /// Derive slugs locally instead of calling the completions API
    #[arg(long)]
    pub offline: bool,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Doctor => cmd::doctor::run(cli.config.as_deref(), cli.profile.as_deref()),
        Commands::Run(args) => {
            cmd::run::run(cli.config.as_deref(), cli.profile.as_deref(), &args);
        }
    }
}
