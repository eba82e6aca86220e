mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sensordesk_core::{Backend, FileSessionStore, SessionContext};

use crate::cli::{Cli, Command};
use crate::commands::Context;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a backend
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "sensordesk", &mut std::io::stdout());
            Ok(())
        }

        // Everything else talks to the backend
        cmd => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(&cli.global, &cfg);
            let client_config = config::resolve_client_config(&cli.global, &cfg, &profile_name)?;

            let session_path = sensordesk_config::session_path(&profile_name);
            let session = SessionContext::restore(FileSessionStore::new(session_path));
            let backend = Backend::new(client_config, session)?;

            let mut ctx = Context::new(backend, &cli.global, &cfg, profile_name);
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &mut ctx).await
        }
    }
}
