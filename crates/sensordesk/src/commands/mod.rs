//! Command dispatch: bridges CLI args -> core services -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod sensors;
pub mod users;
pub mod util;

use tokio::sync::broadcast;

use sensordesk_core::{Backend, Notice, Outcome};

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;
use crate::output;

/// Everything a backend-bound handler needs.
pub struct Context<'a> {
    pub backend: Backend,
    pub global: &'a GlobalOpts,
    pub config: &'a Config,
    pub profile_name: String,
    notices: broadcast::Receiver<Notice>,
    color: bool,
}

impl<'a> Context<'a> {
    pub fn new(
        backend: Backend,
        global: &'a GlobalOpts,
        config: &'a Config,
        profile_name: String,
    ) -> Self {
        let notices = backend.notices().subscribe();
        Self {
            backend,
            global,
            config,
            profile_name,
            notices,
            color: output::should_color(&global.color),
        }
    }

    /// Print every notice reported so far.
    pub fn flush_notices(&mut self) {
        loop {
            match self.notices.try_recv() {
                Ok(notice) => output::print_notice(&notice, self.color),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "notices dropped");
                }
                Err(_) => break,
            }
        }
    }

    /// Flush notices and unpack `outcome`.
    ///
    /// `Empty` is `Ok(None)`; `Failed` has already been reported, so it
    /// only becomes a non-zero exit.
    pub fn settle<T>(&mut self, operation: &str, outcome: Outcome<T>) -> Result<Option<T>, CliError> {
        self.flush_notices();
        match outcome {
            Outcome::Ok(value) => Ok(Some(value)),
            Outcome::Empty => Ok(None),
            Outcome::Failed(_) => Err(CliError::Incomplete {
                operation: operation.into(),
            }),
        }
    }

    pub fn output(&self, rendered: &str) {
        output::print_output(rendered, self.global.quiet);
    }

    /// Status line on stderr, unless `--quiet`.
    pub fn status(&self, message: &str) {
        if !self.global.quiet {
            eprintln!("{message}");
        }
    }
}

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &mut Context<'_>) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(ctx, args).await,
        Command::Logout => auth::logout(ctx).await,
        Command::Whoami => auth::whoami(ctx),
        Command::Sensors(args) => sensors::handle(ctx, args).await,
        Command::Users(args) => users::handle(ctx, args).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions do not need a backend".into(),
        )),
    }
}
