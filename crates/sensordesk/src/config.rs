//! CLI configuration: thin wrapper around `sensordesk_config`.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--server, --insecure, --timeout).

use std::time::Duration;

use sensordesk_core::{ClientConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use sensordesk_config::{
    Config, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Build a `ClientConfig` from the config file, active profile and flags.
///
/// Flags win over the profile. Without a profile, `--server` alone is
/// enough.
pub fn resolve_client_config(
    global: &GlobalOpts,
    cfg: &Config,
    profile_name: &str,
) -> Result<ClientConfig, CliError> {
    let mut client = match (cfg.profiles.get(profile_name), global.server.as_deref()) {
        (Some(profile), server) => {
            let mut profile = profile.clone();
            if let Some(server) = server {
                server.clone_into(&mut profile.server);
            }
            sensordesk_config::profile_to_client_config(&profile, &cfg.defaults)?
        }
        (None, Some(server)) => {
            let profile = Profile {
                server: server.to_owned(),
                ..Profile::default()
            };
            sensordesk_config::profile_to_client_config(&profile, &cfg.defaults)?
        }
        (None, None) => {
            if global.profile.is_some() {
                return Err(profile_not_found(cfg, profile_name));
            }
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if global.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        client.timeout = Duration::from_secs(secs);
    }
    Ok(client)
}

/// `ProfileNotFound` listing whatever profiles do exist.
pub fn profile_not_found(cfg: &Config, name: &str) -> CliError {
    let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
    available.sort();
    CliError::ProfileNotFound {
        name: name.into(),
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}
