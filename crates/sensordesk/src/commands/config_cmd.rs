//! Config subcommand handlers.

use dialoguer::{Input, Select};

use sensordesk_core::PasswordPolicy;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::{confirm, prompt_err};

const VALID_KEYS: &str = "server, email, password, password_policy, ca_cert, insecure, \
                          timeout, search_debounce_ms, page_size";

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking the password.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "search_debounce_ms = {}", cfg.defaults.search_debounce_ms);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "server = \"{}\"", p.server);
        if let Some(ref email) = p.email {
            let _ = writeln!(out, "email = \"{email}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref policy) = p.password_policy {
            let _ = writeln!(out, "password_policy = \"{policy}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(ms) = p.search_debounce_ms {
            let _ = writeln!(out, "search_debounce_ms = {ms}");
        }
        if let Some(size) = p.page_size {
            let _ = writeln!(out, "page_size = {size}");
        }
    }

    out
}

fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("****".into());
        }
    }
    cfg
}

fn save_config(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

fn parse_value<T: std::str::FromStr>(field: &str, value: &str, hint: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: hint.into(),
    })
}

/// Offer to keep the password in the system keyring.
///
/// Returns `Some(password)` if the user chose plaintext, `None` if it
/// went to the keyring.
fn prompt_password_storage(profile_name: &str, password: String) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        sensordesk_config::store_password(profile_name, &password)?;
        eprintln!("   ✓ Password stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(password))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("sensordesk configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let mut cfg = config::load_config_or_default();
            if cfg.profiles.contains_key(&profile_name)
                && !confirm(&format!("Profile '{profile_name}' exists. Overwrite?"), global.yes)?
            {
                return Ok(());
            }

            // 2. Backend URL
            let server: String = Input::new()
                .with_prompt("Backend URL")
                .default("http://localhost:8080".into())
                .validate_with(|raw: &String| {
                    sensordesk_config::parse_server_url(raw)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            // 3. Email
            let email: String = Input::new()
                .with_prompt("Email")
                .validate_with(|raw: &String| {
                    sensordesk_core::validate::email(raw).map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            // 4. Password, optional
            let password = rpassword::prompt_password("Password (empty to skip): ")
                .map_err(prompt_err)?;
            let password = if password.is_empty() {
                None
            } else {
                PasswordPolicy::default()
                    .check(&password)
                    .map_err(|e| CliError::Validation {
                        field: "password".into(),
                        reason: e.to_string(),
                    })?;
                prompt_password_storage(&profile_name, password)?
            };

            // 5. Merge into the existing config
            let profile = Profile {
                server,
                email: Some(email),
                password,
                ..Profile::default()
            };
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Next: sensordesk login");

            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(&global.output, &cfg, format_config_redacted, |c| {
                c.default_profile.clone().unwrap_or_default()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            match key.as_str() {
                "server" => {
                    sensordesk_config::parse_server_url(&value)?;
                    profile.server = value;
                }
                "email" => {
                    sensordesk_core::validate::email(&value).map_err(|e| CliError::Validation {
                        field: "email".into(),
                        reason: e.to_string(),
                    })?;
                    profile.email = Some(value);
                }
                "password" => profile.password = Some(value),
                "password_policy" | "password-policy" => {
                    value
                        .parse::<PasswordPolicy>()
                        .map_err(|reason| CliError::Validation {
                            field: "password_policy".into(),
                            reason,
                        })?;
                    profile.password_policy = Some(value);
                }
                "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
                "insecure" => {
                    profile.insecure = Some(parse_value("insecure", &value, "must be 'true' or 'false'")?);
                }
                "timeout" => {
                    profile.timeout = Some(parse_value("timeout", &value, "must be a number (seconds)")?);
                }
                "search_debounce_ms" | "search-debounce-ms" => {
                    profile.search_debounce_ms = Some(parse_value(
                        "search_debounce_ms",
                        &value,
                        "must be a number (milliseconds)",
                    )?);
                }
                "page_size" | "page-size" => {
                    let size: u32 = parse_value("page_size", &value, "must be a positive number")?;
                    if size == 0 {
                        return Err(CliError::Validation {
                            field: "page_size".into(),
                            reason: "must be a positive number".into(),
                        });
                    }
                    profile.page_size = Some(size);
                }
                other => {
                    return Err(CliError::Validation {
                        field: other.into(),
                        reason: format!("unknown config key '{other}'. Valid keys: {VALID_KEYS}"),
                    });
                }
            }

            save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Set {key} on profile '{profile_name}'");
            }
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: sensordesk config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(config::profile_not_found(&cfg, &name));
            }

            cfg.default_profile = Some(name.clone());
            save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Default profile set to '{name}'");
            }
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            if !cfg.profiles.contains_key(&profile_name) {
                return Err(config::profile_not_found(&cfg, &profile_name));
            }

            let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "value cannot be empty".into(),
                });
            }
            sensordesk_config::store_password(&profile_name, &password)?;

            eprintln!("✓ Password stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

