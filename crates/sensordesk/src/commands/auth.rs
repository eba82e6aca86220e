//! Login, logout and whoami.

use dialoguer::Input;
use secrecy::SecretString;

use sensordesk_core::Session;

use crate::cli::LoginArgs;
use crate::error::CliError;
use crate::output;

use super::Context;
use super::users::user_pairs;
use super::util;

pub async fn login(ctx: &mut Context<'_>, args: LoginArgs) -> Result<(), CliError> {
    let profile = ctx.config.profiles.get(&ctx.profile_name);

    // 1. Email: flag > profile > prompt
    let email = match args.email.or_else(|| profile.and_then(|p| p.email.clone())) {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(util::prompt_err)?,
    };

    // 2. Password: flag/env > keyring > profile plaintext > prompt
    let password = match args.password {
        Some(pw) => SecretString::from(pw),
        None => match profile.map(|p| sensordesk_config::resolve_password(p, &ctx.profile_name)) {
            Some(Ok(pw)) => pw,
            _ => SecretString::from(
                rpassword::prompt_password("Password: ").map_err(util::prompt_err)?,
            ),
        },
    };

    let session = ctx.backend.auth().login(&email, &password).await?;
    ctx.status(&format!(
        "✓ Signed in as {} ({}) on profile '{}'",
        session.user.name, session.user.role, ctx.profile_name
    ));
    Ok(())
}

pub async fn logout(ctx: &mut Context<'_>) -> Result<(), CliError> {
    ctx.backend.auth().logout().await?;
    ctx.status("✓ Signed out");
    Ok(())
}

pub fn whoami(ctx: &mut Context<'_>) -> Result<(), CliError> {
    let Some(Session { user, issued_at, .. }) = ctx.backend.auth().current() else {
        return Err(CliError::NotSignedIn);
    };
    let out = output::render_single(
        &ctx.global.output,
        &user,
        |u| {
            let mut pairs = user_pairs(u);
            pairs.push(("Since", issued_at.to_rfc3339()));
            output::detail_lines(&pairs)
        },
        |u| u.email.clone(),
    )?;
    ctx.output(&out);
    Ok(())
}
