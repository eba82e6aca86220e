//! User command handlers.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tabled::Tabled;

use sensordesk_core::{NewUser, Role, User, UserQuery};

use crate::cli::{UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::Context;
use super::util;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "UUID")]
    uuid: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Role")]
    role: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            uuid: u.uuid.clone(),
            name: u.name.clone(),
            email: u.email.clone(),
            phone: u.phone.clone(),
            role: u.role.to_string(),
        }
    }
}

pub(super) fn user_pairs(user: &User) -> Vec<(&'static str, String)> {
    let mut pairs = vec![
        ("UUID", user.uuid.clone()),
        ("Name", user.name.clone()),
        ("Email", user.email.clone()),
        ("Phone", user.phone.clone()),
        ("Role", user.role.to_string()),
    ];
    if let Some(picture) = &user.picture {
        pairs.push(("Picture", picture.clone()));
    }
    pairs
}

/// `--picture` value as stored by the backend.
///
/// URLs (including `data:` URLs) are kept as given. Anything else is read
/// as an image file and inlined as a base64 data URL.
fn picture_value(raw: &str) -> Result<String, CliError> {
    let raw = raw.trim();
    if raw.is_empty() || ["http://", "https://", "data:"].iter().any(|p| raw.starts_with(p)) {
        return Ok(raw.to_owned());
    }

    let path = Path::new(raw);
    let bytes = std::fs::read(path).map_err(|e| CliError::Validation {
        field: "picture".into(),
        reason: format!("cannot read '{raw}': {e}"),
    })?;
    let mime = match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    };
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

fn print_one(ctx: &Context<'_>, user: &User) -> Result<(), CliError> {
    let out = output::render_single(
        &ctx.global.output,
        user,
        |u| output::detail_lines(&user_pairs(u)),
        |u| u.uuid.clone(),
    )?;
    ctx.output(&out);
    Ok(())
}

pub async fn handle(ctx: &mut Context<'_>, args: UsersArgs) -> Result<(), CliError> {
    let users = ctx.backend.users();

    match args.command {
        UsersCommand::Get { uuid } => {
            let outcome = users.get(&uuid.to_string()).await;
            match ctx.settle("users get", outcome)? {
                Some(user) => print_one(ctx, &user),
                None => Err(util::not_found("user", uuid, "users list")),
            }
        }

        UsersCommand::List { search, sort } => {
            let outcome = users.list(&UserQuery { search, sort }).await;
            let found = ctx.settle("users list", outcome)?.unwrap_or_default();
            let out = output::render_list(
                &ctx.global.output,
                &found,
                |u| UserRow::from(u),
                |u| u.uuid.clone(),
            )?;
            ctx.output(&out);
            Ok(())
        }

        UsersCommand::Add {
            name,
            email,
            phone,
            picture,
            admin,
        } => {
            let new_user = NewUser {
                name,
                email,
                phone,
                picture: picture.as_deref().map(picture_value).transpose()?,
                role: Role::from(admin),
            };
            let outcome = users.create(&new_user).await;
            if let Some(uuid) = ctx.settle("users add", outcome)? {
                ctx.status(&format!("✓ User '{}' created", new_user.name.trim()));
                ctx.output(&uuid);
            }
            Ok(())
        }

        UsersCommand::Edit {
            uuid,
            name,
            email,
            phone,
            picture,
            admin,
        } => {
            let outcome = users.get(&uuid.to_string()).await;
            let Some(mut user) = ctx.settle("users edit", outcome)? else {
                return Err(util::not_found("user", uuid, "users list"));
            };

            if let Some(name) = name {
                user.name = name;
            }
            if let Some(email) = email {
                user.email = email;
            }
            if let Some(phone) = phone {
                user.phone = phone;
            }
            if let Some(picture) = picture {
                user.picture = Some(picture_value(&picture)?).filter(|p| !p.is_empty());
            }
            if let Some(admin) = admin {
                user.role = Role::from(admin);
            }

            let outcome = users.edit(&user).await;
            if ctx.settle("users edit", outcome)?.is_some() {
                ctx.status(&format!("✓ User {} updated", user.uuid));
            }
            Ok(())
        }
    }
}
