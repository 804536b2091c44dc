use std::io::{self, IsTerminal, Write};

use crate::auth::{AuthService, AuthStatus};
use crate::cli::AuthCommand;
use crate::config::{self, Settings};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};

pub async fn run(ctx: &AppContext, command: AuthCommand) -> AppResult<()> {
    match command {
        AuthCommand::Login => {
            let settings = complete_client_settings(ctx)?;
            let result = AuthService::login(&ctx.profile, &settings, &ctx.token_store).await?;

            let text = match result.email.as_deref() {
                Some(email) => format!("{}: logged in as {email}", result.profile),
                None => format!("{}: {}", result.profile, result.note),
            };
            ctx.output.emit(&text, &result)
        }
        AuthCommand::Status => {
            let status = AuthService::status(&ctx.profile, &ctx.token_store).await?;
            ctx.output.emit(&describe_status(&status), &status)
        }
        AuthCommand::Logout => {
            let status = AuthService::logout(&ctx.profile, &ctx.token_store).await?;
            let text = format!("{}: logged out", status.profile);
            ctx.output.emit(&text, &status)
        }
    }
}

fn describe_status(status: &AuthStatus) -> String {
    if !status.logged_in {
        return format!("{}: logged out", status.profile);
    }

    let account = status
        .email
        .as_deref()
        .map(|email| format!(" as {email}"))
        .unwrap_or_default();
    let expiry = match (status.expired, status.has_refresh_token) {
        (Some(true), Some(true)) => " (expired, will refresh)",
        (Some(true), _) => " (expired, login again)",
        _ => "",
    };
    format!("{}: logged in{account}{expiry}", status.profile)
}

/// Fills in a missing OAuth client from the terminal and persists it to the
/// profile settings. Non-interactive runs fail with the settings path.
fn complete_client_settings(ctx: &AppContext) -> AppResult<Settings> {
    let mut settings = ctx.settings.clone();
    let missing_id = settings.client_id().is_err();
    let missing_secret = settings.client_secret().is_none();
    if !missing_id && !missing_secret {
        return Ok(settings);
    }

    let settings_path = ctx.paths.settings_file(&ctx.profile);
    if !io::stdin().is_terminal() {
        let missing = match (missing_id, missing_secret) {
            (true, true) => "client_id and client_secret",
            (true, false) => "client_id",
            _ => "client_secret",
        };
        return Err(AppError::Config(format!(
            "missing oauth {missing} in {}. run `gmail-probe auth login` in a terminal or edit the file",
            settings_path.display(),
        )));
    }

    println!("OAuth client for profile `{}` is not configured.", ctx.profile);
    if missing_id {
        settings.client_id = Some(prompt_required("OAuth client_id: ")?);
    }
    if missing_secret {
        settings.client_secret = Some(prompt_required("OAuth client_secret: ")?);
    }

    let default_redirect = settings.redirect_uri();
    let redirect_uri = prompt_line(&format!("OAuth redirect_uri [{default_redirect}]: "))?;
    if !redirect_uri.is_empty() {
        settings.redirect_uri = Some(redirect_uri);
    }

    config::save_settings(&ctx.paths, &ctx.profile, &settings)?;
    println!("Saved profile settings to {}.", settings_path.display());
    Ok(settings)
}

fn prompt_required(prompt: &str) -> AppResult<String> {
    loop {
        let value = prompt_line(prompt)?;
        if !value.is_empty() {
            return Ok(value);
        }
        eprintln!("value is required");
    }
}

fn prompt_line(prompt: &str) -> AppResult<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}
