//! Authentication commands.

use super::{prompt, prompt_required, prompt_secret, Context};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use session_client::{CurrentUser, LogoutOutcome, Registration, SessionError};

/// Login with email (or username) and password.
pub async fn login(context: &Context, by_username: bool, format: &OutputFormat) -> Result<()> {
    let session = &context.session;

    if session.is_authenticated()? {
        if let CurrentUser::Authenticated(user) = session.current_user().await {
            output::print_success(
                &format!("Already logged in as {}", user.display_name()),
                format,
            );
            return Ok(());
        }
    }

    let identity = if by_username {
        prompt_required("Username")?
    } else {
        prompt_required("Email")?
    };
    let password = prompt_secret("Password")?;

    if *format == OutputFormat::Text {
        println!("Logging in...");
    }

    if by_username {
        session.login_with_username(&identity, &password).await?;
    } else {
        session.login_with_email(&identity, &password).await?;
    }

    output::print_success(&format!("Logged in as {}", identity), format);
    Ok(())
}

/// Create an account. Does not sign in.
pub async fn register(context: &Context, format: &OutputFormat) -> Result<()> {
    let first_name = prompt_required("First name")?;
    let last_name = prompt("Last name (optional)")?;
    let username = prompt_required("Username")?;
    let email = prompt_required("Email")?;
    let password = prompt_secret("Password")?;
    let confirm_password = prompt_secret("Confirm password")?;

    check_passwords_match(&password, &confirm_password)?;

    let registration = Registration {
        first_name,
        last_name: (!last_name.is_empty()).then_some(last_name),
        username,
        email,
        password,
        confirm_password,
    };
    context.session.register(&registration).await?;

    output::print_success(
        "Account created. Run 'medassist login' to sign in.",
        format,
    );
    Ok(())
}

fn check_passwords_match(password: &str, confirm_password: &str) -> Result<()> {
    if password != confirm_password {
        anyhow::bail!("Passwords do not match");
    }
    Ok(())
}

/// Logout and clear the local session.
pub async fn logout(context: &Context, format: &OutputFormat) -> Result<()> {
    let message = match context.session.logout().await? {
        LogoutOutcome::Revoked => "Logged out".to_string(),
        LogoutOutcome::LocalOnly { reason } => {
            format!("Logged out locally (server not notified: {})", reason)
        }
        LogoutOutcome::AlreadySignedOut => "Not logged in".to_string(),
    };
    output::print_success(&message, format);
    Ok(())
}

/// Check authentication status without contacting the server.
pub async fn status(context: &Context, format: &OutputFormat) -> Result<()> {
    let logged_in = context.session.is_authenticated()?;
    let session_file = context.paths.session_file();

    match format {
        OutputFormat::Json => output::print_json(&serde_json::json!({
            "logged_in": logged_in,
            "api_url": context.config.api_base_url,
            "session_file": session_file.display().to_string(),
        })),
        OutputFormat::Text => {
            output::print_heading("Authentication Status");
            output::print_row("Logged in", if logged_in { "yes" } else { "no" });
            output::print_row("API", &context.config.api_base_url);
            output::print_row("Session file", &session_file.display().to_string());
            Ok(())
        }
    }
}

/// Show the signed-in user as the server reports it.
pub async fn whoami(context: &Context, format: &OutputFormat) -> Result<()> {
    let user = match context.session.current_user().await {
        CurrentUser::Authenticated(user) => user,
        CurrentUser::SignedOut => return Err(SessionError::NoSession.into()),
        CurrentUser::Unavailable { reason } => {
            anyhow::bail!("Could not load the current user: {}", reason)
        }
    };

    match format {
        OutputFormat::Json => output::print_json(&user),
        OutputFormat::Text => {
            output::print_heading(&user.display_name());
            output::print_row("ID", user.id().as_deref().unwrap_or("-"));
            output::print_row("Username", user.username().unwrap_or("-"));
            output::print_row("Email", user.email().unwrap_or("-"));
            Ok(())
        }
    }
}
