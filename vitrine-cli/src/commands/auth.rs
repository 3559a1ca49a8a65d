//! Login, register and logout commands

use anyhow::Result;
use dialoguer::Confirm;
use vitrine_core::domain::validation::{LoginForm, RegistrationForm};
use vitrine_core::navigation::Route;
use vitrine_core::LogEvent;

use super::{get_context, get_logger, log_event, password_or_prompt, value_or_prompt};
use crate::output;

pub fn run_login(email: Option<String>, password: Option<String>) -> Result<()> {
    let logger = get_logger();
    let mut ctx = get_context()?;

    if ctx.guard(Route::Login) == Route::Dashboard {
        if let Some(user) = ctx.session.current_user() {
            output::info(&format!("Already signed in as {}", user.email));
        }
        return Ok(());
    }

    let form = LoginForm {
        email: value_or_prompt(email, "Email")?.trim().to_string(),
        password: password_or_prompt(password, "Password")?,
    };
    form.validate().map_err(|e| anyhow::anyhow!(e.message()))?;

    if !ctx.session.login(&form.email, &form.password) {
        log_event(
            &logger,
            LogEvent::new("login_failed")
                .with_command("login")
                .with_route(Route::Login.name())
                .with_error("Invalid email or password"),
        );
        anyhow::bail!("Invalid email or password");
    }

    log_event(&logger, LogEvent::new("login_succeeded").with_command("login"));
    if let Some(user) = ctx.session.current_user() {
        output::success(&format!("Welcome back, {}", user.name));
    }
    Ok(())
}

pub fn run_register(
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let logger = get_logger();
    let mut ctx = get_context()?;

    if ctx.guard(Route::Register) == Route::Dashboard {
        anyhow::bail!("Already signed in. Run 'vt logout' first.");
    }

    let (password, confirm_password) = match password {
        Some(p) => (p.clone(), p),
        None => (
            password_or_prompt(None, "Password")?,
            password_or_prompt(None, "Confirm password")?,
        ),
    };
    let form = RegistrationForm {
        name: value_or_prompt(name, "Name")?.trim().to_string(),
        email: value_or_prompt(email, "Email")?.trim().to_string(),
        password,
        confirm_password,
    };
    form.validate().map_err(|e| anyhow::anyhow!(e.message()))?;

    if !ctx.session.register(&form.email, &form.password, &form.name) {
        log_event(
            &logger,
            LogEvent::new("register_failed")
                .with_command("register")
                .with_error("Email already registered"),
        );
        anyhow::bail!("An account with this email already exists");
    }

    log_event(&logger, LogEvent::new("register_succeeded").with_command("register"));
    output::success(&format!("Account created. Signed in as {}", form.email));
    output::warning("Accounts are not saved: after 'vt logout' this one cannot sign in again.");
    Ok(())
}

pub fn run_logout(force: bool) -> Result<()> {
    let logger = get_logger();
    let mut ctx = get_context()?;

    if !ctx.session.is_authenticated() {
        output::info("Not signed in.");
        return Ok(());
    }

    if !force
        && !Confirm::new()
            .with_prompt("Are you sure you want to sign out?")
            .default(false)
            .interact()?
    {
        println!("Cancelled.");
        return Ok(());
    }

    ctx.session.logout();
    ctx.navigator.reset(&ctx.session);
    log_event(&logger, LogEvent::new("logout").with_command("logout"));
    output::success("Signed out");
    Ok(())
}
