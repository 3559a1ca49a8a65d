//! Profile command - show and edit the signed-in user

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use vitrine_core::domain::validation::ProfileForm;
use vitrine_core::navigation::Route;
use vitrine_core::LogEvent;

use super::{get_context, get_logger, log_event, require_route, value_or_edit, NOT_SIGNED_IN};
use crate::output;

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the signed-in user and their product statistics
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change name and email
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
}

pub fn run(command: ProfileCommands) -> Result<()> {
    let mut ctx = get_context()?;
    require_route(&mut ctx, Route::Profile)?;
    let user = ctx
        .session
        .current_user()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!(NOT_SIGNED_IN))?;

    match command {
        ProfileCommands::Show { json } => {
            let stats = ctx.profile_stats();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "user": user,
                        "stats": stats,
                    }))?
                );
                return Ok(());
            }

            println!("{}", user.name.bold());
            println!("  {}", user.email);
            println!();

            if let Some(stats) = stats {
                let mut table = output::create_table();
                table.set_header(vec!["Products", "Active", "Total value"]);
                table.add_row(vec![
                    stats.total_products.to_string(),
                    stats.active_products.to_string(),
                    output::format_price(stats.total_value),
                ]);
                println!("{}", table);
            }
        }
        ProfileCommands::Update { name, email } => {
            let interactive = name.is_none() && email.is_none();
            let form = ProfileForm {
                name: value_or_edit(name, "Name", &user.name, interactive)?.trim().to_string(),
                email: value_or_edit(email, "Email", &user.email, interactive)?.trim().to_string(),
            };
            form.validate().map_err(|e| anyhow::anyhow!(e.message()))?;

            if !ctx.session.update_profile(&form.name, &form.email) {
                anyhow::bail!("Failed to update profile");
            }
            log_event(
                &get_logger(),
                LogEvent::new("profile_updated")
                    .with_command("profile update")
                    .with_route(Route::Profile.name()),
            );
            output::success("Profile updated");
        }
    }

    Ok(())
}
