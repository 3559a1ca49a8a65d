//! Status command - session and catalog summary

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status();

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Vitrine Status".bold());
    println!();

    match &status.user {
        Some(user) => println!("Signed in as {} <{}>", user.name.bold(), user.email),
        None => println!("{}", "Not signed in".yellow()),
    }
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Products".to_string(), status.total_products.to_string()]);
    table.add_row(vec!["Active".to_string(), status.active_products.to_string()]);
    table.add_row(vec!["Categories".to_string(), status.total_categories.to_string()]);
    table.add_row(vec!["Units in stock".to_string(), status.total_stock.to_string()]);
    table.add_row(vec![
        "Inventory value".to_string(),
        output::format_price(status.inventory_value),
    ]);
    println!("{}", table);

    if !status.ready {
        output::warning("Stores are still loading");
    }

    Ok(())
}
