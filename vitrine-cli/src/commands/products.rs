//! Products command - browse and edit the catalog

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::{Confirm, Select};
use rust_decimal::Decimal;
use vitrine_core::domain::validation::ProductForm;
use vitrine_core::domain::PRODUCT_CATEGORIES;
use vitrine_core::navigation::Route;
use vitrine_core::services::ProductFilter;
use vitrine_core::{LogEvent, OperationResult, Product, VitrineContext};

use super::{get_context, get_logger, log_event, require_route, value_or_edit, value_or_prompt};
use crate::output;

#[derive(Subcommand)]
pub enum ProductsCommands {
    /// List products, filtered and paginated
    List {
        /// Text to search in name, description, category and vendor
        #[arg(long, short)]
        search: Option<String>,
        /// Exact category ("all" for every category)
        #[arg(long, short)]
        category: Option<String>,
        #[arg(long)]
        min_price: Option<Decimal>,
        #[arg(long)]
        max_price: Option<Decimal>,
        #[arg(long)]
        min_stock: Option<i64>,
        #[arg(long)]
        max_stock: Option<i64>,
        /// Page number, starting at 1
        #[arg(long, short, default_value = "1")]
        page: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one product
    Show {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a product, created by the signed-in user
    Add {
        #[command(flatten)]
        fields: ProductFields,
        /// Create the product as inactive
        #[arg(long)]
        inactive: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a product
    Edit {
        id: String,
        #[command(flatten)]
        fields: ProductFields,
        /// Set whether the product is active
        #[arg(long)]
        active: Option<bool>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a product
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the categories in use
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Product form fields shared by add and edit
#[derive(clap::Args)]
pub struct ProductFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    stock: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    vendor: Option<String>,
    /// Image URL (the default image when left empty)
    #[arg(long)]
    image: Option<String>,
}

impl ProductFields {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.category.is_none()
            && self.vendor.is_none()
            && self.image.is_none()
    }
}

pub fn run(command: ProductsCommands) -> Result<()> {
    let mut ctx = get_context()?;

    match command {
        ProductsCommands::List {
            search,
            category,
            min_price,
            max_price,
            min_stock,
            max_stock,
            page,
            json,
        } => {
            require_route(&mut ctx, Route::Dashboard)?;
            let filter = ProductFilter {
                query: search.unwrap_or_default(),
                category,
                min_price,
                max_price,
                min_stock,
                max_stock,
            };
            list(&ctx, &filter, page, json)
        }
        ProductsCommands::Show { id, json } => {
            require_route(&mut ctx, Route::ProductDetail { product_id: id.clone() })?;
            let product = find(&ctx, &id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(product)?);
            } else {
                print_product(product);
            }
            Ok(())
        }
        ProductsCommands::Add { fields, inactive, json } => {
            require_route(&mut ctx, Route::AddProduct)?;
            add(&mut ctx, fields, !inactive, json)
        }
        ProductsCommands::Edit {
            id,
            fields,
            active,
            json,
        } => {
            require_route(&mut ctx, Route::EditProduct { product_id: id.clone() })?;
            edit(&mut ctx, &id, fields, active, json)
        }
        ProductsCommands::Delete { id, force, json } => {
            require_route(&mut ctx, Route::Dashboard)?;
            delete(&mut ctx, &id, force, json)
        }
        ProductsCommands::Categories { json } => {
            require_route(&mut ctx, Route::Dashboard)?;
            let categories = ctx.catalog.categories();
            if json {
                println!("{}", serde_json::to_string_pretty(&categories)?);
            } else if categories.is_empty() {
                println!("No categories yet.");
            } else {
                for category in categories {
                    println!("  • {}", category);
                }
            }
            Ok(())
        }
    }
}

fn find<'a>(ctx: &'a VitrineContext, id: &str) -> Result<&'a Product> {
    ctx.catalog
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Product not found: {}", id))
}

fn list(ctx: &VitrineContext, filter: &ProductFilter, page: usize, json: bool) -> Result<()> {
    let page = ctx.list_products(filter, page);

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    if page.items.is_empty() {
        if filter.is_empty() {
            println!("No products yet. Add one with 'vt products add'.");
        } else {
            println!("No products match these filters.");
        }
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Name", "Category", "Price", "Stock", "Vendor", "Status"]);
    for product in &page.items {
        let status = if product.is_active {
            "active".green().to_string()
        } else {
            "inactive".dimmed().to_string()
        };
        table.add_row(vec![
            product.id.clone(),
            product.name.clone(),
            product.category.clone(),
            output::format_price(product.price),
            product.stock.to_string(),
            product.vendeurs.clone(),
            status,
        ]);
    }
    println!("{}", table);
    println!(
        "{}",
        format!(
            "Page {} of {} ({} products)",
            page.page, page.total_pages, page.total_items
        )
        .dimmed()
    );
    Ok(())
}

fn print_product(product: &Product) {
    println!("{}", product.name.bold());
    println!("  {}", product.description);
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["ID".to_string(), product.id.clone()]);
    table.add_row(vec!["Price".to_string(), output::format_price(product.price)]);
    table.add_row(vec!["Stock".to_string(), product.stock.to_string()]);
    table.add_row(vec!["Category".to_string(), product.category.clone()]);
    table.add_row(vec!["Vendor".to_string(), product.vendeurs.clone()]);
    table.add_row(vec![
        "Status".to_string(),
        if product.is_active { "active" } else { "inactive" }.to_string(),
    ]);
    table.add_row(vec!["Image".to_string(), product.image.clone()]);
    if let Some(created_by) = &product.created_by {
        table.add_row(vec!["Created by".to_string(), created_by.clone()]);
    }
    println!("{}", table);
}

/// Pick a category from the form list, defaulting to `current`
fn category_or_select(value: Option<String>, current: Option<&str>, interactive: bool) -> Result<String> {
    if let Some(category) = value {
        return Ok(category);
    }
    if !interactive {
        return Ok(current.unwrap_or_default().to_string());
    }
    let default = current
        .and_then(|c| PRODUCT_CATEGORIES.iter().position(|known| *known == c))
        .unwrap_or(0);
    let index = Select::new()
        .with_prompt("Category")
        .items(PRODUCT_CATEGORIES)
        .default(default)
        .interact()?;
    Ok(PRODUCT_CATEGORIES[index].to_string())
}

fn add(ctx: &mut VitrineContext, fields: ProductFields, is_active: bool, json: bool) -> Result<()> {
    let user_id = ctx.session.current_user().map(|u| u.id.clone());

    let form = ProductForm {
        name: value_or_prompt(fields.name, "Name")?,
        description: value_or_prompt(fields.description, "Description")?,
        price: value_or_prompt(fields.price, "Price")?,
        stock: value_or_prompt(fields.stock, "Stock")?,
        category: category_or_select(fields.category, None, true)?,
        vendeurs: value_or_prompt(fields.vendor, "Vendor")?,
        image: value_or_prompt(fields.image, "Image URL (optional)")?,
        is_active,
    };
    let new_product = form
        .into_new_product(user_id.as_deref())
        .map_err(|e| anyhow::anyhow!(e.message()))?;

    let result = ctx.catalog.add(new_product);
    let product = finish(result, "product_added", "products add")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&product)?);
    } else {
        output::success(&format!("Product created: {} ({})", product.name, product.id));
    }
    Ok(())
}

fn edit(
    ctx: &mut VitrineContext,
    id: &str,
    fields: ProductFields,
    active: Option<bool>,
    json: bool,
) -> Result<()> {
    let current = find(ctx, id)?.clone();
    let interactive = fields.is_empty() && active.is_none();

    let form = ProductForm {
        name: value_or_edit(fields.name, "Name", &current.name, interactive)?,
        description: value_or_edit(fields.description, "Description", &current.description, interactive)?,
        price: value_or_edit(fields.price, "Price", &current.price.to_string(), interactive)?,
        stock: value_or_edit(fields.stock, "Stock", &current.stock.to_string(), interactive)?,
        category: category_or_select(fields.category, Some(&current.category), interactive)?,
        vendeurs: value_or_edit(fields.vendor, "Vendor", &current.vendeurs, interactive)?,
        image: value_or_edit(fields.image, "Image URL", &current.image, interactive)?,
        is_active: active.unwrap_or(current.is_active),
    };
    let patch = form.into_patch().map_err(|e| anyhow::anyhow!(e.message()))?;

    let result = ctx.catalog.update(id, patch);
    let product = finish(result, "product_updated", "products edit")?
        .ok_or_else(|| anyhow::anyhow!("Product not found: {}", id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&product)?);
    } else {
        output::success(&format!("Product updated: {}", product.name));
    }
    Ok(())
}

fn delete(ctx: &mut VitrineContext, id: &str, force: bool, json: bool) -> Result<()> {
    let name = find(ctx, id)?.name.clone();

    if !force
        && !json
        && !Confirm::new()
            .with_prompt(format!("Delete '{}'?", name))
            .default(false)
            .interact()?
    {
        println!("Cancelled.");
        return Ok(());
    }

    let result = ctx.catalog.delete(id);
    let removed = finish(result, "product_deleted", "products delete")?;

    if json {
        println!("{}", serde_json::json!({ "deleted": removed, "id": id }));
    } else {
        output::success(&format!("Deleted {}", name));
    }
    Ok(())
}

/// Record the outcome of a catalog mutation and unwrap its data
fn finish<T>(result: OperationResult<T>, event: &str, command: &str) -> Result<T> {
    let logger = get_logger();
    match (result.success, result.data) {
        (true, Some(data)) => {
            log_event(&logger, LogEvent::new(event).with_command(command));
            Ok(data)
        }
        _ => {
            let message = result
                .error
                .unwrap_or_else(|| "Unknown error".to_string());
            log_event(
                &logger,
                LogEvent::new(format!("{}_failed", event))
                    .with_command(command)
                    .with_error(&message),
            );
            anyhow::bail!(message)
        }
    }
}
