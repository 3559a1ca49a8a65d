//! Status service - session and catalog summaries

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{Product, User};
use crate::services::catalog::CatalogService;
use crate::services::session::SessionService;

/// Read-only summaries over the two stores
pub struct StatusService;

impl StatusService {
    /// Overall summary for `vt status`
    pub fn summary(session: &SessionService, catalog: &CatalogService) -> StatusSummary {
        let products = catalog.products();

        StatusSummary {
            ready: session.is_ready() && catalog.is_initialized(),
            user: session.current_user().cloned(),
            total_products: products.len(),
            active_products: products.iter().filter(|p| p.is_active).count(),
            total_categories: catalog.categories().len(),
            total_stock: products.iter().fold(0i64, |acc, p| acc.saturating_add(p.stock)),
            inventory_value: total_value(products.iter()),
        }
    }

    /// Statistics shown on the profile screen
    pub fn profile_stats(catalog: &CatalogService, user_id: &str) -> ProfileStats {
        let created = catalog.products_created_by(user_id);

        ProfileStats {
            total_products: created.len(),
            active_products: created.iter().filter(|p| p.is_active).count(),
            total_value: total_value(created.into_iter()),
        }
    }
}

/// Σ price × stock, saturating instead of overflowing
fn total_value<'a>(products: impl Iterator<Item = &'a Product>) -> Decimal {
    products.fold(Decimal::ZERO, |acc, p| acc.saturating_add(p.inventory_value()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub ready: bool,
    pub user: Option<User>,
    pub total_products: usize,
    pub active_products: usize,
    pub total_categories: usize,
    pub total_stock: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub inventory_value: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub total_products: usize,
    pub active_products: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_value: Decimal,
}
