//! Listing helpers for the product dashboard: filtering and pagination

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{Product, ALL_CATEGORIES};

/// Default number of products per dashboard page
pub const PRODUCTS_PER_PAGE: usize = 8;

/// Dashboard filter.
///
/// Applied in order: text search, price and stock bounds (inclusive), then
/// exact category. Unset fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub query: String,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_stock: Option<i64>,
    pub max_stock: Option<i64>,
}

impl ProductFilter {
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let needle = self.query.to_lowercase();
        let category = self
            .category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES);

        products
            .iter()
            .filter(|p| needle.is_empty() || p.matches(&needle))
            .filter(|p| self.min_price.map_or(true, |min| p.price >= min))
            .filter(|p| self.max_price.map_or(true, |max| p.price <= max))
            .filter(|p| self.min_stock.map_or(true, |min| p.stock >= min))
            .filter(|p| self.max_stock.map_or(true, |max| p.stock <= max))
            .filter(|p| category.map_or(true, |c| p.category == c))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
            && self
                .category
                .as_deref()
                .map_or(true, |c| c.is_empty() || c == ALL_CATEGORIES)
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.min_stock.is_none()
            && self.max_stock.is_none()
    }
}

/// One page of a listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually shown
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Slice `items` into 1-based pages.
///
/// There is always at least one page. Requests past the end show the last
/// page and page 0 shows the first.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let items = items
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    Page {
        items,
        page,
        page_size,
        total_items,
        total_pages,
    }
}
