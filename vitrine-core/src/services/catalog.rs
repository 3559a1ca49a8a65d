//! Catalog service - the product collection
//!
//! The whole collection lives in memory and is written back as one JSON
//! array under the `"products"` key after every mutation. The starter
//! catalog is installed the first time storage has no entry.

use std::sync::Arc;

use crate::adapters::seed::seed_products;
use crate::domain::id::generate_id;
use crate::domain::result::OperationResult;
use crate::domain::{NewProduct, Product, ProductPatch, ALL_CATEGORIES};
use crate::ports::{SecureStore, PRODUCTS_KEY};
use crate::services::persisted::PersistedEntry;

/// Message carried by a mutation whose write-back failed
pub const SAVE_FAILED: &str = "Failed to save catalog";

pub struct CatalogService {
    entry: PersistedEntry<Vec<Product>>,
    products: Vec<Product>,
    initialized: bool,
}

impl CatalogService {
    pub fn new(store: Arc<dyn SecureStore>) -> Self {
        Self {
            entry: PersistedEntry::new(store, PRODUCTS_KEY),
            products: Vec::new(),
            initialized: false,
        }
    }

    /// Load the persisted catalog, installing the seed when there is none.
    ///
    /// When the entry cannot be read or decoded the seed is used in memory
    /// and storage is left untouched.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        match self.entry.load() {
            Ok(Some(products)) => self.products = products,
            Ok(None) => {
                self.products = seed_products();
                tracing::debug!(count = self.products.len(), "installing seed catalog");
                self.persist();
            }
            Err(e) => {
                tracing::error!("Failed to load catalog, using seed data: {}", e);
                self.products = seed_products();
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Append a product under a fresh id
    pub fn add(&mut self, product: NewProduct) -> OperationResult<Product> {
        let product = product.with_id(self.fresh_id());
        self.products.push(product.clone());
        self.finish(product)
    }

    /// Merge `patch` onto the product with `id`.
    ///
    /// An unknown id changes nothing but the collection is still written;
    /// the result then carries no product.
    pub fn update(&mut self, id: &str, patch: ProductPatch) -> OperationResult<Option<Product>> {
        let updated = self.products.iter_mut().find(|p| p.id == id).map(|product| {
            product.apply(&patch);
            product.clone()
        });
        self.finish(updated)
    }

    /// Remove the product with `id`. The result says whether anything was removed.
    pub fn delete(&mut self, id: &str) -> OperationResult<bool> {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        let removed = self.products.len() != before;
        self.finish(removed)
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Case-insensitive substring search. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        if query.is_empty() {
            return self.products.iter().collect();
        }
        let needle = query.to_lowercase();
        self.products.iter().filter(|p| p.matches(&needle)).collect()
    }

    /// Exact category match; empty or `"all"` matches everything
    pub fn filter_by_category(&self, category: &str) -> Vec<&Product> {
        if category.is_empty() || category == ALL_CATEGORIES {
            return self.products.iter().collect();
        }
        self.products.iter().filter(|p| p.category == category).collect()
    }

    /// Distinct categories, in the order they first appear
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category) {
                seen.push(product.category.clone());
            }
        }
        seen
    }

    pub fn products_created_by(&self, user_id: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.created_by.as_deref() == Some(user_id))
            .collect()
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = generate_id();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn persist(&self) -> bool {
        match self.entry.save(&self.products) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save catalog: {}", e);
                false
            }
        }
    }

    fn finish<T>(&self, data: T) -> OperationResult<T> {
        if self.persist() {
            OperationResult::ok(data)
        } else {
            OperationResult::fail_with_data(data, SAVE_FAILED)
        }
    }
}
