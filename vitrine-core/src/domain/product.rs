//! Product domain model
//!
//! The JSON shape matches what the mobile app persisted under the
//! `"products"` key: camelCase field names, price as a plain number.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Categories offered by the add/edit product form
pub const PRODUCT_CATEGORIES: &[&str] = &["Électronique", "Mode", "Livres", "Maison", "Sport", "Autre"];

/// Image used when the form leaves the image empty
pub const DEFAULT_PRODUCT_IMAGE: &str =
    "https://images.unsplash.com/photo-1560472354-b33ff0c44a43?w=400&h=400&fit=crop";

/// Category value that disables category filtering
pub const ALL_CATEGORIES: &str = "all";

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i64,
    pub category: String,
    /// Vendor name
    pub vendeurs: String,
    /// Image URI
    pub image: String,
    pub is_active: bool,
    /// Id of the user who created the product. Not checked against any user list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl Product {
    /// Case-insensitive substring match over name, description, category and vendor.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        [&self.name, &self.description, &self.category, &self.vendeurs]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }

    /// Stock value of this product (price × stock), saturating at the
    /// bounds of `Decimal`
    pub fn inventory_value(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.stock))
    }

    /// Shallow merge: every field set in the patch replaces the current one
    pub fn apply(&mut self, patch: &ProductPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(vendeurs) = &patch.vendeurs {
            self.vendeurs = vendeurs.clone();
        }
        if let Some(image) = &patch.image {
            self.image = image.clone();
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        if let Some(created_by) = &patch.created_by {
            self.created_by = Some(created_by.clone());
        }
    }
}

/// A product that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i64,
    pub category: String,
    pub vendeurs: String,
    pub image: String,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl NewProduct {
    pub fn with_id(self, id: impl Into<String>) -> Product {
        Product {
            id: id.into(),
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            category: self.category,
            vendeurs: self.vendeurs,
            image: self.image,
            is_active: self.is_active,
            created_by: self.created_by,
        }
    }
}

/// Partial update. `None` leaves the field untouched; the id cannot be changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub category: Option<String>,
    pub vendeurs: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
    pub created_by: Option<String>,
}

impl ProductPatch {
    pub fn price(price: Decimal) -> Self {
        Self {
            price: Some(price),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
