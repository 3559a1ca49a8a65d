//! Form validation run by the presentation layer before calling a store.
//!
//! Each form holds raw user input. `validate`/`into_*` either produce the
//! typed value the store expects or fail with [`Error::Validation`] carrying a
//! message meant for the user. A failing form never reaches the store.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::product::{NewProduct, ProductPatch, DEFAULT_PRODUCT_IMAGE};
use super::result::{Error, Result};

/// Minimum accepted password length at registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// Prices must stay below this many units
///
/// Prices are persisted as JSON numbers (f64). Below this bound and with at
/// most [`MAX_PRICE_DECIMALS`] decimals, a price reads back unchanged.
pub const MAX_PRICE_UNITS: i64 = 1_000_000_000_000;

/// Decimals accepted in a price
pub const MAX_PRICE_DECIMALS: u32 = 2;

/// Largest accepted stock
pub const MAX_STOCK: i64 = 1_000_000_000;

/// Raw input of the add/edit product form
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    pub category: String,
    pub vendeurs: String,
    pub image: String,
    pub is_active: bool,
}

/// Fields of a validated product form
struct CheckedProduct {
    price: Decimal,
    stock: i64,
    image: String,
}

impl ProductForm {
    fn check(&self) -> Result<CheckedProduct> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("Name is required"));
        }
        if self.description.trim().is_empty() {
            return Err(Error::validation("Description is required"));
        }
        let price = Decimal::from_str(self.price.trim())
            .ok()
            .filter(|p| *p > Decimal::ZERO)
            .ok_or_else(|| Error::validation("Price must be greater than 0"))?
            .normalize();
        if price.scale() > MAX_PRICE_DECIMALS {
            return Err(Error::validation(format!(
                "Price can have at most {} decimals",
                MAX_PRICE_DECIMALS
            )));
        }
        if price >= Decimal::from(MAX_PRICE_UNITS) {
            return Err(Error::validation(format!(
                "Price must be below {}",
                MAX_PRICE_UNITS
            )));
        }
        let stock = self
            .stock
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|s| *s >= 0)
            .ok_or_else(|| Error::validation("Stock must be zero or more"))?;
        if stock > MAX_STOCK {
            return Err(Error::validation(format!("Stock must be at most {}", MAX_STOCK)));
        }
        if self.category.is_empty() {
            return Err(Error::validation("Category is required"));
        }
        if self.vendeurs.trim().is_empty() {
            return Err(Error::validation("Vendor is required"));
        }

        let image = if self.image.trim().is_empty() {
            DEFAULT_PRODUCT_IMAGE.to_string()
        } else {
            self.image.trim().to_string()
        };

        Ok(CheckedProduct { price, stock, image })
    }

    /// Validate for creation, attributing the product to `created_by`
    pub fn into_new_product(self, created_by: Option<&str>) -> Result<NewProduct> {
        let checked = self.check()?;
        Ok(NewProduct {
            name: self.name,
            description: self.description,
            price: checked.price,
            stock: checked.stock,
            category: self.category,
            vendeurs: self.vendeurs,
            image: checked.image,
            is_active: self.is_active,
            created_by: created_by.map(str::to_string),
        })
    }

    /// Validate for an edit. The patch sets every form field.
    pub fn into_patch(self) -> Result<ProductPatch> {
        let checked = self.check()?;
        Ok(ProductPatch {
            name: Some(self.name),
            description: Some(self.description),
            price: Some(checked.price),
            stock: Some(checked.stock),
            category: Some(self.category),
            vendeurs: Some(self.vendeurs),
            image: Some(checked.image),
            is_active: Some(self.is_active),
            created_by: None,
        })
    }
}

/// Raw input of the login form
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<()> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(Error::validation("Please fill in all fields"));
        }
        Ok(())
    }
}

/// Raw input of the registration form
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty()
            || self.email.is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(Error::validation("Please fill in all fields"));
        }
        if self.password != self.confirm_password {
            return Err(Error::validation("Passwords do not match"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

/// Raw input of the profile form
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            return Err(Error::validation("Please fill in all fields"));
        }
        Ok(())
    }
}
