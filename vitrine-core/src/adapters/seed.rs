//! Seed data: the starter catalog and the known accounts
//!
//! The catalog seed is installed once, the first time the store has no
//! `"products"` entry. The accounts are rebuilt in memory on every start.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::{Credential, Product};

/// (id, email, name, Argon2id PHC hash)
///
/// The passwords are "password123" and "admin123".
const SEED_ACCOUNTS: &[(&str, &str, &str, &str)] = &[
    (
        "1",
        "test@example.com",
        "John Doe",
        "$argon2id$v=19$m=19456,t=2,p=1$rqsaAs15e2akzNytkVMC1A$7q9Vv9g4VfghdBHzFMgvXXYwNooQ4fnQ0PG8ihIjn0A",
    ),
    (
        "2",
        "admin@example.com",
        "Admin User",
        "$argon2id$v=19$m=19456,t=2,p=1$r0jd32bJU6msDfkrft0zpQ$BDhCfEUFGIdg60UA/3Acpo+eZwU598eBr0Ss7ZS/6mo",
    ),
];

/// (id, name, description, price, stock, category, vendor, image, created_by)
const SEED_PRODUCTS: &[(&str, &str, &str, &str, i64, &str, &str, &str, &str)] = &[
    (
        "1",
        "iPhone 15",
        "Dernier modèle Apple avec puce A17 Pro",
        "999.99",
        25,
        "Électronique",
        "TechStore",
        "https://images.unsplash.com/photo-1592750475338-74b7b21085ab?w=400&h=400&fit=crop",
        "1",
    ),
    (
        "2",
        "MacBook Pro M3",
        "Ordinateur portable professionnel",
        "2499.99",
        15,
        "Électronique",
        "AppleStore",
        "https://images.unsplash.com/photo-1541807084-5c52b6b3adef?w=400&h=400&fit=crop",
        "1",
    ),
    (
        "3",
        "Nike Air Max",
        "Chaussures de sport confortables",
        "129.99",
        50,
        "Mode",
        "SportShop",
        "https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=400&h=400&fit=crop",
        "2",
    ),
    (
        "4",
        "Samsung Galaxy S24",
        "Smartphone Android haut de gamme",
        "899.99",
        30,
        "Électronique",
        "TechWorld",
        "https://images.unsplash.com/photo-1511707171634-5f897ff02aa9?w=400&h=400&fit=crop",
        "1",
    ),
    (
        "5",
        "Livre de cuisine",
        "Recettes traditionnelles françaises",
        "24.99",
        100,
        "Livres",
        "Librairie Moderne",
        "https://images.unsplash.com/photo-1544716278-ca5e3f4abd8c?w=400&h=400&fit=crop",
        "2",
    ),
];

/// The fixed starter catalog
pub fn seed_products() -> Vec<Product> {
    SEED_PRODUCTS
        .iter()
        .map(
            |&(id, name, description, price, stock, category, vendeurs, image, created_by)| Product {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                price: Decimal::from_str(price).unwrap_or_default(),
                stock,
                category: category.to_string(),
                vendeurs: vendeurs.to_string(),
                image: image.to_string(),
                is_active: true,
                created_by: Some(created_by.to_string()),
            },
        )
        .collect()
}

/// The accounts that can log in on a fresh start
pub fn seed_credentials() -> Vec<Credential> {
    SEED_ACCOUNTS
        .iter()
        .map(|&(id, email, name, hash)| Credential::from_hash(id, email, name, hash))
        .collect()
}
