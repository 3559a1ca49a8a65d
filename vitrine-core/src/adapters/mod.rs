//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the SecureStore port (optionally encrypted)
//! - An in-memory map for tests and embedding
//! - Seed data for the first start

pub mod duckdb;
pub mod memory;
pub mod seed;
