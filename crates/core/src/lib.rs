//! Foodgram domain logic.
//!
//! Everything in this crate is database-free: shopping-list aggregation and
//! rendering, recipe short codes, write-path validation, and catalog file
//! parsing. The `foodgram-db` and `foodgram-api` crates build on it.

pub mod account;
pub mod catalog_import;
pub mod collection;
pub mod document;
pub mod error;
pub mod pagination;
pub mod recipe;
pub mod roles;
pub mod shopping_list;
pub mod short_code;
pub mod types;
pub mod validation;
