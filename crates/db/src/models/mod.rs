//! Row models and write DTOs.
//!
//! Each submodule contains:
//! - `FromRow` structs matching what the repositories select
//! - plain input structs for inserts and updates

pub mod ingredient;
pub mod recipe;
pub mod tag;
pub mod user;
