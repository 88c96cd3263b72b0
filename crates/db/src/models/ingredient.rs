//! Ingredient entity model.

use foodgram_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `ingredients` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Ingredient {
    pub id: DbId,
    pub name: String,
    pub measurement_unit: String,
}
