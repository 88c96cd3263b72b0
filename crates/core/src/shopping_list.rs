//! Shopping-list aggregation.
//!
//! Folds the ingredient lines of every recipe in a user's cart into one entry
//! per `(name, measurement_unit)` pair. This module has no database
//! dependencies; the repository layer fetches the lines and the API layer
//! hands them to [`aggregate`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One ingredient line of one recipe in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl IngredientLine {
    pub fn new(name: &str, measurement_unit: &str, amount: i32) -> Self {
        Self {
            name: name.to_string(),
            measurement_unit: measurement_unit.to_string(),
            amount,
        }
    }
}

/// An aggregated shopping-list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub name: String,
    pub measurement_unit: String,
    /// Sum of every contributing line's amount.
    pub total: i64,
}

/// Group `lines` by `(name, measurement_unit)` and sum their amounts.
///
/// The result is ordered by name using ordinal (byte-wise, case-sensitive)
/// comparison, then by unit. An empty input yields an empty list.
pub fn aggregate<I>(lines: I) -> Vec<ShoppingItem>
where
    I: IntoIterator<Item = IngredientLine>,
{
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();

    for line in lines {
        *totals
            .entry((line.name, line.measurement_unit))
            .or_insert(0) += i64::from(line.amount);
    }

    totals
        .into_iter()
        .map(|((name, measurement_unit), total)| ShoppingItem {
            name,
            measurement_unit,
            total,
        })
        .collect()
}
