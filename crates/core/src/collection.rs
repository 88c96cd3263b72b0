//! Per-user recipe collections (favorites and shopping cart).
//!
//! Both collections are `(user, recipe)` membership tables with identical
//! add/remove semantics; [`RecipeCollection`] carries everything that differs
//! between them so the repository and handlers share one implementation.

use crate::error::CoreError;
use crate::types::DbId;

/// A per-user set of recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeCollection {
    Favorites,
    ShoppingCart,
}

impl RecipeCollection {
    /// Backing table. Each has a unique `(user_id, recipe_id)` constraint.
    pub fn table(self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::ShoppingCart => "shopping_cart",
        }
    }

    /// Human-readable name used in messages and logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::ShoppingCart => "shopping cart",
        }
    }

    /// Error returned when the pair is already present.
    pub fn already_added(self, recipe_id: DbId) -> CoreError {
        CoreError::DuplicateEntry(format!(
            "Recipe {recipe_id} is already in your {}",
            self.label()
        ))
    }

    /// Error returned when removing a pair that is not present.
    pub fn not_present(self, recipe_id: DbId) -> CoreError {
        CoreError::MissingEntry(format!(
            "Recipe {recipe_id} is not in your {}",
            self.label()
        ))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn tables_are_distinct() {
        assert_ne!(
            RecipeCollection::Favorites.table(),
            RecipeCollection::ShoppingCart.table()
        );
    }

    #[test]
    fn errors_name_the_collection() {
        assert_matches!(
            RecipeCollection::ShoppingCart.already_added(3),
            CoreError::DuplicateEntry(msg) if msg == "Recipe 3 is already in your shopping cart"
        );
        assert_matches!(
            RecipeCollection::Favorites.not_present(9),
            CoreError::MissingEntry(msg) if msg == "Recipe 9 is not in your favorites"
        );
    }
}
