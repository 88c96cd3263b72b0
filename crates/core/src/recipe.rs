//! Recipe write payload and its validation rules.
//!
//! [`check_draft`] reports every violation at once as a [`FieldErrors`] map.
//! Checks that need the database (do the referenced tags and ingredients
//! exist?) are done by the API layer, which appends to the same map via
//! [`report_unknown_ids`].

use std::collections::HashSet;

use serde::Deserialize;
use validator::Validate;

use crate::types::DbId;
use crate::validation::FieldErrors;

pub const COOKING_TIME_MIN: i32 = 1;
pub const COOKING_TIME_MAX: i32 = 9999;
pub const AMOUNT_MIN: i32 = 1;
pub const AMOUNT_MAX: i32 = 9999;

/// One `{id, amount}` entry of a recipe's ingredient list.
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientAmount {
    pub id: DbId,
    pub amount: i32,
}

/// Body of `POST /recipes` and `PATCH /recipes/{id}`.
///
/// Missing fields deserialize to empty values so they are reported through
/// [`check_draft`] together with every other violation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RecipeDraft {
    #[serde(default)]
    pub ingredients: Vec<IngredientAmount>,
    #[serde(default)]
    pub tags: Vec<DbId>,
    /// Opaque image reference (data URL or URL). Required on create.
    pub image: Option<String>,
    #[serde(default)]
    #[validate(length(max = 256, message = "Name must be at most 256 characters"))]
    pub name: String,
    #[serde(default)]
    pub text: String,
    pub cooking_time: Option<i32>,
}

/// Whether a draft creates a recipe or replaces an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftMode {
    Create,
    Update,
}

/// Run every payload-only rule and collect the violations.
pub fn check_draft(draft: &RecipeDraft, mode: DraftMode) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Err(report) = draft.validate() {
        errors.extend_from(&report);
    }

    if draft.name.trim().is_empty() {
        errors.add("name", "This field may not be blank");
    }
    if draft.text.trim().is_empty() {
        errors.add("text", "This field may not be blank");
    }

    match draft.cooking_time {
        None => errors.add("cooking_time", "This field is required"),
        Some(t) if !(COOKING_TIME_MIN..=COOKING_TIME_MAX).contains(&t) => errors.add(
            "cooking_time",
            format!("Cooking time must be between {COOKING_TIME_MIN} and {COOKING_TIME_MAX} minutes"),
        ),
        Some(_) => {}
    }

    let image_missing = draft
        .image
        .as_deref()
        .map_or(true, |image| image.trim().is_empty());
    if mode == DraftMode::Create && image_missing {
        errors.add("image", "An image is required");
    }

    if draft.tags.is_empty() {
        errors.add("tags", "At least one tag is required");
    }
    let repeated_tags = duplicates(draft.tags.iter().copied());
    if !repeated_tags.is_empty() {
        errors.add("tags", format!("Tags must not repeat: {}", join_ids(&repeated_tags)));
    }

    if draft.ingredients.is_empty() {
        errors.add("ingredients", "At least one ingredient is required");
    }
    let repeated_ingredients = duplicates(draft.ingredients.iter().map(|i| i.id));
    if !repeated_ingredients.is_empty() {
        errors.add(
            "ingredients",
            format!(
                "Ingredients must not repeat: {}",
                join_ids(&repeated_ingredients)
            ),
        );
    }
    for entry in &draft.ingredients {
        if !(AMOUNT_MIN..=AMOUNT_MAX).contains(&entry.amount) {
            errors.add(
                "ingredients",
                format!(
                    "Amount of ingredient {} must be between {AMOUNT_MIN} and {AMOUNT_MAX}",
                    entry.id
                ),
            );
        }
    }

    errors
}

/// Append an error to `field` listing the ids in `requested` that are not
/// in `found`. Does nothing when all ids were found.
pub fn report_unknown_ids(
    errors: &mut FieldErrors,
    field: &str,
    requested: &[DbId],
    found: &[DbId],
) {
    let found: HashSet<DbId> = found.iter().copied().collect();
    let mut unknown: Vec<DbId> = requested
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect();
    unknown.sort_unstable();
    unknown.dedup();

    if !unknown.is_empty() {
        errors.add(field, format!("Unknown ids: {}", join_ids(&unknown)));
    }
}

/// Ids that occur more than once, sorted.
fn duplicates(ids: impl Iterator<Item = DbId>) -> Vec<DbId> {
    let mut seen = HashSet::new();
    let mut repeated: Vec<DbId> = ids.filter(|id| !seen.insert(*id)).collect();
    repeated.sort_unstable();
    repeated.dedup();
    repeated
}

fn join_ids(ids: &[DbId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> RecipeDraft {
        RecipeDraft {
            ingredients: vec![
                IngredientAmount { id: 1, amount: 200 },
                IngredientAmount { id: 2, amount: 3 },
            ],
            tags: vec![1],
            image: Some("data:image/png;base64,AAAA".into()),
            name: "Pancakes".into(),
            text: "Mix and fry.".into(),
            cooking_time: Some(20),
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(check_draft(&valid_draft(), DraftMode::Create).is_empty());
    }

    #[test]
    fn image_is_optional_on_update_only() {
        let draft = RecipeDraft {
            image: None,
            ..valid_draft()
        };
        assert!(check_draft(&draft, DraftMode::Update).is_empty());
        assert!(check_draft(&draft, DraftMode::Create).get("image").is_some());
    }

    #[test]
    fn empty_payload_reports_every_field() {
        let errors = check_draft(&RecipeDraft::default(), DraftMode::Create);
        for field in ["name", "text", "cooking_time", "image", "tags", "ingredients"] {
            assert!(errors.get(field).is_some(), "expected error for {field}");
        }
    }

    #[test]
    fn out_of_range_values_are_all_reported() {
        let draft = RecipeDraft {
            ingredients: vec![
                IngredientAmount { id: 1, amount: 0 },
                IngredientAmount { id: 2, amount: 10_000 },
            ],
            cooking_time: Some(0),
            ..valid_draft()
        };
        let errors = check_draft(&draft, DraftMode::Create);

        assert_eq!(errors.get("ingredients").map(<[String]>::len), Some(2));
        assert_eq!(errors.get("cooking_time").map(<[String]>::len), Some(1));
    }

    #[test]
    fn duplicates_are_reported_once_per_id() {
        let draft = RecipeDraft {
            tags: vec![3, 1, 3, 3],
            ingredients: vec![
                IngredientAmount { id: 5, amount: 1 },
                IngredientAmount { id: 5, amount: 2 },
            ],
            ..valid_draft()
        };
        let errors = check_draft(&draft, DraftMode::Update);

        assert_eq!(
            errors.get("tags"),
            Some(&["Tags must not repeat: 3".to_string()][..])
        );
        assert_eq!(
            errors.get("ingredients"),
            Some(&["Ingredients must not repeat: 5".to_string()][..])
        );
    }

    #[test]
    fn overlong_name_is_rejected() {
        let draft = RecipeDraft {
            name: "x".repeat(257),
            ..valid_draft()
        };
        let errors = check_draft(&draft, DraftMode::Create);
        assert_eq!(
            errors.get("name"),
            Some(&["Name must be at most 256 characters".to_string()][..])
        );
    }

    #[test]
    fn unknown_ids_are_listed() {
        let mut errors = FieldErrors::new();
        report_unknown_ids(&mut errors, "tags", &[4, 2, 9, 2], &[2]);
        assert_eq!(errors.get("tags"), Some(&["Unknown ids: 4, 9".to_string()][..]));

        let mut errors = FieldErrors::new();
        report_unknown_ids(&mut errors, "tags", &[1], &[1]);
        assert!(errors.is_empty());
    }
}
