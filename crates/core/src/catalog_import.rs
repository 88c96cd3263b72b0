//! Parsers for the ingredient and tag catalog files.
//!
//! Ingredients ship as either a two-column CSV (`name,measurement_unit`, no
//! header) or a JSON array of objects; tags ship as JSON. Parsing is pure;
//! the `foodgram-import` binary feeds the result to the repositories.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::CoreError;

/// An ingredient catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}

/// A tag catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewTag {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Catalog file encodings, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Csv,
    Json,
}

impl CatalogFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse an ingredient catalog.
///
/// Values are trimmed, blank lines skipped, and exact duplicates of an
/// earlier `(name, measurement_unit)` pair dropped.
pub fn parse_ingredients(
    data: &[u8],
    format: CatalogFormat,
) -> Result<Vec<NewIngredient>, CoreError> {
    let raw = match format {
        CatalogFormat::Json => serde_json::from_slice::<Vec<NewIngredient>>(data)
            .map_err(|e| CoreError::Validation(format!("Invalid ingredient JSON: {e}")))?,
        CatalogFormat::Csv => parse_ingredient_csv(data)?,
    };

    let mut seen = HashSet::new();
    let mut ingredients = Vec::with_capacity(raw.len());
    for (index, entry) in raw.into_iter().enumerate() {
        let name = entry.name.trim().to_string();
        let measurement_unit = entry.measurement_unit.trim().to_string();
        if name.is_empty() || measurement_unit.is_empty() {
            return Err(CoreError::Validation(format!(
                "Entry {}: name and measurement unit must not be blank",
                index + 1
            )));
        }
        if seen.insert((name.clone(), measurement_unit.clone())) {
            ingredients.push(NewIngredient {
                name,
                measurement_unit,
            });
        }
    }
    Ok(ingredients)
}

/// Parse a tag catalog (JSON only). Slugs must be unique within the file.
pub fn parse_tags(data: &[u8]) -> Result<Vec<NewTag>, CoreError> {
    let tags: Vec<NewTag> = serde_json::from_slice(data)
        .map_err(|e| CoreError::Validation(format!("Invalid tag JSON: {e}")))?;

    let mut slugs = HashSet::new();
    for tag in &tags {
        if tag.name.trim().is_empty() || tag.slug.trim().is_empty() {
            return Err(CoreError::Validation(
                "Tag name and slug must not be blank".into(),
            ));
        }
        if !slugs.insert(tag.slug.as_str()) {
            return Err(CoreError::Validation(format!(
                "Duplicate tag slug: {}",
                tag.slug
            )));
        }
    }
    Ok(tags)
}

fn parse_ingredient_csv(data: &[u8]) -> Result<Vec<NewIngredient>, CoreError> {
    let text = std::str::from_utf8(data)
        .map_err(|e| CoreError::Validation(format!("Invalid UTF-8: {e}")))?;

    let mut rows = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut values = parse_csv_line(line).into_iter();
        match (values.next(), values.next()) {
            (Some(name), Some(measurement_unit)) => rows.push(NewIngredient {
                name,
                measurement_unit,
            }),
            _ => {
                return Err(CoreError::Validation(format!(
                    "Line {}: expected `name,measurement_unit`",
                    line_no + 1
                )))
            }
        }
    }
    Ok(rows)
}

/// Parse a single CSV line, handling quoted fields.
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == ',' {
            result.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    result.push(current);
    result
}
