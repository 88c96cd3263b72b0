//! Catalog import used by the `foodgram-import` binary.

use std::path::Path;

use anyhow::{bail, Context, Result};
use foodgram_core::catalog_import::{parse_ingredients, parse_tags, CatalogFormat};
use foodgram_db::repositories::{IngredientRepo, TagRepo};
use foodgram_db::DbPool;

/// Outcome of one import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// Distinct entries read from the file.
    pub parsed: usize,
    /// Rows written (inserted, or upserted for tags).
    pub written: u64,
}

/// Load an ingredient catalog (CSV or JSON, chosen by extension).
///
/// Pairs that already exist are skipped.
pub async fn import_ingredients(pool: &DbPool, path: &Path) -> Result<ImportReport> {
    let Some(format) = CatalogFormat::from_path(&path.to_string_lossy()) else {
        bail!("{}: expected a .csv or .json file", path.display());
    };
    let data = read(path)?;
    let entries = parse_ingredients(&data, format)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let written = IngredientRepo::insert_many(pool, &entries).await?;
    tracing::info!(
        parsed = entries.len(),
        inserted = written,
        skipped = entries.len() as u64 - written,
        "Ingredients imported"
    );
    Ok(ImportReport {
        parsed: entries.len(),
        written,
    })
}

/// Load a tag catalog (JSON). Existing tags are updated by slug.
pub async fn import_tags(pool: &DbPool, path: &Path) -> Result<ImportReport> {
    let data = read(path)?;
    let tags = parse_tags(&data).with_context(|| format!("Failed to parse {}", path.display()))?;

    for tag in &tags {
        let saved = TagRepo::upsert(pool, tag).await?;
        tracing::debug!(id = saved.id, slug = %saved.slug, "Tag saved");
    }
    tracing::info!(count = tags.len(), "Tags imported");
    Ok(ImportReport {
        parsed: tags.len(),
        written: tags.len() as u64,
    })
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}
