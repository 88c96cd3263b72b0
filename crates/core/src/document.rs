//! Shopping-list document rendering.
//!
//! Turns aggregated [`ShoppingItem`]s into a downloadable file. Two formats
//! are supported:
//!
//! - [`ShoppingListFormat::Docx`] -- a minimal WordprocessingML package
//!   (heading paragraph + three-column table) assembled in memory.
//! - [`ShoppingListFormat::Txt`] -- numbered plain-text lines.
//!
//! An empty item list is rendered as an explicit "empty" notice, never as an
//! empty table.

use std::io::{Cursor, Write};
use std::str::FromStr;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::CoreError;
use crate::shopping_list::ShoppingItem;

/// Notice rendered instead of a table when the cart is empty.
pub const EMPTY_LIST_NOTICE: &str = "Shopping list is empty";

/// Column headers of the DOCX table.
const TABLE_HEADERS: [&str; 3] = ["№", "Ingredient", "Amount"];

/// Column widths in twentieths of a point.
const COLUMN_WIDTHS: [u32; 3] = [800, 5600, 2600];

const CONTENT_TYPES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" "#,
    r#"ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"</Types>"#,
);

const PACKAGE_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" "#,
    r#"Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" "#,
    r#"Target="word/document.xml"/>"#,
    r#"</Relationships>"#,
);

/// Output format of the downloadable shopping list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShoppingListFormat {
    #[default]
    Docx,
    Txt,
}

impl FromStr for ShoppingListFormat {
    type Err = CoreError;

    /// Case-insensitive; `text` is accepted for `txt`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "docx" => Ok(Self::Docx),
            "txt" | "text" => Ok(Self::Txt),
            other => Err(CoreError::Validation(format!(
                "Unsupported shopping list format '{other}'; expected docx or txt"
            ))),
        }
    }
}

impl ShoppingListFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Txt => "text/plain; charset=utf-8",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }
}

/// A fully built document, ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

/// Render the shopping list for `owner_label` (usually the username).
///
/// Either the whole document is produced or an error is returned; callers
/// never see a partially written buffer.
pub fn render(
    owner_label: &str,
    items: &[ShoppingItem],
    format: ShoppingListFormat,
) -> Result<RenderedDocument, CoreError> {
    let title = format!("Shopping list for {owner_label}");

    let bytes = match format {
        ShoppingListFormat::Docx => build_docx(&title, items)?,
        ShoppingListFormat::Txt => build_text(&title, items).into_bytes(),
    };

    Ok(RenderedDocument {
        bytes,
        content_type: format.content_type(),
        file_name: format!(
            "shopping_list_{}.{}",
            sanitize_file_stem(owner_label),
            format.extension()
        ),
    })
}

/// Amount cell text: `"<total> <unit>"`.
pub fn format_amount(item: &ShoppingItem) -> String {
    format!("{} {}", item.total, item.measurement_unit)
}

// ---------------------------------------------------------------------------
// Plain text
// ---------------------------------------------------------------------------

fn build_text(title: &str, items: &[ShoppingItem]) -> String {
    let mut out = String::with_capacity(64 + items.len() * 32);
    out.push_str(title);
    out.push_str("\n\n");

    if items.is_empty() {
        out.push_str(EMPTY_LIST_NOTICE);
        out.push('\n');
        return out;
    }

    for (index, item) in items.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} - {}\n",
            index + 1,
            item.name,
            format_amount(item)
        ));
    }
    out
}

// ---------------------------------------------------------------------------
// DOCX
// ---------------------------------------------------------------------------

fn build_docx(title: &str, items: &[ShoppingItem]) -> Result<Vec<u8>, CoreError> {
    let document_xml = document_xml(title, items);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, contents) in [
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", PACKAGE_RELS_XML),
        ("word/document.xml", document_xml.as_str()),
    ] {
        zip.start_file(path, options)
            .map_err(|e| CoreError::Internal(format!("Failed to add {path} to document: {e}")))?;
        zip.write_all(contents.as_bytes())
            .map_err(|e| CoreError::Internal(format!("Failed to write {path}: {e}")))?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| CoreError::Internal(format!("Failed to finalize document: {e}")))?;
    Ok(cursor.into_inner())
}

fn document_xml(title: &str, items: &[ShoppingItem]) -> String {
    let mut body = String::new();
    body.push_str(&heading_paragraph(title));

    if items.is_empty() {
        body.push_str(&paragraph(EMPTY_LIST_NOTICE));
    } else {
        body.push_str(&items_table(items));
        // Word expects a paragraph between a table and the section properties.
        body.push_str("<w:p/>");
    }

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
            "<w:body>{body}<w:sectPr/></w:body></w:document>"
        ),
        body = body
    )
}

fn heading_paragraph(text: &str) -> String {
    format!(
        r#"<w:p><w:r><w:rPr><w:b/><w:sz w:val="32"/></w:rPr><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        xml_escape(text)
    )
}

fn paragraph(text: &str) -> String {
    format!(
        r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        xml_escape(text)
    )
}

fn table_row(cells: [&str; 3]) -> String {
    let mut row = String::from("<w:tr>");
    for (cell, width) in cells.iter().zip(COLUMN_WIDTHS) {
        row.push_str(&format!(
            r#"<w:tc><w:tcPr><w:tcW w:w="{width}" w:type="dxa"/></w:tcPr>{}</w:tc>"#,
            paragraph(cell)
        ));
    }
    row.push_str("</w:tr>");
    row
}

fn items_table(items: &[ShoppingItem]) -> String {
    let mut table = String::from(concat!(
        "<w:tbl><w:tblPr>",
        r#"<w:tblW w:w="0" w:type="auto"/>"#,
        "<w:tblBorders>",
        r#"<w:top w:val="single" w:sz="4" w:space="0" w:color="000000"/>"#,
        r#"<w:left w:val="single" w:sz="4" w:space="0" w:color="000000"/>"#,
        r#"<w:bottom w:val="single" w:sz="4" w:space="0" w:color="000000"/>"#,
        r#"<w:right w:val="single" w:sz="4" w:space="0" w:color="000000"/>"#,
        r#"<w:insideH w:val="single" w:sz="4" w:space="0" w:color="000000"/>"#,
        r#"<w:insideV w:val="single" w:sz="4" w:space="0" w:color="000000"/>"#,
        "</w:tblBorders></w:tblPr><w:tblGrid>",
    ));
    for width in COLUMN_WIDTHS {
        table.push_str(&format!(r#"<w:gridCol w:w="{width}"/>"#));
    }
    table.push_str("</w:tblGrid>");

    table.push_str(&table_row(TABLE_HEADERS));
    for (index, item) in items.iter().enumerate() {
        let number = (index + 1).to_string();
        let amount = format_amount(item);
        table.push_str(&table_row([number.as_str(), item.name.as_str(), amount.as_str()]));
    }

    table.push_str("</w:tbl>");
    table
}

fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Keep `[A-Za-z0-9_-]`, replace everything else with `_`.
fn sanitize_file_stem(label: &str) -> String {
    let stem: String = label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if stem.is_empty() {
        "user".to_string()
    } else {
        stem
    }
}
