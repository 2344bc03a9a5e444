//! Commentary record builder.
//!
//! A content document is a TOML file holding a `commentary` array:
//!
//! ```toml
//! [[commentary]]
//! quote = "In the beginning was the Word..."
//! time = 230                         # optional, overrides the author default
//! append_to_author_name = "(Homily 2)"
//! sources = [{ url = "https://...", title = "Commentary on John" }]
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::authors::AuthorTable;
use crate::error::CompileError;
use crate::models::{Commentary, PathMetadata, UNKNOWN_DATE};
use crate::path_meta::path_to_metadata;

#[derive(Debug, Deserialize)]
struct RawDocument {
    commentary: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    quote: Option<String>,
    time: Option<i64>,
    append_to_author_name: Option<String>,
    #[serde(default)]
    sources: Vec<RawSource>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: String,
}

/// Resolves a record's date: explicit `time`, then the author default,
/// then [`UNKNOWN_DATE`].
pub fn commentary_date(father_name: &str, authors: &AuthorTable, time: Option<i64>) -> i64 {
    time.or_else(|| authors.get(father_name).map(|a| a.default_year))
        .unwrap_or(UNKNOWN_DATE)
}

/// Reads a content document under `root` from disk and builds its records.
pub fn process_file(
    root: &Path,
    path: &Path,
    authors: &AuthorTable,
) -> Result<Vec<Commentary>, CompileError> {
    let path_meta = path_to_metadata(path)?;
    let text = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    build_records(path, &relative_document(root, path), &path_meta, &text, authors)
}

/// `path` relative to `root` with `/` separators.
pub fn relative_document(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Builds the records of one document from its already-read text.
/// `document` is the root-relative path recorded on every record.
pub fn build_records(
    path: &Path,
    document: &str,
    path_meta: &PathMetadata,
    text: &str,
    authors: &AuthorTable,
) -> Result<Vec<Commentary>, CompileError> {
    let doc: RawDocument = toml::from_str(text).map_err(|e| CompileError::DocumentParseError {
        path: path.to_path_buf(),
        reason: e.message().to_string(),
    })?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    doc.commentary
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let txt = entry
                .quote
                .ok_or_else(|| CompileError::MissingQuoteField {
                    path: path.to_path_buf(),
                    index,
                })?;
            let (source_url, source_title) = entry
                .sources
                .first()
                .map(|s| (s.url.trim().to_string(), s.title.trim().to_string()))
                .unwrap_or_default();

            Ok(Commentary {
                document: document.to_string(),
                filename: filename.clone(),
                father_name: path_meta.father_name.trim().to_string(),
                bible_book_name: path_meta.bible_book_name.trim().to_string(),
                bible_verse_range: path_meta.bible_verse_range,
                source_url,
                source_title,
                date: commentary_date(&path_meta.father_name, authors, entry.time),
                append_to_author_name: entry
                    .append_to_author_name
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
                txt: txt.trim().to_string(),
                entry_index: index,
            })
        })
        .collect()
}
