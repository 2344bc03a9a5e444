//! Author, book and verse range derived from a document's path.
//!
//! `Origen/1 Corinthians 7_1-9.toml` yields father `Origen`, book
//! `1 Corinthians` and range 7:1-9.

use std::path::Path;

use crate::error::CompileError;
use crate::models::PathMetadata;
use crate::verse::VerseRange;

pub fn path_to_metadata(path: &Path) -> Result<PathMetadata, CompileError> {
    let malformed = |reason: String| CompileError::MalformedFilename {
        path: path.to_path_buf(),
        reason,
    };

    let father_name = path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| malformed("no parent directory to take the author from".to_string()))?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .ok_or_else(|| malformed("no file name".to_string()))?;

    let (book, token) = stem
        .rsplit_once(' ')
        .ok_or_else(|| malformed("expected '<Book> <chapter>_<verse>'".to_string()))?;

    let bible_book_name = book.trim();
    if bible_book_name.is_empty() {
        return Err(malformed("no book name before the verse token".to_string()));
    }

    let bible_verse_range = token
        .parse::<VerseRange>()
        .map_err(|e| malformed(e.to_string()))?;

    Ok(PathMetadata {
        father_name: father_name.trim().to_string(),
        bible_book_name: bible_book_name.to_string(),
        bible_verse_range,
    })
}
