//! Core data models used throughout the compiler.
//!
//! These types represent the path-derived metadata, author defaults, and
//! commentary records that flow from the input tree to the emitters.

use serde::{Deserialize, Serialize};

use crate::verse::VerseRange;

/// Date given to records whose author has no metadata document.
pub const UNKNOWN_DATE: i64 = 9_999_999;

/// What a document's path says about its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMetadata {
    pub father_name: String,
    pub bible_book_name: String,
    pub bible_verse_range: VerseRange,
}

/// Per-author defaults read from the author's metadata document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorMetadata {
    /// Negative for BC.
    pub default_year: i64,
    pub wiki: String,
}

/// A single normalized commentary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commentary {
    /// Document path relative to the input root, `/`-separated.
    pub document: String,
    pub filename: String,
    pub father_name: String,
    pub bible_book_name: String,
    pub bible_verse_range: VerseRange,
    pub source_url: String,
    pub source_title: String,
    pub date: i64,
    pub append_to_author_name: String,
    pub txt: String,
    /// Position of the entry within its document.
    pub entry_index: usize,
}

/// Flat row shared by the relational, JSON and CSV outputs.
///
/// Field order is the column order of the `commentary` table and of the
/// CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryRow {
    pub id: String,
    pub father_name: String,
    pub file_name: String,
    pub append_to_author_name: String,
    pub ts: i64,
    pub book: String,
    pub location_start: i64,
    pub location_end: i64,
    pub txt: String,
    pub source_url: String,
    pub source_title: String,
}

impl CommentaryRow {
    pub const COLUMNS: [&'static str; 11] = [
        "id",
        "father_name",
        "file_name",
        "append_to_author_name",
        "ts",
        "book",
        "location_start",
        "location_end",
        "txt",
        "source_url",
        "source_title",
    ];

    pub fn from_commentary(commentary: &Commentary, id: String) -> Self {
        Self {
            id,
            father_name: commentary.father_name.clone(),
            file_name: commentary.filename.clone(),
            append_to_author_name: commentary.append_to_author_name.clone(),
            ts: commentary.date,
            book: book_key(&commentary.bible_book_name),
            location_start: commentary.bible_verse_range.location_start(),
            location_end: commentary.bible_verse_range.location_end(),
            txt: commentary.txt.clone(),
            source_url: commentary.source_url.clone(),
            source_title: commentary.source_title.clone(),
        }
    }
}

/// Lowercased, space-free book name used as the `book` column.
pub fn book_key(book_name: &str) -> String {
    book_name.to_lowercase().replace(' ', "")
}
