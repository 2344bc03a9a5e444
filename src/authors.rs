//! Per-author defaults loaded from each author directory's metadata document.
//!
//! The table is built once, before any content document is read, and is
//! only ever handed out by shared reference afterwards.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::CompileError;
use crate::models::AuthorMetadata;

/// Author defaults keyed by author directory name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuthorTable {
    authors: BTreeMap<String, AuthorMetadata>,
}

impl AuthorTable {
    pub fn get(&self, father_name: &str) -> Option<&AuthorMetadata> {
        self.authors.get(father_name)
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    /// Authors in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AuthorMetadata)> {
        self.authors.iter().map(|(name, meta)| (name.as_str(), meta))
    }
}

impl FromIterator<(String, AuthorMetadata)> for AuthorTable {
    fn from_iter<I: IntoIterator<Item = (String, AuthorMetadata)>>(iter: I) -> Self {
        Self {
            authors: iter.into_iter().collect(),
        }
    }
}

/// Loads every metadata document; a later document for the same directory
/// name replaces an earlier one.
///
/// Stops at the first broken document.
pub fn load_authors(paths: &[PathBuf]) -> Result<AuthorTable, CompileError> {
    let mut table = AuthorTable::default();
    for path in paths {
        let (name, meta) = load_author(path)?;
        insert(&mut table, name, meta);
    }
    Ok(table)
}

/// Like [`load_authors`], but collects broken documents instead of stopping.
pub fn load_authors_lenient(paths: &[PathBuf]) -> (AuthorTable, Vec<CompileError>) {
    let mut table = AuthorTable::default();
    let mut errors = Vec::new();
    for path in paths {
        match load_author(path) {
            Ok((name, meta)) => insert(&mut table, name, meta),
            Err(e) => errors.push(e),
        }
    }
    (table, errors)
}

fn insert(table: &mut AuthorTable, name: String, meta: AuthorMetadata) {
    if table.authors.insert(name.clone(), meta).is_some() {
        tracing::debug!(author = %name, "author metadata replaced by a later document");
    }
}

/// Reads one metadata document, returning the author name and its defaults.
pub fn load_author(path: &Path) -> Result<(String, AuthorMetadata), CompileError> {
    let text = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = author_dir_name(path)?;
    let meta = parse_author(&name, path, &text)?;
    Ok((name, meta))
}

fn author_dir_name(path: &Path) -> Result<String, CompileError> {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| CompileError::MalformedFilename {
            path: path.to_path_buf(),
            reason: "metadata document is not inside an author directory".to_string(),
        })
}

fn parse_author(dir: &str, path: &Path, text: &str) -> Result<AuthorMetadata, CompileError> {
    let doc: toml::Table = toml::from_str(text).map_err(|e| CompileError::DocumentParseError {
        path: path.to_path_buf(),
        reason: e.message().to_string(),
    })?;

    let incomplete = |field: &'static str, expected: &'static str| {
        CompileError::IncompleteAuthorMetadata {
            dir: dir.to_string(),
            path: path.to_path_buf(),
            field,
            expected,
        }
    };

    let default_year = doc
        .get("default_year")
        .and_then(toml::Value::as_integer)
        .ok_or_else(|| incomplete("default_year", "an integer"))?;
    let wiki = doc
        .get("wiki")
        .and_then(toml::Value::as_str)
        .ok_or_else(|| incomplete("wiki", "a string"))?;

    Ok(AuthorMetadata {
        default_year,
        wiki: wiki.trim().to_string(),
    })
}
