//! Input tree discovery.
//!
//! Walks the configured root and splits matching files into author metadata
//! documents and content documents. Only files inside an author directory
//! are considered; anything sitting directly in the root is ignored.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::PathBuf;
use walkdir::WalkDir;

use crate::config::InputConfig;
use crate::error::CompileError;

/// Files found under the input root, in traversal order.
#[derive(Debug, Default, Clone)]
pub struct DiscoveredDocuments {
    pub root: PathBuf,
    pub metadata: Vec<PathBuf>,
    pub content: Vec<PathBuf>,
}

pub fn discover(input: &InputConfig) -> Result<DiscoveredDocuments, CompileError> {
    let root = &input.root;
    if !root.is_dir() {
        return Err(CompileError::Discovery(format!(
            "input root is not a directory: {}",
            root.display()
        )));
    }

    let include_set = build_globset(&input.include_globs)?;

    let mut default_excludes = vec!["**/.git/**".to_string(), "**/target/**".to_string()];
    default_excludes.extend(input.exclude_globs.iter().cloned());
    let exclude_set = build_globset(&default_excludes)?;

    let mut found = DiscoveredDocuments {
        root: root.clone(),
        ..DiscoveredDocuments::default()
    };

    let walker = WalkDir::new(root)
        .min_depth(2)
        .follow_links(input.follow_symlinks)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|e| CompileError::Discovery(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().replace('\\', "/");

        if exclude_set.is_match(&rel_str) {
            continue;
        }
        if !include_set.is_match(&rel_str) {
            continue;
        }

        if entry.file_name().to_string_lossy() == input.metadata_file {
            found.metadata.push(path.to_path_buf());
        } else {
            found.content.push(path.to_path_buf());
        }
    }

    tracing::debug!(
        metadata = found.metadata.len(),
        content = found.content.len(),
        root = %root.display(),
        "discovered documents"
    );

    Ok(found)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, CompileError> {
    let invalid = |e: globset::Error| CompileError::Discovery(e.to_string());
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).map_err(invalid)?);
    }
    builder.build().map_err(invalid)
}
