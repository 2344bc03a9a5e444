//! Pipeline orchestration.
//!
//! Coordinates the compile flow: discovery → author metadata → commentary
//! records. Author metadata is fully loaded before the first content
//! document is read. Unparseable content documents are skipped with a
//! warning; every other failure aborts the run unless `keep_going` is set.

use std::path::{Path, PathBuf};

use crate::authors::{load_authors, load_authors_lenient, AuthorTable};
use crate::commentary::process_file;
use crate::config::Config;
use crate::discover::{discover, DiscoveredDocuments};
use crate::error::CompileError;
use crate::models::Commentary;

#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    /// Record fatal per-document errors and continue instead of aborting.
    pub keep_going: bool,
}

/// Result of processing one content document.
#[derive(Debug)]
pub enum DocumentOutcome {
    Records(Vec<Commentary>),
    Skipped { path: PathBuf, error: CompileError },
    Failed { path: PathBuf, error: CompileError },
}

impl DocumentOutcome {
    pub fn for_path(path: &Path, result: Result<Vec<Commentary>, CompileError>) -> Self {
        match result {
            Ok(records) => DocumentOutcome::Records(records),
            Err(error) if error.is_skippable() => DocumentOutcome::Skipped {
                path: path.to_path_buf(),
                error,
            },
            Err(error) => DocumentOutcome::Failed {
                path: path.to_path_buf(),
                error,
            },
        }
    }
}

/// Everything the emitters need, plus what went wrong on the way.
#[derive(Debug, Default)]
pub struct Compilation {
    pub authors: AuthorTable,
    /// Records in traversal order, then entry order within a document.
    pub records: Vec<Commentary>,
    pub documents_read: usize,
    pub skipped: Vec<(PathBuf, CompileError)>,
    /// Only populated with `keep_going`; otherwise the first such error is returned.
    pub failed: Vec<CompileError>,
}

impl Compilation {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

pub fn compile(config: &Config, options: CompileOptions) -> Result<Compilation, CompileError> {
    let docs = discover(&config.input)?;
    compile_documents(&docs, options)
}

pub fn compile_documents(
    docs: &DiscoveredDocuments,
    options: CompileOptions,
) -> Result<Compilation, CompileError> {
    let mut compilation = Compilation::default();

    compilation.authors = if options.keep_going {
        let (authors, errors) = load_authors_lenient(&docs.metadata);
        for error in errors {
            tracing::error!("{}", error);
            compilation.failed.push(error);
        }
        authors
    } else {
        load_authors(&docs.metadata)?
    };
    tracing::info!(
        authors = compilation.authors.len(),
        documents = docs.content.len(),
        "author metadata loaded"
    );

    for path in &docs.content {
        let result = process_file(&docs.root, path, &compilation.authors);
        let outcome = DocumentOutcome::for_path(path, result);
        compilation.documents_read += 1;

        match outcome {
            DocumentOutcome::Records(records) => {
                tracing::debug!(path = %path.display(), records = records.len(), "document compiled");
                compilation.records.extend(records);
            }
            DocumentOutcome::Skipped { path, error } => {
                tracing::warn!("skipping {}: {}", path.display(), error);
                compilation.skipped.push((path, error));
            }
            DocumentOutcome::Failed { path, error } => {
                if !options.keep_going {
                    return Err(error);
                }
                tracing::error!("{}: {}", path.display(), error);
                compilation.failed.push(error);
            }
        }
    }

    Ok(compilation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputConfig;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn config_for(root: &Path) -> Config {
        Config {
            input: InputConfig {
                root: root.to_path_buf(),
                ..InputConfig::default()
            },
            ..Config::default()
        }
    }

    fn sample_tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(
            root,
            "Origen/metadata.toml",
            "default_year = 230\nwiki = \"https://en.wikipedia.org/wiki/Origen\"\n",
        );
        write(
            root,
            "Origen/John 3_16.toml",
            "commentary = [{quote=\"In the beginning...\"}]\n",
        );
        write(
            root,
            "Origen/John 1_1-3.toml",
            "commentary = [{quote=\"one\"}, {quote=\"two\", time=325}]\n",
        );
        write(root, "Jerome/Matthew 5_1.toml", "commentary = [{quote=\"three\"}]\n");
        tmp
    }

    #[test]
    fn compiles_tree_in_traversal_order() {
        let tmp = sample_tree();
        let out = compile(&config_for(tmp.path()), CompileOptions::default()).unwrap();

        assert!(out.is_clean());
        assert_eq!(out.documents_read, 3);
        let texts: Vec<&str> = out.records.iter().map(|c| c.txt.as_str()).collect();
        assert_eq!(texts, vec!["three", "one", "two", "In the beginning..."]);

        let dates: Vec<i64> = out.records.iter().map(|c| c.date).collect();
        assert_eq!(dates, vec![9_999_999, 230, 325, 230]);
        assert_eq!(out.authors.len(), 1);
    }

    #[test]
    fn padded_author_directory_keeps_default_year() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "Origen /metadata.toml",
            "default_year = 230\nwiki = \"https://en.wikipedia.org/wiki/Origen\"\n",
        );
        write(
            tmp.path(),
            "Origen /John 3_16.toml",
            "commentary = [{quote=\"In the beginning...\"}]\n",
        );

        let out = compile(&config_for(tmp.path()), CompileOptions::default()).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].father_name, "Origen");
        assert_eq!(out.records[0].date, 230);
        let names: Vec<&str> = out.authors.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec![out.records[0].father_name.as_str()]);
    }

    #[test]
    fn nested_trees_record_distinct_documents() {
        let tmp = TempDir::new().unwrap();
        for tree in ["greek", "latin"] {
            write(
                tmp.path(),
                &format!("{}/Origen/John 3_16.toml", tree),
                "commentary = [{quote=\"x\"}]\n",
            );
        }

        let out = compile(&config_for(tmp.path()), CompileOptions::default()).unwrap();
        let documents: Vec<&str> = out.records.iter().map(|c| c.document.as_str()).collect();
        assert_eq!(
            documents,
            vec!["greek/Origen/John 3_16.toml", "latin/Origen/John 3_16.toml"]
        );

        let ids = crate::emit::rows::IdGenerator::new(crate::config::IdStrategy::Content);
        let rows = crate::emit::rows::to_rows(&out.records, &ids);
        assert_ne!(rows[0].id, rows[1].id);
    }

    #[test]
    fn unparseable_document_is_skipped() {
        let tmp = sample_tree();
        write(tmp.path(), "Origen/Romans 1_1.toml", "commentary = [{quote=");

        let out = compile(&config_for(tmp.path()), CompileOptions::default()).unwrap();
        assert_eq!(out.records.len(), 4);
        assert_eq!(out.skipped.len(), 1);
        assert!(out.skipped[0].0.ends_with("Origen/Romans 1_1.toml"));
        assert!(out.failed.is_empty());
    }

    #[test]
    fn malformed_filename_aborts() {
        let tmp = sample_tree();
        write(tmp.path(), "Origen/Romans.toml", "commentary = []");

        let err = compile(&config_for(tmp.path()), CompileOptions::default()).unwrap_err();
        assert!(matches!(err, CompileError::MalformedFilename { .. }));
    }

    #[test]
    fn incomplete_author_metadata_aborts_before_content() {
        let tmp = sample_tree();
        write(tmp.path(), "Jerome/metadata.toml", "default_year = 400\n");

        let err = compile(&config_for(tmp.path()), CompileOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            CompileError::IncompleteAuthorMetadata { ref dir, .. } if dir == "Jerome"
        ));
    }

    #[test]
    fn keep_going_collects_every_failure() {
        let tmp = sample_tree();
        write(tmp.path(), "Jerome/metadata.toml", "default_year = 400\n");
        write(tmp.path(), "Origen/Romans.toml", "commentary = []");
        write(tmp.path(), "Origen/Acts 2_1.toml", "commentary = [{time = 1}]");
        write(tmp.path(), "Origen/Jude 1_1.toml", "not toml at all");

        let out = compile(
            &config_for(tmp.path()),
            CompileOptions { keep_going: true },
        )
        .unwrap();
        assert_eq!(out.failed.len(), 3);
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.records.len(), 4);
        assert!(!out.is_clean());
    }
}
