//! Output emitters.
//!
//! Each emitter consumes the full, ordered record sequence of a
//! [`Compilation`]. File outputs are written to a temporary file next to the
//! destination and only persisted once complete, so a failed run never
//! leaves a half-written output behind.

pub mod flat;
pub mod osis;
pub mod rows;
pub mod sqlite;

use anyhow::{Context, Result};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::pipeline::Compilation;

/// The closed set of things a run can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Json,
    Csv,
    Sqlite,
    Osis,
    DryRun,
}

impl OutputKind {
    pub fn name(&self) -> &'static str {
        match self {
            OutputKind::Json => "json",
            OutputKind::Csv => "csv",
            OutputKind::Sqlite => "sqlite",
            OutputKind::Osis => "osis",
            OutputKind::DryRun => "dryrun",
        }
    }

    /// Output path used when none is given; `None` for a dry run.
    pub fn default_path(&self) -> Option<&'static str> {
        match self {
            OutputKind::Json => Some("data.json"),
            OutputKind::Csv => Some("data.csv"),
            OutputKind::Sqlite => Some("data.sqlite"),
            OutputKind::Osis => Some("data.xml"),
            OutputKind::DryRun => None,
        }
    }
}

/// What an emitter wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitSummary {
    pub path: Option<PathBuf>,
    pub records_written: usize,
    pub records_dropped: usize,
}

pub async fn emit(
    kind: OutputKind,
    compilation: &Compilation,
    config: &Config,
    out: &Path,
) -> Result<EmitSummary> {
    let ids = rows::IdGenerator::new(config.output.id_strategy);
    let mut summary = match kind {
        OutputKind::Json => {
            let rows = rows::to_rows(&compilation.records, &ids);
            write_atomically(out, |w| flat::write_json(w, &rows))?;
            EmitSummary {
                records_written: rows.len(),
                ..EmitSummary::default()
            }
        }
        OutputKind::Csv => {
            let rows = rows::to_rows(&compilation.records, &ids);
            write_atomically(out, |w| flat::write_csv(w, &rows))?;
            EmitSummary {
                records_written: rows.len(),
                ..EmitSummary::default()
            }
        }
        OutputKind::Sqlite => {
            let rows = rows::to_rows(&compilation.records, &ids);
            sqlite::write_database(out, &compilation.authors, &rows).await?;
            EmitSummary {
                records_written: rows.len(),
                ..EmitSummary::default()
            }
        }
        OutputKind::Osis => {
            let mut stats = osis::OsisStats::default();
            write_atomically(out, |w| {
                stats = osis::write_osis(w, &compilation.records, &config.osis)?;
                Ok(())
            })?;
            EmitSummary {
                records_written: stats.written,
                records_dropped: stats.dropped,
                ..EmitSummary::default()
            }
        }
        OutputKind::DryRun => return Ok(EmitSummary::default()),
    };
    summary.path = Some(out.to_path_buf());
    Ok(summary)
}

/// Runs `write` against a temporary file beside `path`, flushes it, then
/// renames it over `path`. The temporary file is removed if anything fails.
pub fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let dir = parent_dir(path)?;
    let tmp = tempfile::Builder::new()
        .prefix(".commentaries-")
        .tempfile_in(&dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;

    {
        let mut writer = BufWriter::new(tmp.as_file());
        write(&mut writer)?;
        writer
            .flush()
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to sync {}", path.display()))?;

    tmp.persist(path)
        .with_context(|| format!("Failed to move output into place at {}", path.display()))?;
    Ok(())
}

/// Directory an output file lives in, created if missing.
pub(crate) fn parent_dir(path: &Path) -> Result<PathBuf> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_paths_differ_per_kind() {
        let paths: Vec<_> = [
            OutputKind::Json,
            OutputKind::Csv,
            OutputKind::Sqlite,
            OutputKind::Osis,
        ]
        .iter()
        .map(|k| k.default_path().unwrap())
        .collect();
        let mut unique = paths.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), paths.len());
        assert_eq!(OutputKind::DryRun.default_path(), None);
    }

    #[test]
    fn atomic_write_replaces_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/out.txt");
        write_atomically(&path, |w| {
            w.write_all(b"first")?;
            Ok(())
        })
        .unwrap();
        write_atomically(&path, |w| {
            w.write_all(b"second")?;
            Ok(())
        })
        .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn failed_write_leaves_previous_output_and_no_temp_files() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.txt");
        std::fs::write(&path, "previous").unwrap();

        let result = write_atomically(&path, |w| {
            w.write_all(b"partial")?;
            anyhow::bail!("boom")
        });
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous");

        let entries: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn dry_run_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("never.json");
        let summary = emit(
            OutputKind::DryRun,
            &Compilation::default(),
            &Config::default(),
            &out,
        )
        .await
        .unwrap();
        assert_eq!(summary, EmitSummary::default());
        assert!(!out.exists());
    }
}
