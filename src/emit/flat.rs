//! JSON and CSV output. Both carry the same row shape as the relational
//! `commentary` table, with identical field names.

use anyhow::{Context, Result};
use std::io::{Read, Write};

use crate::models::CommentaryRow;

/// Writes the rows as one JSON array of objects.
pub fn write_json<W: Write>(writer: W, rows: &[CommentaryRow]) -> Result<()> {
    serde_json::to_writer_pretty(writer, rows).context("Failed to serialize rows as JSON")?;
    Ok(())
}

/// Writes the rows as CSV. The header row is always present, even when
/// there are no rows.
pub fn write_csv<W: Write>(writer: W, rows: &[CommentaryRow]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(CommentaryRow::COLUMNS)?;
    for row in rows {
        csv_writer
            .serialize(row)
            .with_context(|| format!("Failed to write CSV row {}", row.id))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn read_json<R: Read>(reader: R) -> Result<Vec<CommentaryRow>> {
    serde_json::from_reader(reader).context("Failed to read JSON rows")
}

pub fn read_csv<R: Read>(reader: R) -> Result<Vec<CommentaryRow>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    if headers.iter().ne(CommentaryRow::COLUMNS) {
        anyhow::bail!("Unexpected CSV header: {:?}", headers);
    }
    csv_reader
        .deserialize()
        .collect::<Result<Vec<CommentaryRow>, _>>()
        .context("Failed to read CSV rows")
}
