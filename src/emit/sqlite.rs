//! SQLite output.
//!
//! The database is built in a temporary file beside the destination, filled
//! inside a single transaction, closed, and then renamed over the
//! destination. Both tables are dropped and recreated every run.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;

use crate::authors::AuthorTable;
use crate::emit::parent_dir;
use crate::models::CommentaryRow;

const SCHEMA: &[&str] = &[
    "DROP TABLE IF EXISTS father_meta",
    "DROP TABLE IF EXISTS commentary",
    r#"
    CREATE TABLE father_meta (
        name VARCHAR,
        default_year VARCHAR,
        wiki_url VARCHAR
    )
    "#,
    "CREATE UNIQUE INDEX idx_father_meta_name ON father_meta (name)",
    r#"
    CREATE TABLE commentary (
        id VARCHAR,
        father_name VARCHAR,
        file_name VARCHAR,
        append_to_author_name VARCHAR,
        ts INTEGER,
        book VARCHAR,
        location_start INTEGER,
        location_end INTEGER,
        txt TEXT,
        source_url VARCHAR,
        source_title VARCHAR
    )
    "#,
    "CREATE UNIQUE INDEX idx_commentary_id ON commentary (id)",
    "CREATE INDEX idx_commentary_book ON commentary (book)",
    "CREATE INDEX idx_commentary_location_start ON commentary (location_start)",
    "CREATE INDEX idx_commentary_location_end ON commentary (location_end)",
];

pub async fn connect(path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database {}", path.display()))?;

    Ok(pool)
}

/// Writes the author table and rows to a fresh database at `out`.
pub async fn write_database(
    out: &Path,
    authors: &AuthorTable,
    rows: &[CommentaryRow],
) -> Result<()> {
    let dir = parent_dir(out)?;
    let tmp = tempfile::Builder::new()
        .prefix(".commentaries-")
        .suffix(".sqlite")
        .tempfile_in(&dir)
        .with_context(|| format!("Failed to create temporary database in {}", dir.display()))?;

    let pool = connect(tmp.path()).await?;
    let loaded = load(&pool, authors, rows).await;
    pool.close().await;
    loaded?;

    tmp.persist(out)
        .with_context(|| format!("Failed to move database into place at {}", out.display()))?;
    tracing::info!(rows = rows.len(), path = %out.display(), "database written");
    Ok(())
}

/// Recreates the schema and inserts everything in one transaction.
pub async fn load(pool: &SqlitePool, authors: &AuthorTable, rows: &[CommentaryRow]) -> Result<()> {
    let mut tx = pool.begin().await?;

    for statement in SCHEMA {
        sqlx::query(*statement).execute(&mut *tx).await?;
    }

    for (name, meta) in authors.iter() {
        sqlx::query("INSERT INTO father_meta (name, default_year, wiki_url) VALUES (?, ?, ?)")
            .bind(name)
            .bind(meta.default_year)
            .bind(&meta.wiki)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert author '{}'", name))?;
    }

    for row in rows {
        sqlx::query(
            r#"
            INSERT INTO commentary (id, father_name, file_name, append_to_author_name, ts, book, location_start, location_end, txt, source_url, source_title)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.father_name)
        .bind(&row.file_name)
        .bind(&row.append_to_author_name)
        .bind(row.ts)
        .bind(&row.book)
        .bind(row.location_start)
        .bind(row.location_end)
        .bind(&row.txt)
        .bind(&row.source_url)
        .bind(&row.source_title)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to insert row from {}", row.file_name))?;
    }

    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthorMetadata;
    use sqlx::Row;
    use tempfile::TempDir;

    fn authors() -> AuthorTable {
        [(
            "Origen".to_string(),
            AuthorMetadata {
                default_year: 230,
                wiki: "https://en.wikipedia.org/wiki/Origen".to_string(),
            },
        )]
        .into_iter()
        .collect()
    }

    fn row(id: &str, start: i64) -> CommentaryRow {
        CommentaryRow {
            id: id.to_string(),
            father_name: "Origen".to_string(),
            file_name: "John 3_16.toml".to_string(),
            append_to_author_name: String::new(),
            ts: 230,
            book: "john".to_string(),
            location_start: start,
            location_end: start,
            txt: "In the beginning...".to_string(),
            source_url: String::new(),
            source_title: String::new(),
        }
    }

    #[tokio::test]
    async fn writes_tables_and_indexes() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("data.sqlite");
        write_database(&out, &authors(), &[row("a", 3_000_016), row("b", 1_000_001)])
            .await
            .unwrap();

        let pool = connect(&out).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM commentary")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 2);

        let first = sqlx::query("SELECT id, location_start, book FROM commentary ORDER BY rowid")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(first.get::<String, _>("id"), "a");
        assert_eq!(first.get::<i64, _>("location_start"), 3_000_016);
        assert_eq!(first.get::<String, _>("book"), "john");

        let wiki: String =
            sqlx::query_scalar("SELECT wiki_url FROM father_meta WHERE name = 'Origen'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(wiki, "https://en.wikipedia.org/wiki/Origen");

        let indexes: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(
            indexes,
            vec![
                "idx_commentary_book",
                "idx_commentary_id",
                "idx_commentary_location_end",
                "idx_commentary_location_start",
                "idx_father_meta_name",
            ]
        );
        pool.close().await;
    }

    #[tokio::test]
    async fn bc_default_year_is_stored_as_text() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("data.sqlite");
        let authors: AuthorTable = [(
            "Polycarp".to_string(),
            AuthorMetadata {
                default_year: -150,
                wiki: "https://en.wikipedia.org/wiki/Polycarp".to_string(),
            },
        )]
        .into_iter()
        .collect();
        write_database(&out, &authors, &[]).await.unwrap();

        let pool = connect(&out).await.unwrap();
        let row = sqlx::query(
            "SELECT default_year, typeof(default_year) AS kind FROM father_meta WHERE name = 'Polycarp'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(row.get::<String, _>("default_year"), "-150");
        assert_eq!(row.get::<String, _>("kind"), "text");
        pool.close().await;
    }

    #[tokio::test]
    async fn rerun_replaces_previous_contents() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("data.sqlite");
        write_database(&out, &authors(), &[row("a", 1), row("b", 2)])
            .await
            .unwrap();
        write_database(&out, &authors(), &[row("c", 3)]).await.unwrap();

        let pool = connect(&out).await.unwrap();
        let ids: Vec<String> = sqlx::query_scalar("SELECT id FROM commentary")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(ids, vec!["c"]);
        pool.close().await;
    }

    #[tokio::test]
    async fn duplicate_ids_fail_without_touching_destination() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("data.sqlite");
        let result = write_database(&out, &authors(), &[row("dup", 1), row("dup", 2)]).await;
        assert!(result.is_err());
        assert!(!out.exists());
    }
}
