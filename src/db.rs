//! Annotation store backed by `SQLite` via `SQLx`.
//!
//! # Schema changes
//! - Add a new migration file in `migrations/` with the next sequence number
//!   (e.g. `002_add_resolved_to_annotation.sql`); never edit an applied one.
//! - Migrations are embedded at compile time via `sqlx::migrate!()` and run on
//!   every [`Database::open`]; `SQLx` records applied ones in
//!   `_sqlx_migrations`.
//! - Update the row mapping in [`annotation_from_row`] and the query strings
//!   below to match.
//!
//! # Duplicate lines
//! Several annotations may target the same `(path, line_number)`. Reads are
//! ordered by creation time and id, so when rows are folded into a per-line
//! map the most recently created annotation wins.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use crate::error::{AppError, Result};
use crate::models::{Annotation, AnnotationDraft, AnnotationNote};

pub const DEFAULT_DB_FILE: &str = "code-annotate.db";

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if needed) the database file and applies migrations.
    ///
    /// # Errors
    /// Returns an error if the directory, connection, or migrations fail.
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        Self::migrate(pool).await
    }

    /// Opens a private in-memory database, mainly for tests.
    ///
    /// # Errors
    /// Returns an error if the connection or migrations fail.
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::new().filename(":memory:");

        // A second connection would see a different empty database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> Result<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|err| AppError::Internal(format!("Failed to run migrations: {err}")))?;

        Ok(Self { pool })
    }

    /// Every distinct logical path that has at least one annotation.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn distinct_annotated_paths(&self) -> Result<HashSet<String>> {
        let rows = sqlx::query(
            r"
SELECT DISTINCT path
FROM annotation
",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|row| row.get("path")).collect())
    }

    /// Annotations for exactly `path`, keyed by line number.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn annotations_for(&self, path: &str) -> Result<BTreeMap<u32, AnnotationNote>> {
        let annotations = self.list_annotations(path).await?;

        // Later rows overwrite earlier ones for the same line.
        Ok(annotations
            .into_iter()
            .map(|a| {
                (
                    a.line_number,
                    AnnotationNote {
                        author: a.author,
                        text: a.text,
                    },
                )
            })
            .collect())
    }

    /// All annotation rows for exactly `path`, oldest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_annotations(&self, path: &str) -> Result<Vec<Annotation>> {
        let rows = sqlx::query(
            r"
SELECT id, path, line_number, author, text, created_at
FROM annotation
WHERE path = ?
ORDER BY created_at, id
",
        )
        .bind(path)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(annotation_from_row).collect()
    }

    /// Validates and stores a new annotation attributed to `author`.
    ///
    /// # Errors
    /// Returns `AppError::Validation` with per-field messages if the draft is
    /// invalid, or a database error if the insert fails.
    pub async fn create_annotation(&self, draft: &AnnotationDraft, author: &str) -> Result<Annotation> {
        let valid = draft.validate().map_err(AppError::Validation)?;
        if author.trim().is_empty() {
            return Err(AppError::Unauthenticated);
        }

        let created_at = chrono::Utc::now().timestamp();
        let result = sqlx::query(
            r"
INSERT INTO annotation (path, line_number, author, text, created_at)
VALUES (?, ?, ?, ?, ?)
",
        )
        .bind(&valid.path)
        .bind(i64::from(valid.line_number))
        .bind(author)
        .bind(&valid.text)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        let annotation = Annotation {
            id: result.last_insert_rowid(),
            path: valid.path,
            line_number: valid.line_number,
            author: author.to_string(),
            text: valid.text,
            created_at,
        };

        tracing::info!(
            "Annotation {} created on {}:{} by {}",
            annotation.id,
            annotation.path,
            annotation.line_number,
            annotation.author
        );

        Ok(annotation)
    }
}

fn annotation_from_row(row: &SqliteRow) -> Result<Annotation> {
    let line_number: i64 = row.get("line_number");
    let line_number = u32::try_from(line_number)
        .map_err(|_| AppError::Internal(format!("Stored line number out of range: {line_number}")))?;

    Ok(Annotation {
        id: row.get("id"),
        path: row.get("path"),
        line_number,
        author: row.get("author"),
        text: row.get("text"),
        created_at: row.get("created_at"),
    })
}
