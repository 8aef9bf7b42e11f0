//! DuckDB-backed article store
//!
//! One connection per pipeline run, opened at start and scoped to the run.
//! Every insert runs in its own transaction with do-nothing-on-conflict
//! semantics keyed by id, so repeated runs over the same feed window never
//! produce duplicate rows and one bad record never aborts a batch.

use std::path::Path;

use anyhow::{Context, Result};
use duckdb::{Connection, params};

use crate::article::{Article, ProcessingStatus};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS articles (
    id VARCHAR PRIMARY KEY,
    title VARCHAR NOT NULL,
    authors VARCHAR,
    publication_date DATE,
    abstract VARCHAR,
    keywords VARCHAR,
    full_text VARCHAR,
    source_url VARCHAR,
    original_pdf_path VARCHAR,
    processing_status VARCHAR DEFAULT 'downloaded',
    simplified_text VARCHAR,
    relevance_score DOUBLE,
    created_at TIMESTAMP DEFAULT current_timestamp
);
";

const INSERT: &str = "
INSERT INTO articles (id, title, authors, publication_date, abstract, keywords,
                      full_text, source_url, original_pdf_path,
                      processing_status, relevance_score)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT (id) DO NOTHING
";

const SELECT_ONE: &str = "
SELECT id, title, authors, CAST(publication_date AS VARCHAR), abstract,
       keywords, full_text, source_url, original_pdf_path,
       processing_status, relevance_score
FROM articles WHERE id = ?
";

/// Handle to the persisted article store.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the store at `path` and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("cannot create store directory {}", parent.display())
                })?;
            }
        }
        let conn = Connection::open(path)
            .with_context(|| format!("cannot open store at {}", path.display()))?;
        conn.execute_batch(SCHEMA).context("schema init failed")?;
        Ok(Self { conn })
    }

    /// In-memory store for tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("cannot open in-memory store")?;
        conn.execute_batch(SCHEMA).context("schema init failed")?;
        Ok(Self { conn })
    }

    /// Whether an article with this identifier is already persisted.
    pub fn exists(&self, id: &str) -> Result<bool> {
        let mut stmt = self.conn.prepare("SELECT 1 FROM articles WHERE id = ?")?;
        let mut rows = stmt.query(params![id])?;
        Ok(rows.next()?.is_some())
    }

    /// Insert an article in its own transaction.
    ///
    /// Returns `true` if a row was written, `false` on the silent conflict
    /// no-op. Any error rolls back this article only (the transaction is
    /// dropped without commit).
    pub fn insert_article(&mut self, article: &Article) -> Result<bool> {
        let authors = serde_json::to_string(&article.authors)?;
        let keywords = serde_json::to_string(&article.keywords)?;

        let tx = self.conn.transaction()?;
        let changed = tx
            .execute(
                INSERT,
                params![
                    article.id,
                    article.title,
                    authors,
                    article.publication_date.to_string(),
                    article.abstract_text,
                    keywords,
                    article.full_text,
                    article.source_url,
                    article.original_pdf_path,
                    article.processing_status.as_str(),
                    article.relevance_score,
                ],
            )
            .with_context(|| format!("insert failed for {}", article.id))?;
        tx.commit()?;
        Ok(changed > 0)
    }

    /// Read one article back by identifier.
    pub fn get_article(&self, id: &str) -> Result<Option<Article>> {
        let mut stmt = self.conn.prepare(SELECT_ONE)?;
        let mut rows = stmt.query(params![id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let authors_json: String = row.get(2)?;
        let date_str: String = row.get(3)?;
        let keywords_json: String = row.get(5)?;
        let status: String = row.get(9)?;

        Ok(Some(Article {
            id: row.get(0)?,
            title: row.get(1)?,
            authors: serde_json::from_str(&authors_json)?,
            publication_date: date_str
                .parse()
                .with_context(|| format!("bad stored date {date_str}"))?,
            abstract_text: row.get(4)?,
            keywords: serde_json::from_str(&keywords_json)?,
            full_text: row.get(6)?,
            source_url: row.get(7)?,
            original_pdf_path: row.get(8)?,
            processing_status: ProcessingStatus::from_name(&status)
                .with_context(|| format!("unknown stored status {status}"))?,
            relevance_score: row.get(10)?,
        }))
    }

    /// Total persisted rows.
    pub fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// Row counts per processing status, sorted by status name.
    pub fn status_counts(&self) -> Result<Vec<(String, usize)>> {
        let mut stmt = self.conn.prepare(
            "SELECT processing_status, COUNT(*) FROM articles GROUP BY 1 ORDER BY 1",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize))
        })?;
        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }
}
