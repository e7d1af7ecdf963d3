//! Vector table in PostgreSQL with the pgvector extension
//!
//! One row per document: the text, its metadata as JSONB and its embedding.
//! Similarity is cosine similarity, `1 - (embedding <=> query)`.

use std::sync::Arc;

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::types::Json;
use sqlx::Connection;
use sqlx::PgConnection;
use tokio::sync::Mutex;
use tracing::debug;
use tracing::info;

use super::ScoredDocument;
use super::VectorStore;
use crate::documents::Document;
use crate::documents::Filter;
use crate::documents::Metadata;
use crate::embeddings::Embeddings;
use crate::errors::Result;
use crate::errors::VecRagError;

pub const CONTENT_COLUMN: &str = "VEC_TEXT";
pub const METADATA_COLUMN: &str = "VEC_META";
pub const VECTOR_COLUMN: &str = "VEC_VECTOR";

/// Keep only ASCII alphanumerics and underscores of a table name
pub fn sanitize_name(name: &str) -> Result<String> {
    let sanitized: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if sanitized.is_empty() {
        return Err(VecRagError::InvalidInput(format!(
            "invalid table name '{name}'"
        )));
    }
    Ok(sanitized)
}

fn create_table_sql(table: &str) -> String {
    format!(
        r#"CREATE TABLE IF NOT EXISTS "{table}" ("{CONTENT_COLUMN}" TEXT, "{METADATA_COLUMN}" JSONB, "{VECTOR_COLUMN}" vector)"#
    )
}

fn insert_sql(table: &str) -> String {
    format!(
        r#"INSERT INTO "{table}" ("{CONTENT_COLUMN}", "{METADATA_COLUMN}", "{VECTOR_COLUMN}") VALUES ($1, $2, $3)"#
    )
}

fn delete_sql(table: &str, filter: &Filter) -> String {
    if filter.is_empty() {
        format!(r#"DELETE FROM "{table}""#)
    } else {
        format!(r#"DELETE FROM "{table}" WHERE "{METADATA_COLUMN}" @> $1"#)
    }
}

/// Parameters: `$1` query vector, `$2` limit, `$3` metadata filter when present
fn similarity_sql(table: &str, with_filter: bool) -> String {
    let where_clause = if with_filter {
        format!(r#" WHERE "{METADATA_COLUMN}" @> $3"#)
    } else {
        String::new()
    };
    format!(
        r#"SELECT "{CONTENT_COLUMN}", "{METADATA_COLUMN}", 1 - ("{VECTOR_COLUMN}" <=> $1) AS score FROM "{table}"{where_clause} ORDER BY "{VECTOR_COLUMN}" <=> $1 LIMIT $2"#
    )
}

/// Vector store bound to one table, one connection and one embedding function
pub struct PgVectorStore {
    conn: Mutex<PgConnection>,
    table: String,
    embeddings: Arc<dyn Embeddings>,
}

impl PgVectorStore {
    /// Wrap a connection, creating the table when it does not exist yet
    ///
    /// # Errors
    /// - `InvalidInput` for a table name without usable characters
    /// - Database errors while enabling pgvector or creating the table
    pub async fn new(
        mut conn: PgConnection,
        table_name: &str,
        embeddings: Arc<dyn Embeddings>,
    ) -> Result<Self> {
        let table = sanitize_name(table_name)?;

        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&mut conn)
            .await?;
        sqlx::query(&create_table_sql(&table))
            .execute(&mut conn)
            .await?;
        debug!("Vector table {} ready", table);

        Ok(Self {
            conn: Mutex::new(conn),
            table,
            embeddings,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Number of rows in the table
    pub async fn count(&self) -> Result<i64> {
        let mut conn = self.conn.lock().await;
        let (count,): (i64,) = sqlx::query_as(&format!(r#"SELECT COUNT(*) FROM "{}""#, self.table))
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl VectorStore for PgVectorStore {
    async fn add_documents(&self, documents: &[Document]) -> Result<usize> {
        if documents.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = documents.iter().map(|d| d.page_content.clone()).collect();
        let vectors = self.embeddings.embed_documents(&texts).await?;
        if vectors.len() != documents.len() {
            return Err(VecRagError::EmbeddingError(format!(
                "expected {} embeddings, got {}",
                documents.len(),
                vectors.len()
            )));
        }

        let sql = insert_sql(&self.table);
        let mut conn = self.conn.lock().await;
        let mut tx = conn.begin().await?;
        for (document, vector) in documents.iter().zip(vectors) {
            sqlx::query(&sql)
                .bind(&document.page_content)
                .bind(Json(&document.metadata))
                .bind(Vector::from(vector))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        info!("Inserted {} documents into {}", documents.len(), self.table);
        Ok(documents.len())
    }

    async fn delete(&self, filter: &Filter) -> Result<u64> {
        let sql = delete_sql(&self.table, filter);
        let mut conn = self.conn.lock().await;
        let query = sqlx::query(&sql);
        let query = if filter.is_empty() {
            query
        } else {
            query.bind(Json(filter))
        };
        let deleted = query.execute(&mut *conn).await?.rows_affected();

        info!("Deleted {} rows from {}", deleted, self.table);
        Ok(deleted)
    }

    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
        filter: Option<&Filter>,
    ) -> Result<Vec<ScoredDocument>> {
        let embedding = self.embeddings.embed_query(query).await?;
        let filter = filter.filter(|f| !f.is_empty());
        let sql = similarity_sql(&self.table, filter.is_some());

        let mut conn = self.conn.lock().await;
        let mut search = sqlx::query_as::<_, (Option<String>, Option<Json<Metadata>>, f64)>(&sql)
            .bind(Vector::from(embedding))
            .bind(k as i64);
        if let Some(filter) = filter {
            search = search.bind(Json(filter));
        }
        let rows = search.fetch_all(&mut *conn).await?;

        Ok(rows
            .into_iter()
            .map(|(content, metadata, score)| ScoredDocument {
                document: Document {
                    page_content: content.unwrap_or_default(),
                    metadata: metadata.map(|m| m.0).unwrap_or_default(),
                },
                score,
            })
            .collect())
    }
}
