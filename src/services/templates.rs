use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

use crate::error::{MergeError, Result};
use crate::models::{Template, TemplateDraft};
use crate::services::default_templates::DEFAULT_TEMPLATES;

/// SQLite-backed store for email templates
///
/// Every write is a single statement, so SQLite's write lock serializes
/// concurrent updates and deletes on the same id and readers never see a
/// half-applied change.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    pool: SqlitePool,
}

impl TemplateStore {
    /// Open (creating if needed) the database at `database_url` and run migrations
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Every connection to an in-memory database sees its own empty copy
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

        let mut pool_options = SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(5));
        pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::info!("Template store ready at {}", database_url);

        Ok(Self { pool })
    }

    /// Private in-memory store, used by tests and throwaway runs
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:", 1).await
    }

    /// Insert the stock templates if the store holds none
    ///
    /// Returns how many templates were inserted.
    pub async fn seed_defaults(&self) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(id) FROM templates")
            .fetch_one(&mut *tx)
            .await?;
        if count > 0 {
            return Ok(0);
        }

        for (title, subject, body) in DEFAULT_TEMPLATES {
            sqlx::query("INSERT INTO templates (title, subject, body) VALUES (?, ?, ?)")
                .bind(title)
                .bind(subject)
                .bind(body)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        tracing::info!("Seeded {} default templates", DEFAULT_TEMPLATES.len());

        Ok(DEFAULT_TEMPLATES.len())
    }

    /// All templates, oldest first
    pub async fn list(&self) -> Result<Vec<Template>> {
        let templates = sqlx::query_as::<_, Template>(
            "SELECT id, title, subject, body FROM templates ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(templates)
    }

    pub async fn get(&self, id: i64) -> Result<Template> {
        sqlx::query_as::<_, Template>("SELECT id, title, subject, body FROM templates WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(MergeError::NotFound(id))
    }

    pub async fn create(&self, draft: &TemplateDraft) -> Result<Template> {
        draft.validate()?;

        let result = sqlx::query("INSERT INTO templates (title, subject, body) VALUES (?, ?, ?)")
            .bind(&draft.title)
            .bind(&draft.subject)
            .bind(&draft.body)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        tracing::debug!("Created template {} ({})", id, draft.title);

        Ok(Template {
            id,
            title: draft.title.clone(),
            subject: draft.subject.clone(),
            body: draft.body.clone(),
        })
    }

    /// Replace title, subject and body of an existing template
    pub async fn update(&self, id: i64, draft: &TemplateDraft) -> Result<Template> {
        draft.validate()?;

        let result = sqlx::query("UPDATE templates SET title = ?, subject = ?, body = ? WHERE id = ?")
            .bind(&draft.title)
            .bind(&draft.subject)
            .bind(&draft.body)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(MergeError::NotFound(id));
        }

        tracing::debug!("Updated template {}", id);

        Ok(Template {
            id,
            title: draft.title.clone(),
            subject: draft.subject.clone(),
            body: draft.body.clone(),
        })
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM templates WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(MergeError::NotFound(id));
        }

        tracing::info!("Deleted template {}", id);
        Ok(())
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
