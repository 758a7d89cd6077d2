//! Operational notes

use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::{Note, NoteFilter, NoteInput};

/// Note service
#[derive(Clone)]
pub struct NoteService {
    db: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct NoteRow {
    id: i64,
    title: String,
    content: String,
    category: String,
    priority: String,
    status: String,
    tags: String,
    related_product_id: Option<i64>,
    related_supplier_id: Option<i64>,
    related_purchase_id: Option<i64>,
    created_at: String,
    updated_at: String,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Note {
            id: row.id,
            title: row.title,
            content: row.content,
            category: row.category,
            priority: row.priority,
            status: row.status,
            tags: serde_json::from_str(&row.tags).unwrap_or_default(),
            related_product_id: row.related_product_id,
            related_supplier_id: row.related_supplier_id,
            related_purchase_id: row.related_purchase_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const NOTE_COLUMNS: &str = "id, title, content, category, priority, status, tags, \
     related_product_id, related_supplier_id, related_purchase_id, created_at, updated_at";

impl NoteService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List notes, optionally filtered by category/priority/status or a
    /// free-text search over title and content. Most recently updated first.
    pub async fn list(&self, filter: &NoteFilter) -> AppResult<Vec<Note>> {
        let mut sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE 1=1");
        if filter.category.is_some() {
            sql.push_str(" AND category = ?");
        }
        if filter.priority.is_some() {
            sql.push_str(" AND priority = ?");
        }
        if filter.status.is_some() {
            sql.push_str(" AND status = ?");
        }
        if filter.search.is_some() {
            sql.push_str(" AND (title LIKE ? OR content LIKE ?)");
        }
        sql.push_str(" ORDER BY updated_at DESC");

        let mut query = sqlx::query_as::<_, NoteRow>(&sql);
        if let Some(category) = &filter.category {
            query = query.bind(category);
        }
        if let Some(priority) = &filter.priority {
            query = query.bind(priority);
        }
        if let Some(status) = &filter.status {
            query = query.bind(status);
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            query = query.bind(pattern.clone()).bind(pattern);
        }

        let rows = query.fetch_all(&self.db).await?;
        Ok(rows.into_iter().map(Note::from).collect())
    }

    /// Fetch one note by id.
    pub async fn get(&self, id: i64) -> AppResult<Note> {
        let row = sqlx::query_as::<_, NoteRow>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Note".to_string()))?;

        Ok(row.into())
    }

    /// Create a new note.
    pub async fn create(&self, input: NoteInput) -> AppResult<Note> {
        self.validate_input(&input)?;
        let tags = serde_json::to_string(&input.tags)
            .map_err(|e| AppError::Internal(format!("Tag serialization error: {}", e)))?;

        let row = sqlx::query_as::<_, NoteRow>(&format!(
            r#"
            INSERT INTO notes (title, content, category, priority, status, tags,
                               related_product_id, related_supplier_id, related_purchase_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {NOTE_COLUMNS}
            "#
        ))
        .bind(input.title.trim())
        .bind(input.content.trim())
        .bind(input.category.trim())
        .bind(&input.priority)
        .bind(&input.status)
        .bind(tags)
        .bind(input.related_product_id)
        .bind(input.related_supplier_id)
        .bind(input.related_purchase_id)
        .fetch_one(&self.db)
        .await?;

        tracing::info!("Note created: {} (id {})", row.title, row.id);
        Ok(row.into())
    }

    /// Update an existing note.
    pub async fn update(&self, id: i64, input: NoteInput) -> AppResult<Note> {
        self.validate_input(&input)?;

        let current = sqlx::query_scalar::<_, String>("SELECT title FROM notes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Note".to_string()))?;

        let tags = serde_json::to_string(&input.tags)
            .map_err(|e| AppError::Internal(format!("Tag serialization error: {}", e)))?;

        let row = sqlx::query_as::<_, NoteRow>(&format!(
            r#"
            UPDATE notes
            SET title = ?, content = ?, category = ?, priority = ?, status = ?,
                tags = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            RETURNING {NOTE_COLUMNS}
            "#
        ))
        .bind(input.title.trim())
        .bind(input.content.trim())
        .bind(input.category.trim())
        .bind(&input.priority)
        .bind(&input.status)
        .bind(tags)
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        tracing::info!("Note updated: {} -> {}", current, row.title);
        Ok(row.into())
    }

    /// Delete a note.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Note".to_string()));
        }

        tracing::info!("Note deleted: id {}", id);
        Ok(())
    }

    fn validate_input(&self, input: &NoteInput) -> AppResult<()> {
        for (field, value) in [
            ("title", &input.title),
            ("content", &input.content),
            ("category", &input.category),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation {
                    field: field.to_string(),
                    message: format!("The '{}' field is required", field),
                    message_es: format!("El campo '{}' es requerido", field),
                });
            }
        }
        Ok(())
    }
}
