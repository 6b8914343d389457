//! services/planner/src/adapters/db.rs
//!
//! This module contains the database adapter, the concrete implementation of
//! the persistence ports backed by PostgreSQL through `sqlx`. Queries use the
//! runtime-checked API so the crate builds without a live database.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::HashSet;
use uuid::Uuid;

use studyplan_core::domain::{
    BookDetails, Material, MaterialKind, ReminderSettings, Section, VideoDetails,
};
use studyplan_core::ports::{
    CompletionStore, MaterialPatch, MaterialStore, PortError, PortResult, SettingsStore,
};
use studyplan_core::progress::completion_key;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the persistence ports.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn storage_err(err: sqlx::Error) -> PortError {
    PortError::Storage(err.to_string())
}

fn lookup_err(id: Uuid) -> impl FnOnce(sqlx::Error) -> PortError {
    move |err| match err {
        sqlx::Error::RowNotFound => PortError::NotFound(format!("Material {} not found", id)),
        other => storage_err(other),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct MaterialRecord {
    id: Uuid,
    title: String,
    description: Option<String>,
    color: Option<String>,
    kind: String,
    total_pages: Option<i32>,
    current_page: Option<i32>,
    sections: Option<serde_json::Value>,
    total_duration: Option<i32>,
    current_progress: Option<i32>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    pages_per_day: Option<i32>,
    sections_per_day: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MaterialRecord {
    fn to_domain(self) -> PortResult<Material> {
        let kind = match self.kind.as_str() {
            "book" => MaterialKind::Book(BookDetails {
                total_pages: self.require("total_pages", self.total_pages)? as u32,
                current_page: self.require("current_page", self.current_page)? as u32,
                start_date: self.require("start_date", self.start_date)?,
                end_date: self.require("end_date", self.end_date)?,
                pages_per_day: self.require("pages_per_day", self.pages_per_day)? as u32,
            }),
            "video" => {
                let sections_json = self.require("sections", self.sections.clone())?;
                let sections: Vec<Section> = serde_json::from_value(sections_json)
                    .map_err(|e| PortError::Storage(format!("Malformed sections column: {e}")))?;
                MaterialKind::Video(VideoDetails {
                    sections,
                    total_duration: self.require("total_duration", self.total_duration)? as u32,
                    current_progress: self.require("current_progress", self.current_progress)?
                        as u32,
                    start_date: self.require("start_date", self.start_date)?,
                    end_date: self.require("end_date", self.end_date)?,
                    sections_per_day: self.require("sections_per_day", self.sections_per_day)?
                        as u32,
                })
            }
            "custom" => MaterialKind::Custom,
            other => {
                return Err(PortError::Storage(format!(
                    "Unknown material kind '{other}' for {}",
                    self.id
                )))
            }
        };
        Ok(Material {
            id: self.id,
            title: self.title,
            description: self.description,
            color: self.color,
            created_at: self.created_at,
            updated_at: self.updated_at,
            kind,
        })
    }

    fn require<T>(&self, column: &str, value: Option<T>) -> PortResult<T> {
        value.ok_or_else(|| {
            PortError::Storage(format!(
                "Material {} ({}) is missing column '{column}'",
                self.id, self.kind
            ))
        })
    }
}

/// Column values for the variant-specific half of an INSERT.
struct KindColumns {
    kind: &'static str,
    total_pages: Option<i32>,
    current_page: Option<i32>,
    sections: Option<serde_json::Value>,
    total_duration: Option<i32>,
    current_progress: Option<i32>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    pages_per_day: Option<i32>,
    sections_per_day: Option<i32>,
}

fn kind_columns(material: &Material) -> PortResult<KindColumns> {
    Ok(match &material.kind {
        MaterialKind::Book(book) => KindColumns {
            kind: "book",
            total_pages: Some(book.total_pages as i32),
            current_page: Some(book.current_page as i32),
            sections: None,
            total_duration: None,
            current_progress: None,
            start_date: Some(book.start_date),
            end_date: Some(book.end_date),
            pages_per_day: Some(book.pages_per_day as i32),
            sections_per_day: None,
        },
        MaterialKind::Video(video) => KindColumns {
            kind: "video",
            total_pages: None,
            current_page: None,
            sections: Some(serde_json::to_value(&video.sections).map_err(|e| {
                PortError::Storage(format!("Could not serialize sections: {e}"))
            })?),
            total_duration: Some(video.total_duration as i32),
            current_progress: Some(video.current_progress as i32),
            start_date: Some(video.start_date),
            end_date: Some(video.end_date),
            pages_per_day: None,
            sections_per_day: Some(video.sections_per_day as i32),
        },
        MaterialKind::Custom => KindColumns {
            kind: "custom",
            total_pages: None,
            current_page: None,
            sections: None,
            total_duration: None,
            current_progress: None,
            start_date: None,
            end_date: None,
            pages_per_day: None,
            sections_per_day: None,
        },
    })
}

const MATERIAL_COLUMNS: &str = "id, title, description, color, kind, total_pages, current_page, \
     sections, total_duration, current_progress, start_date, end_date, pages_per_day, \
     sections_per_day, created_at, updated_at";

//=========================================================================================
// `MaterialStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl MaterialStore for PgStore {
    async fn get_all(&self) -> PortResult<Vec<Material>> {
        let records = sqlx::query_as::<_, MaterialRecord>(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn get_by_id(&self, id: Uuid) -> PortResult<Material> {
        let record = sqlx::query_as::<_, MaterialRecord>(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(lookup_err(id))?;

        record.to_domain()
    }

    async fn add(&self, material: Material) -> PortResult<()> {
        let columns = kind_columns(&material)?;
        let result = sqlx::query(&format!(
            "INSERT INTO materials ({MATERIAL_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             ON CONFLICT (id) DO NOTHING"
        ))
        .bind(material.id)
        .bind(&material.title)
        .bind(&material.description)
        .bind(&material.color)
        .bind(columns.kind)
        .bind(columns.total_pages)
        .bind(columns.current_page)
        .bind(columns.sections)
        .bind(columns.total_duration)
        .bind(columns.current_progress)
        .bind(columns.start_date)
        .bind(columns.end_date)
        .bind(columns.pages_per_day)
        .bind(columns.sections_per_day)
        .bind(material.created_at)
        .bind(material.updated_at)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        if result.rows_affected() == 0 {
            return Err(PortError::Conflict(format!(
                "Material {} already exists",
                material.id
            )));
        }
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: MaterialPatch) -> PortResult<Material> {
        let mut material = self.get_by_id(id).await?;
        patch.apply_to(&mut material, Utc::now());

        let columns = kind_columns(&material)?;
        sqlx::query(
            "UPDATE materials SET title = $1, description = $2, color = $3, \
             current_page = $4, current_progress = $5, updated_at = $6 WHERE id = $7",
        )
        .bind(&material.title)
        .bind(&material.description)
        .bind(&material.color)
        .bind(columns.current_page)
        .bind(columns.current_progress)
        .bind(material.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(material)
    }

    async fn delete(&self, id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Material {} not found", id)));
        }
        Ok(())
    }

    async fn clear(&self) -> PortResult<()> {
        sqlx::query("DELETE FROM materials")
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(())
    }
}

//=========================================================================================
// `CompletionStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl CompletionStore for PgStore {
    async fn get_all(&self) -> PortResult<HashSet<String>> {
        let rows = sqlx::query_as::<_, (Uuid, NaiveDate)>(
            "SELECT material_id, task_date FROM completed_tasks",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(rows
            .into_iter()
            .map(|(material_id, date)| completion_key(material_id, date))
            .collect())
    }

    async fn mark_completed(&self, material_id: Uuid, date: NaiveDate) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO completed_tasks (material_id, task_date) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(material_id)
        .bind(date)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn mark_incomplete(&self, material_id: Uuid, date: NaiveDate) -> PortResult<()> {
        sqlx::query("DELETE FROM completed_tasks WHERE material_id = $1 AND task_date = $2")
            .bind(material_id)
            .bind(date)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(())
    }

    async fn is_completed(&self, material_id: Uuid, date: NaiveDate) -> PortResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM completed_tasks WHERE material_id = $1 AND task_date = $2)",
        )
        .bind(material_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(exists)
    }
}

//=========================================================================================
// `SettingsStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl SettingsStore for PgStore {
    async fn get(&self) -> PortResult<ReminderSettings> {
        let payload = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT payload FROM reminder_settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        match payload {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| PortError::Storage(format!("Malformed settings payload: {e}"))),
            None => Ok(ReminderSettings::default()),
        }
    }

    async fn save(&self, settings: ReminderSettings) -> PortResult<()> {
        let payload = serde_json::to_value(&settings)
            .map_err(|e| PortError::Storage(format!("Could not serialize settings: {e}")))?;
        sqlx::query(
            "INSERT INTO reminder_settings (id, payload) VALUES (1, $1) \
             ON CONFLICT (id) DO UPDATE SET payload = EXCLUDED.payload",
        )
        .bind(payload)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }
}
