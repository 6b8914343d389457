//! crates/studyplan_core/src/ports.rs
//!
//! Defines the service contracts (traits) for everything outside the
//! scheduling core: material persistence, the per-date completion ledger,
//! and reminder settings. These traits form the boundary of the hexagonal
//! architecture; the scheduler only ever reads through them, while writes
//! are issued by UI-side collaborators.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;
use uuid::Uuid;

use crate::domain::{DomainError, Material, MaterialKind, ReminderSettings};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations, abstracting away the
/// specific failures of external backends. Every variant carries a
/// user-facing message.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Storage failure: {0}")]
    Storage(String),
    #[error("Calculation failure: {0}")]
    Calculation(String),
    #[error("An unexpected error occurred: {0}")]
    Unknown(String),
}

impl From<DomainError> for PortError {
    fn from(err: DomainError) -> Self {
        PortError::Validation(err.to_string())
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Partial Updates
//=========================================================================================

/// The fields a collaborator may change after creation. Everything else on a
/// material is fixed once its schedule is computed.
#[derive(Debug, Clone, Default)]
pub struct MaterialPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub current_page: Option<u32>,
    pub current_progress: Option<u32>,
}

impl MaterialPatch {
    /// Applies the patch in place, clamping progress counters to their valid
    /// range. A counter aimed at the wrong material kind is ignored.
    pub fn apply_to(self, material: &mut Material, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            material.title = title;
        }
        if let Some(description) = self.description {
            material.description = Some(description);
        }
        if let Some(color) = self.color {
            material.color = Some(color);
        }
        match &mut material.kind {
            MaterialKind::Book(book) => {
                if let Some(page) = self.current_page {
                    book.current_page = page.min(book.total_pages);
                }
            }
            MaterialKind::Video(video) => {
                if let Some(progress) = self.current_progress {
                    video.current_progress = progress.min(video.sections.len() as u32);
                }
            }
            MaterialKind::Custom => {}
        }
        material.updated_at = now;
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Persistence for registered materials. Implementations are interchangeable
/// (in-process map, relational database) behind this one contract.
#[async_trait]
pub trait MaterialStore: Send + Sync {
    /// All materials in registration order.
    async fn get_all(&self) -> PortResult<Vec<Material>>;

    async fn get_by_id(&self, id: Uuid) -> PortResult<Material>;

    async fn add(&self, material: Material) -> PortResult<()>;

    /// Applies a partial update and returns the stored result.
    async fn update(&self, id: Uuid, patch: MaterialPatch) -> PortResult<Material>;

    async fn delete(&self, id: Uuid) -> PortResult<()>;

    async fn clear(&self) -> PortResult<()>;
}

/// The per-(material, date) completion ledger behind the calendar's
/// checkmark overlay. Keys use [`crate::progress::completion_key`]. This is
/// a separate signal from the material's own progress counter and is never
/// reconciled with it.
#[async_trait]
pub trait CompletionStore: Send + Sync {
    async fn get_all(&self) -> PortResult<HashSet<String>>;

    async fn mark_completed(&self, material_id: Uuid, date: NaiveDate) -> PortResult<()>;

    async fn mark_incomplete(&self, material_id: Uuid, date: NaiveDate) -> PortResult<()>;

    async fn is_completed(&self, material_id: Uuid, date: NaiveDate) -> PortResult<bool>;
}

/// Reminder configuration. Read by the notification collaborator, never by
/// the scheduler.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self) -> PortResult<ReminderSettings>;

    async fn save(&self, settings: ReminderSettings) -> PortResult<()>;
}
