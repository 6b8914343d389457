//! crates/studyplan_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unit of study content with a fixed date range and a computed daily rate.
///
/// A material is immutable after creation except for its progress counter
/// (`current_page` / `current_progress`) and `updated_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Display color used by calendar views.
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub kind: MaterialKind,
}

/// The closed set of material variants.
///
/// `Custom` exists in the data model but the scheduler does not know how to
/// distribute it, so it never produces tasks (known gap, kept as-is).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialKind {
    Book(BookDetails),
    Video(VideoDetails),
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDetails {
    pub total_pages: u32,
    /// Last page the user finished; 0 before any reading.
    pub current_page: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Fixed at creation: ceil(total_pages / inclusive day count).
    pub pages_per_day: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDetails {
    pub sections: Vec<Section>,
    /// Sum of section durations, in minutes.
    pub total_duration: u32,
    /// Number of sections the user has finished.
    pub current_progress: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Stored as an integer ceiling for display. Daily allocation recomputes
    /// the fractional rate instead of reading this field; the two disagree
    /// whenever the division is non-integral.
    pub sections_per_day: u32,
}

/// One timed unit within a video course (e.g. one lecture).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: Uuid,
    pub title: String,
    /// Minutes, review overhead included.
    pub duration: u32,
    pub completed: bool,
    /// Zero-based position within the course.
    pub order: u32,
}

/// Title metadata shared by every material variant at creation time.
#[derive(Debug, Clone, Default)]
pub struct MaterialDraft {
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl MaterialDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            color: None,
        }
    }
}

/// What one material owes on one calendar date.
///
/// Recomputed on every render, never persisted. The `completed` flag is
/// derived from the material's own progress counter and is independent of
/// the externally tracked completion-key set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTask {
    pub material_id: Uuid,
    pub material_title: String,
    pub description: String,
    pub completed: bool,
    pub detail: TaskDetail,
}

/// Variant-specific payload of a daily task; its tag doubles as the
/// material-type label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskDetail {
    Pages { start_page: u32, end_page: u32 },
    Sections { titles: Vec<String> },
}

/// All tasks owed on one date, labelled for calendar rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPlan {
    pub date: NaiveDate,
    pub day_label: String,
    pub tasks: Vec<DailyTask>,
}

/// The Sunday-to-Saturday aggregation of day tasks across all materials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyPlan {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    /// Exactly seven entries, Sunday first.
    pub days: Vec<DailyPlan>,
}

/// One outstanding book assignment for today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadEntry {
    pub material_id: Uuid,
    pub title: String,
    pub description: String,
}

/// Reminder configuration kept behind the settings port. The scheduler never
/// reads it; it exists for the notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSettings {
    pub enabled: bool,
    /// `"HH:MM"` local time.
    pub time: String,
    /// Weekday indices, 0 = Sunday through 6 = Saturday.
    pub weekdays: Vec<u8>,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            time: "09:00".to_string(),
            weekdays: Vec::new(),
        }
    }
}

/// Creation-time validation failures. Scheduling itself never errors; an
/// empty day is a valid state, not a failure.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("date range ends before it starts ({start} > {end})")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("a book needs at least one page")]
    EmptyBook,
    #[error("a video course needs at least one section")]
    EmptyVideo,
}
