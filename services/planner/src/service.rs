//! services/planner/src/service.rs
//!
//! Read-side composition: fetch materials through the ports, hand them to
//! the pure scheduling functions, and route progress writes back to the
//! store. This is the surface UI collaborators call once per render cycle.

use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use studyplan_core::clock::Clock;
use studyplan_core::domain::{Material, MaterialDraft, ReminderSettings, WeeklyPlan, WorkloadEntry};
use studyplan_core::plan;
use studyplan_core::ports::{
    CompletionStore, MaterialPatch, MaterialStore, PortError, PortResult, SettingsStore,
};
use studyplan_core::progress;
use studyplan_core::schedule;
use studyplan_core::transcript;

/// Everything the planner needs, behind the port traits so the storage
/// backend stays interchangeable.
#[derive(Clone)]
pub struct PlannerService {
    materials: Arc<dyn MaterialStore>,
    completions: Arc<dyn CompletionStore>,
    settings: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
}

impl PlannerService {
    pub fn new(
        materials: Arc<dyn MaterialStore>,
        completions: Arc<dyn CompletionStore>,
        settings: Arc<dyn SettingsStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            materials,
            completions,
            settings,
            clock,
        }
    }

    /// Computes a book schedule and persists the resulting material.
    pub async fn register_book(
        &self,
        draft: MaterialDraft,
        total_pages: u32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> PortResult<Material> {
        let material = schedule::plan_book(
            draft,
            total_pages,
            start_date,
            end_date,
            self.clock.as_ref(),
        )?;
        self.materials.add(material.clone()).await?;
        Ok(material)
    }

    /// Parses a pasted course listing and persists the resulting video
    /// material. An unparseable listing surfaces as a validation error, the
    /// same as an empty section list.
    pub async fn register_video(
        &self,
        draft: MaterialDraft,
        listing: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> PortResult<Material> {
        let parsed = transcript::parse_transcript(listing);
        let material = schedule::plan_video(
            draft,
            parsed.sections,
            start_date,
            end_date,
            self.clock.as_ref(),
        )?;
        self.materials.add(material.clone()).await?;
        Ok(material)
    }

    /// The seven-day plan for the week containing `week_start`, or the
    /// current week when omitted.
    pub async fn weekly_plan(&self, week_start: Option<NaiveDate>) -> PortResult<WeeklyPlan> {
        let materials = self.materials.get_all().await?;
        Ok(plan::generate_weekly_plan(
            &materials,
            week_start,
            self.clock.as_ref(),
        ))
    }

    /// Today's outstanding book assignments.
    pub async fn today_workload(&self) -> PortResult<Vec<WorkloadEntry>> {
        let materials = self.materials.get_all().await?;
        Ok(plan::today_workload(&materials, self.clock.as_ref()))
    }

    /// Completion percentage for one material, 0-100.
    pub async fn material_progress(&self, id: Uuid) -> PortResult<u8> {
        let material = self.materials.get_by_id(id).await?;
        Ok(plan::calculate_progress(&material))
    }

    /// Days left until the material's end date.
    pub async fn remaining_days(&self, id: Uuid) -> PortResult<u32> {
        let material = self.materials.get_by_id(id).await?;
        Ok(progress::remaining_days(&material, self.clock.as_ref()))
    }

    /// Applies a partial update (typically advancing a progress counter).
    pub async fn record_progress(&self, id: Uuid, patch: MaterialPatch) -> PortResult<Material> {
        self.materials.update(id, patch).await
    }

    pub async fn remove_material(&self, id: Uuid) -> PortResult<()> {
        self.materials.delete(id).await
    }

    /// Flips the (material, date) entry in the completion ledger.
    ///
    /// This only touches the externally tracked checkmark overlay. The
    /// material's own progress counter, and with it every task's
    /// `completed` flag, is left alone.
    pub async fn set_task_done(&self, id: Uuid, date: NaiveDate, done: bool) -> PortResult<()> {
        if done {
            self.completions.mark_completed(id, date).await
        } else {
            self.completions.mark_incomplete(id, date).await
        }
    }

    pub async fn is_task_done(&self, id: Uuid, date: NaiveDate) -> PortResult<bool> {
        self.completions.is_completed(id, date).await
    }

    /// The full completion-key set, for overlaying checkmarks on a rendered
    /// plan in one lookup pass.
    pub async fn completed_keys(&self) -> PortResult<HashSet<String>> {
        self.completions.get_all().await
    }

    pub async fn reminder_settings(&self) -> PortResult<ReminderSettings> {
        self.settings.get().await
    }

    pub async fn save_reminder_settings(&self, settings: ReminderSettings) -> PortResult<()> {
        if let Some(day) = settings.weekdays.iter().find(|&&day| day > 6) {
            return Err(PortError::Validation(format!(
                "{day} is not a weekday index (0-6)"
            )));
        }
        self.settings.save(settings).await
    }
}
