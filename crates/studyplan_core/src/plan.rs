//! crates/studyplan_core/src/plan.rs
//!
//! Week-level aggregation: one pass over every registered material for every
//! visible date, collecting the day tasks the rate calculator derives.

use chrono::NaiveDate;

use crate::clock::Clock;
use crate::dates;
use crate::domain::{
    DailyPlan, DailyTask, Material, MaterialKind, TaskDetail, WeeklyPlan, WorkloadEntry,
};
use crate::schedule;

/// Builds the seven-day plan for the week containing `week_start`, or the
/// current week when omitted. Within a day, tasks keep material order.
pub fn generate_weekly_plan(
    materials: &[Material],
    week_start: Option<NaiveDate>,
    clock: &dyn Clock,
) -> WeeklyPlan {
    let start = dates::week_start(week_start.unwrap_or_else(|| clock.today()));
    let end = dates::week_end(start);
    let days = dates::date_range(start, end)
        .into_iter()
        .map(|date| DailyPlan {
            date,
            day_label: dates::day_of_week(date).to_string(),
            tasks: daily_tasks(materials, date),
        })
        .collect();
    WeeklyPlan {
        week_start: start,
        week_end: end,
        days,
    }
}

/// Tasks owed by every material on one date, in material order. Materials
/// the scheduler cannot distribute (the `Custom` variant) contribute none.
pub fn daily_tasks(materials: &[Material], date: NaiveDate) -> Vec<DailyTask> {
    materials
        .iter()
        .filter_map(|material| schedule::daily_task(material, date))
        .collect()
}

/// Whole-material completion percentage, 0-100.
pub fn calculate_progress(material: &Material) -> u8 {
    let ratio = match &material.kind {
        MaterialKind::Book(book) => {
            if book.total_pages == 0 {
                return 0;
            }
            f64::from(book.current_page) / f64::from(book.total_pages)
        }
        MaterialKind::Video(video) => {
            if video.sections.is_empty() {
                return 0;
            }
            f64::from(video.current_progress) / video.sections.len() as f64
        }
        MaterialKind::Custom => return 0,
    };
    (ratio * 100.0).round().min(100.0) as u8
}

/// Today's outstanding reading. Books only; video and custom materials are
/// not part of the workload summary.
pub fn today_workload(materials: &[Material], clock: &dyn Clock) -> Vec<WorkloadEntry> {
    let today = clock.today();
    materials
        .iter()
        .filter(|material| matches!(material.kind, MaterialKind::Book(_)))
        .filter_map(|material| schedule::daily_task(material, today))
        .filter(|task| !task.completed)
        .filter_map(|task| match task.detail {
            TaskDetail::Pages {
                start_page,
                end_page,
            } => Some(WorkloadEntry {
                material_id: task.material_id,
                title: task.material_title,
                description: format!("pages {start_page}-{end_page}"),
            }),
            TaskDetail::Sections { .. } => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::domain::MaterialDraft;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn book(total_pages: u32, start: NaiveDate, end: NaiveDate) -> Material {
        schedule::plan_book(
            MaterialDraft::new("Book"),
            total_pages,
            start,
            end,
            &FixedClock(start),
        )
        .unwrap()
    }

    fn custom_material() -> Material {
        let now: DateTime<Utc> = Utc::now();
        Material {
            id: Uuid::new_v4(),
            title: "Something else".to_string(),
            description: None,
            color: None,
            created_at: now,
            updated_at: now,
            kind: MaterialKind::Custom,
        }
    }

    #[test]
    fn weekly_plan_covers_sunday_through_saturday() {
        // 2024-01-03 is a Wednesday; its week is Dec 31 .. Jan 6.
        let clock = FixedClock(date(2024, 1, 3));
        let materials = [book(70, date(2023, 12, 31), date(2024, 1, 6))];
        let plan = generate_weekly_plan(&materials, None, &clock);

        assert_eq!(plan.week_start, date(2023, 12, 31));
        assert_eq!(plan.week_end, date(2024, 1, 6));
        assert_eq!(plan.days.len(), 7);
        assert_eq!(plan.days[0].day_label, "Sunday");
        assert_eq!(plan.days[6].day_label, "Saturday");
        for day in &plan.days {
            assert_eq!(day.tasks.len(), 1, "10 pages owed on {}", day.date);
        }
    }

    #[test]
    fn explicit_week_start_is_snapped_to_its_sunday() {
        let clock = FixedClock(date(2024, 6, 1));
        let plan = generate_weekly_plan(&[], Some(date(2024, 1, 3)), &clock);
        assert_eq!(plan.week_start, date(2023, 12, 31));
    }

    #[test]
    fn materials_outside_the_week_contribute_no_tasks() {
        let clock = FixedClock(date(2024, 1, 3));
        let materials = [book(10, date(2024, 2, 1), date(2024, 2, 10))];
        let plan = generate_weekly_plan(&materials, None, &clock);
        assert!(plan.days.iter().all(|day| day.tasks.is_empty()));
    }

    #[test]
    fn custom_materials_are_skipped() {
        let clock = FixedClock(date(2024, 1, 3));
        let materials = [
            custom_material(),
            book(70, date(2023, 12, 31), date(2024, 1, 6)),
        ];
        let plan = generate_weekly_plan(&materials, None, &clock);
        for day in &plan.days {
            assert_eq!(day.tasks.len(), 1);
        }
    }

    #[test]
    fn tasks_keep_material_registration_order() {
        let first = book(70, date(2023, 12, 31), date(2024, 1, 6));
        let second = book(140, date(2023, 12, 31), date(2024, 1, 6));
        let tasks = daily_tasks(&[first.clone(), second.clone()], date(2024, 1, 3));
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].material_id, first.id);
        assert_eq!(tasks[1].material_id, second.id);
    }

    #[test]
    fn progress_percentage_examples() {
        let mut halfway = book(100, date(2024, 1, 1), date(2024, 1, 10));
        if let MaterialKind::Book(details) = &mut halfway.kind {
            details.current_page = 50;
        }
        assert_eq!(calculate_progress(&halfway), 50);

        let fresh = book(100, date(2024, 1, 1), date(2024, 1, 10));
        assert_eq!(calculate_progress(&fresh), 0);

        assert_eq!(calculate_progress(&custom_material()), 0);
    }

    #[test]
    fn progress_rounds_and_caps_at_100() {
        let mut material = book(3, date(2024, 1, 1), date(2024, 1, 3));
        if let MaterialKind::Book(details) = &mut material.kind {
            details.current_page = 2;
        }
        assert_eq!(calculate_progress(&material), 67);
    }

    #[test]
    fn workload_lists_only_unfinished_books() {
        let clock = FixedClock(date(2024, 1, 3));
        let mut done = book(100, date(2024, 1, 1), date(2024, 1, 10));
        if let MaterialKind::Book(details) = &mut done.kind {
            details.current_page = 30; // today's range 21-30 already read
        }
        let open = book(100, date(2024, 1, 1), date(2024, 1, 10));

        let workload = today_workload(&[done, open.clone(), custom_material()], &clock);
        assert_eq!(workload.len(), 1);
        assert_eq!(workload[0].material_id, open.id);
        assert_eq!(workload[0].description, "pages 21-30");
    }
}
