//! crates/studyplan_core/src/schedule.rs
//!
//! Linear-rate allocation of a material across its calendar window: the rate
//! is fixed when the material is created, and the slice owed on a given date
//! is derived from scratch on every query.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::clock::Clock;
use crate::dates;
use crate::domain::{
    BookDetails, DailyTask, DomainError, Material, MaterialDraft, MaterialKind, Section,
    TaskDetail, VideoDetails,
};

/// Inclusive day count of a scheduling window.
fn window_days(start: NaiveDate, end: NaiveDate) -> u32 {
    dates::days_between(start, end) + 1
}

fn check_window(start: NaiveDate, end: NaiveDate) -> Result<(), DomainError> {
    if end < start {
        return Err(DomainError::InvalidDateRange { start, end });
    }
    Ok(())
}

/// Creates a book material with its daily page rate fixed up front.
pub fn plan_book(
    draft: MaterialDraft,
    total_pages: u32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    clock: &dyn Clock,
) -> Result<Material, DomainError> {
    check_window(start_date, end_date)?;
    if total_pages == 0 {
        return Err(DomainError::EmptyBook);
    }
    let pages_per_day = total_pages.div_ceil(window_days(start_date, end_date));
    let now = clock.now();
    Ok(Material {
        id: Uuid::new_v4(),
        title: draft.title,
        description: draft.description,
        color: draft.color,
        created_at: now,
        updated_at: now,
        kind: MaterialKind::Book(BookDetails {
            total_pages,
            current_page: 0,
            start_date,
            end_date,
            pages_per_day,
        }),
    })
}

/// Creates a video material from already-parsed sections.
///
/// The stored `sections_per_day` is the integer ceiling; daily allocation
/// recomputes the fractional rate (see [`daily_task`]).
pub fn plan_video(
    draft: MaterialDraft,
    sections: Vec<Section>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    clock: &dyn Clock,
) -> Result<Material, DomainError> {
    check_window(start_date, end_date)?;
    if sections.is_empty() {
        return Err(DomainError::EmptyVideo);
    }
    let total_duration = sections.iter().map(|s| s.duration).sum();
    let sections_per_day = (sections.len() as u32).div_ceil(window_days(start_date, end_date));
    let now = clock.now();
    Ok(Material {
        id: Uuid::new_v4(),
        title: draft.title,
        description: draft.description,
        color: draft.color,
        created_at: now,
        updated_at: now,
        kind: MaterialKind::Video(VideoDetails {
            sections,
            total_duration,
            current_progress: 0,
            start_date,
            end_date,
            sections_per_day,
        }),
    })
}

/// What `material` owes on `date`.
///
/// `None` is the normal "nothing due" state: the date falls outside the
/// window, the material is already finished, or rounding left this day's
/// slice empty. `Custom` materials never produce tasks.
pub fn daily_task(material: &Material, date: NaiveDate) -> Option<DailyTask> {
    match &material.kind {
        MaterialKind::Book(book) => book_task(material, book, date),
        MaterialKind::Video(video) => video_task(material, video, date),
        MaterialKind::Custom => None,
    }
}

fn book_task(material: &Material, book: &BookDetails, date: NaiveDate) -> Option<DailyTask> {
    if date < book.start_date || date > book.end_date {
        return None;
    }
    if book.current_page >= book.total_pages {
        return None;
    }

    let day_index = dates::days_between(book.start_date, date);
    let start_page = 1 + day_index * book.pages_per_day;
    let end_page = ((day_index + 1) * book.pages_per_day).min(book.total_pages);
    if start_page > book.total_pages {
        return None;
    }

    Some(DailyTask {
        material_id: material.id,
        material_title: material.title.clone(),
        description: format!("Read pages {start_page}-{end_page}"),
        completed: book.current_page >= end_page,
        detail: TaskDetail::Pages {
            start_page,
            end_page,
        },
    })
}

fn video_task(material: &Material, video: &VideoDetails, date: NaiveDate) -> Option<DailyTask> {
    if date < video.start_date || date > video.end_date {
        return None;
    }
    let total = video.sections.len();
    if video.current_progress as usize >= total {
        return None;
    }

    // Allocation uses the fractional rate (sections / days) recomputed at
    // query time, not the stored integer `sections_per_day`; the stored
    // ceiling is display-only. Integer division is floor(day_index * rate)
    // computed exactly, so the day slices tile the section list.
    let days = u64::from(window_days(video.start_date, video.end_date));
    let day_index = u64::from(dates::days_between(video.start_date, date));
    let start_index = ((day_index * total as u64) / days) as usize;
    let end_index = ((((day_index + 1) * total as u64) / days) as usize).min(total);
    if start_index >= total || start_index >= end_index {
        return None;
    }

    let slice = &video.sections[start_index..end_index];
    let minutes: u32 = slice.iter().map(|s| s.duration).sum();
    let noun = if slice.len() == 1 { "section" } else { "sections" };
    Some(DailyTask {
        material_id: material.id,
        material_title: material.title.clone(),
        description: format!(
            "Watch {} {} ({})",
            slice.len(),
            noun,
            format_duration(minutes)
        ),
        completed: video.current_progress as usize >= end_index,
        detail: TaskDetail::Sections {
            titles: slice.iter().map(|s| s.title.clone()).collect(),
        },
    })
}

/// Minutes rendered as a short human-readable span: `"2h 5m"`, `"1h"`, `"45m"`.
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, _) => format!("{rest}m"),
        (_, 0) => format!("{hours}h"),
        _ => format!("{hours}h {rest}m"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock(date(2024, 1, 1))
    }

    fn section(title: &str, duration: u32, order: u32) -> Section {
        Section {
            id: Uuid::new_v4(),
            title: title.to_string(),
            duration,
            completed: false,
            order,
        }
    }

    fn sections(count: usize) -> Vec<Section> {
        (0..count)
            .map(|i| section(&format!("Section {i}"), 30, i as u32))
            .collect()
    }

    fn book(total_pages: u32, start: NaiveDate, end: NaiveDate) -> Material {
        plan_book(MaterialDraft::new("Book"), total_pages, start, end, &clock()).unwrap()
    }

    fn video(count: usize, start: NaiveDate, end: NaiveDate) -> Material {
        plan_video(MaterialDraft::new("Course"), sections(count), start, end, &clock()).unwrap()
    }

    fn page_range(task: &DailyTask) -> (u32, u32) {
        match task.detail {
            TaskDetail::Pages {
                start_page,
                end_page,
            } => (start_page, end_page),
            _ => panic!("expected a page task"),
        }
    }

    fn section_count(task: &DailyTask) -> usize {
        match &task.detail {
            TaskDetail::Sections { titles } => titles.len(),
            _ => panic!("expected a section task"),
        }
    }

    #[test]
    fn book_rate_is_ceiled_over_inclusive_days() {
        let material = book(100, date(2024, 1, 1), date(2024, 1, 10));
        let MaterialKind::Book(details) = &material.kind else {
            panic!("expected a book");
        };
        assert_eq!(details.pages_per_day, 10);

        let uneven = book(95, date(2024, 1, 1), date(2024, 1, 10));
        let MaterialKind::Book(details) = &uneven.kind else {
            panic!("expected a book");
        };
        assert_eq!(details.pages_per_day, 10);
    }

    #[test]
    fn book_task_matches_worked_example() {
        let material = book(100, date(2024, 1, 1), date(2024, 1, 10));
        let task = daily_task(&material, date(2024, 1, 3)).unwrap();
        assert_eq!(page_range(&task), (21, 30));
        assert_eq!(task.description, "Read pages 21-30");
        assert!(!task.completed);
    }

    #[test]
    fn book_last_day_truncates_to_total_pages() {
        let material = book(95, date(2024, 1, 1), date(2024, 1, 10));
        let task = daily_task(&material, date(2024, 1, 10)).unwrap();
        assert_eq!(page_range(&task), (91, 95));
    }

    #[test]
    fn book_ranges_tile_the_whole_page_span() {
        let material = book(95, date(2024, 1, 1), date(2024, 1, 10));
        let mut expected_start = 1;
        let mut covered = 0;
        for day in dates::date_range(date(2024, 1, 1), date(2024, 1, 10)) {
            let Some(task) = daily_task(&material, day) else {
                continue;
            };
            let (start, end) = page_range(&task);
            assert_eq!(start, expected_start);
            covered += end - start + 1;
            expected_start = end + 1;
        }
        assert_eq!(covered, 95);
    }

    #[test]
    fn book_days_after_rounding_exhaustion_yield_nothing() {
        // 10 pages over 7 days rounds up to 2/day; days 6 and 7 are empty.
        let material = book(10, date(2024, 1, 1), date(2024, 1, 7));
        assert!(daily_task(&material, date(2024, 1, 5)).is_some());
        assert!(daily_task(&material, date(2024, 1, 6)).is_none());
        assert!(daily_task(&material, date(2024, 1, 7)).is_none());
    }

    #[test]
    fn dates_outside_the_window_yield_nothing() {
        let material = book(100, date(2024, 1, 1), date(2024, 1, 10));
        assert!(daily_task(&material, date(2023, 12, 31)).is_none());
        assert!(daily_task(&material, date(2024, 1, 11)).is_none());

        let course = video(10, date(2024, 1, 1), date(2024, 1, 10));
        assert!(daily_task(&course, date(2023, 12, 31)).is_none());
        assert!(daily_task(&course, date(2024, 1, 11)).is_none());
    }

    #[test]
    fn finished_materials_yield_nothing() {
        let mut material = book(100, date(2024, 1, 1), date(2024, 1, 10));
        if let MaterialKind::Book(details) = &mut material.kind {
            details.current_page = 100;
        }
        assert!(daily_task(&material, date(2024, 1, 5)).is_none());

        let mut course = video(10, date(2024, 1, 1), date(2024, 1, 10));
        if let MaterialKind::Video(details) = &mut course.kind {
            details.current_progress = 10;
        }
        assert!(daily_task(&course, date(2024, 1, 5)).is_none());
    }

    #[test]
    fn book_completed_flag_follows_current_page() {
        let mut material = book(100, date(2024, 1, 1), date(2024, 1, 10));
        if let MaterialKind::Book(details) = &mut material.kind {
            details.current_page = 30;
        }
        assert!(daily_task(&material, date(2024, 1, 3)).unwrap().completed);
        assert!(!daily_task(&material, date(2024, 1, 4)).unwrap().completed);
    }

    #[test]
    fn video_daily_counts_sum_to_total_sections() {
        for (count, days) in [(7usize, 10u32), (10, 3), (5, 5), (23, 7)] {
            let end = date(2024, 1, 1) + chrono::Duration::days(i64::from(days) - 1);
            let course = video(count, date(2024, 1, 1), end);
            let assigned: usize = dates::date_range(date(2024, 1, 1), end)
                .into_iter()
                .filter_map(|day| daily_task(&course, day))
                .map(|task| section_count(&task))
                .sum();
            assert_eq!(assigned, count, "{count} sections over {days} days");
        }
    }

    #[test]
    fn video_allocation_uses_fractional_rate_not_stored_ceiling() {
        // 5 sections over 10 days: stored rate ceils to 1/day, but the
        // fractional allocation leaves every other day empty.
        let course = video(5, date(2024, 1, 1), date(2024, 1, 10));
        let MaterialKind::Video(details) = &course.kind else {
            panic!("expected a video");
        };
        assert_eq!(details.sections_per_day, 1);

        assert!(daily_task(&course, date(2024, 1, 1)).is_none());
        let task = daily_task(&course, date(2024, 1, 2)).unwrap();
        assert_eq!(section_count(&task), 1);
    }

    #[test]
    fn video_completed_flag_follows_progress_counter() {
        let mut course = video(6, date(2024, 1, 1), date(2024, 1, 3));
        if let MaterialKind::Video(details) = &mut course.kind {
            details.current_progress = 2;
        }
        assert!(daily_task(&course, date(2024, 1, 1)).unwrap().completed);
        assert!(!daily_task(&course, date(2024, 1, 2)).unwrap().completed);
    }

    #[test]
    fn video_description_summarizes_slice() {
        let course = video(6, date(2024, 1, 1), date(2024, 1, 3));
        let task = daily_task(&course, date(2024, 1, 1)).unwrap();
        // Two 30-minute sections.
        assert_eq!(task.description, "Watch 2 sections (1h)");
    }

    #[test]
    fn creation_rejects_invalid_input() {
        assert!(matches!(
            plan_book(
                MaterialDraft::new("Book"),
                0,
                date(2024, 1, 1),
                date(2024, 1, 2),
                &clock()
            ),
            Err(DomainError::EmptyBook)
        ));
        assert!(matches!(
            plan_book(
                MaterialDraft::new("Book"),
                10,
                date(2024, 1, 2),
                date(2024, 1, 1),
                &clock()
            ),
            Err(DomainError::InvalidDateRange { .. })
        ));
        assert!(matches!(
            plan_video(
                MaterialDraft::new("Course"),
                Vec::new(),
                date(2024, 1, 1),
                date(2024, 1, 2),
                &clock()
            ),
            Err(DomainError::EmptyVideo)
        ));
    }

    #[test]
    fn single_day_window_owes_everything_at_once() {
        let material = book(42, date(2024, 1, 5), date(2024, 1, 5));
        let task = daily_task(&material, date(2024, 1, 5)).unwrap();
        assert_eq!(page_range(&task), (1, 42));
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(125), "2h 5m");
        assert_eq!(format_duration(60), "1h");
        assert_eq!(format_duration(45), "45m");
        assert_eq!(format_duration(0), "0m");
    }
}
