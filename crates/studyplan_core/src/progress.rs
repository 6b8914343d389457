//! crates/studyplan_core/src/progress.rs
//!
//! Completion derivations read by progress bars and list badges, plus the
//! key format the external completion ledger is addressed by.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::clock::Clock;
use crate::dates;
use crate::domain::{Material, MaterialKind};

/// Whether the user has worked through the whole material.
pub fn is_learning_completed(material: &Material) -> bool {
    match &material.kind {
        MaterialKind::Book(book) => book.current_page >= book.total_pages,
        MaterialKind::Video(video) => video.current_progress as usize >= video.sections.len(),
        MaterialKind::Custom => false,
    }
}

/// Days left until the material's end date; 0 once it has passed.
pub fn remaining_days(material: &Material, clock: &dyn Clock) -> u32 {
    let end_date = match &material.kind {
        MaterialKind::Book(book) => book.end_date,
        MaterialKind::Video(video) => video.end_date,
        MaterialKind::Custom => return 0,
    };
    let today = clock.today();
    if end_date < today {
        0
    } else {
        dates::days_between(today, end_date)
    }
}

/// Key under which the external completion ledger records a finished
/// (material, date) pair.
///
/// This ledger is a separate signal from the material's own progress
/// counter; nothing in the core reconciles the two.
pub fn completion_key(material_id: Uuid, date: NaiveDate) -> String {
    format!("{}-{}", material_id, dates::format_date(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::domain::MaterialDraft;
    use crate::schedule;

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

    #[test]
    fn completion_follows_the_progress_counter() {
        let mut material = book(100, date(2024, 1, 1), date(2024, 1, 10));
        assert!(!is_learning_completed(&material));
        if let MaterialKind::Book(details) = &mut material.kind {
            details.current_page = 100;
        }
        assert!(is_learning_completed(&material));
    }

    #[test]
    fn remaining_days_floors_at_zero() {
        let material = book(100, date(2024, 1, 1), date(2024, 1, 10));
        assert_eq!(remaining_days(&material, &FixedClock(date(2024, 1, 8))), 2);
        assert_eq!(remaining_days(&material, &FixedClock(date(2024, 1, 10))), 0);
        assert_eq!(remaining_days(&material, &FixedClock(date(2024, 2, 1))), 0);
    }

    #[test]
    fn completion_keys_embed_the_date_key() {
        let id = Uuid::nil();
        assert_eq!(
            completion_key(id, date(2024, 1, 3)),
            format!("{id}-2024-01-03")
        );
    }
}
