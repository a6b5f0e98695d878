//! Schedule timeline calculation logic.
//!
//! This module derives the effective end date of each schedule in a
//! child's timeline from the chronological ordering of the schedules
//! themselves and from the child's end marks.

use chrono::Duration;

use crate::models::{EndMark, Schedule};

/// Derives and assigns the calculated end date of every schedule.
///
/// The inputs are one child's full schedule list and end mark list, in
/// any order. Schedules are sorted ascending by start date (the slice is
/// left in that order) and each receives the earlier of two candidates:
///
/// 1. the day before the next schedule's start, and
/// 2. the day before the earliest end mark dated after this schedule's
///    start and before the next schedule's start (any mark at or past
///    the next start belongs to a later schedule).
///
/// A candidate earlier than the schedule's own start is discarded rather
/// than producing a negative-length schedule; with no surviving
/// candidate the schedule stays open-ended. Re-running on the same
/// inputs yields the same assignments.
///
/// # Arguments
///
/// * `schedules` - One child's schedules; end dates are assigned in place
/// * `end_marks` - The same child's end marks
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::calculate_end_dates;
/// use attendance_engine::models::Schedule;
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// let child_id = Uuid::new_v4();
/// let mut schedules: Vec<Schedule> = [
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
/// ]
/// .into_iter()
/// .map(|start_date| Schedule {
///     id: Uuid::new_v4(),
///     child_id,
///     group_id: Uuid::new_v4(),
///     start_date,
///     end_date: None,
///     rules: vec![],
/// })
/// .collect();
///
/// calculate_end_dates(&mut schedules, &[]);
///
/// assert_eq!(
///     schedules[0].end_date,
///     Some(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap())
/// );
/// assert_eq!(schedules[1].end_date, None);
/// ```
pub fn calculate_end_dates(schedules: &mut [Schedule], end_marks: &[EndMark]) {
    schedules.sort_by_key(|schedule| schedule.start_date);

    let mut marks: Vec<&EndMark> = end_marks.iter().collect();
    marks.sort_by_key(|mark| mark.end_date);

    for index in 0..schedules.len() {
        let start = schedules[index].start_date;
        let next_start = schedules.get(index + 1).map(|next| next.start_date);

        let from_next = next_start.map(|next| next - Duration::days(1));
        let from_mark = marks
            .iter()
            .find(|mark| {
                mark.end_date > start && next_start.is_none_or(|next| mark.end_date < next)
            })
            .map(|mark| mark.end_date - Duration::days(1));

        let chosen = match (from_next, from_mark) {
            (Some(next_candidate), Some(mark_candidate)) => {
                Some(next_candidate.min(mark_candidate))
            }
            (next_candidate, mark_candidate) => next_candidate.or(mark_candidate),
        };

        schedules[index].end_date = chosen.filter(|&end| end >= start);
    }
}
