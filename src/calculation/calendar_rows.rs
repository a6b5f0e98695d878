//! Calendar row expansion logic.
//!
//! This module expands schedules' weekly recurrence rules into concrete
//! per-child, per-date, per-slot attendance rows for one group and date
//! range, classifying each row against closures and absences. It also
//! folds rows into per-slot headcounts.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Absence, AttendanceStatus, CalendarAggregation, CalendarRow, Child, ClosurePeriod, Schedule,
    TimeSlot,
};

use super::age::age_in_years;

/// Lookup data the expansion draws on, all preloaded by the caller.
#[derive(Debug)]
pub struct ExpansionContext<'a> {
    /// Children keyed by id, for birth date snapshots.
    pub children: &'a HashMap<Uuid, Child>,
    /// Time slots keyed by id, for slot name and time snapshots.
    pub time_slots: &'a HashMap<Uuid, TimeSlot>,
    /// Absences overlapping the expanded range.
    pub absences: &'a [Absence],
    /// Closure periods overlapping the expanded range.
    pub closures: &'a [ClosurePeriod],
}

/// Expands schedules into concrete calendar rows for one group and range.
///
/// Every rule targeting the group is walked across the dates matching
/// its weekday, restricted to the intersection of the schedule's own
/// active window and `[start, end]`. Each resulting row is classified:
/// a closure covering the date wins, then a child absence, then present.
/// The child's birth date and age in whole years on the row's date are
/// snapshotted into the row.
///
/// # Arguments
///
/// * `group_id` - The group to expand rows for
/// * `start` - The first date of the range, inclusive
/// * `end` - The last date of the range, inclusive
/// * `schedules` - Schedules touching the group
/// * `context` - Preloaded children, slots, absences and closures
/// * `cached_at` - The materialization timestamp stamped on every row
///
/// # Returns
///
/// Rows sorted by date, slot start time, then child id.
///
/// # Errors
///
/// Returns [`EngineError::ChildNotFound`] or
/// [`EngineError::TimeSlotNotFound`] when a schedule or rule references
/// an entity missing from the context.
pub fn expand_rows(
    group_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
    schedules: &[Schedule],
    context: &ExpansionContext<'_>,
    cached_at: DateTime<Utc>,
) -> EngineResult<Vec<CalendarRow>> {
    let mut rows = Vec::new();

    for schedule in schedules {
        let window_start = schedule.start_date.max(start);
        let window_end = schedule
            .end_date
            .map_or(end, |schedule_end| schedule_end.min(end));
        if window_start > window_end {
            continue;
        }

        let group_rules: Vec<_> = schedule
            .rules
            .iter()
            .filter(|rule| rule.group_id == group_id)
            .collect();
        if group_rules.is_empty() {
            continue;
        }

        let child = context
            .children
            .get(&schedule.child_id)
            .ok_or(EngineError::ChildNotFound {
                id: schedule.child_id,
            })?;

        for rule in group_rules {
            let slot =
                context
                    .time_slots
                    .get(&rule.time_slot_id)
                    .ok_or(EngineError::TimeSlotNotFound {
                        id: rule.time_slot_id,
                    })?;

            // Jump to the first date in the window on the rule's weekday,
            // then step a week at a time.
            let offset = (rule.weekday.num_days_from_monday() + 7
                - window_start.weekday().num_days_from_monday())
                % 7;
            let mut date = window_start + Duration::days(offset as i64);
            while date <= window_end {
                let (status, reason) = classify_date(context, schedule.child_id, date);
                rows.push(CalendarRow {
                    id: Uuid::new_v4(),
                    group_id,
                    child_id: schedule.child_id,
                    date,
                    time_slot_id: slot.id,
                    time_slot_name: slot.name.clone(),
                    start_time: slot.start_time,
                    end_time: slot.end_time,
                    status,
                    reason,
                    date_of_birth: child.date_of_birth,
                    age_in_years: age_in_years(child.date_of_birth, date),
                    cached_at,
                });
                date += Duration::days(7);
            }
        }
    }

    sort_rows(&mut rows);
    Ok(rows)
}

/// Sorts rows by date, then slot start time, then child id.
pub fn sort_rows(rows: &mut [CalendarRow]) {
    rows.sort_by(|a, b| {
        (a.date, a.start_time, a.child_id).cmp(&(b.date, b.start_time, b.child_id))
    });
}

/// Folds calendar rows into per-slot headcounts.
///
/// Rows are grouped by (date, start time, end time) and counted by
/// status. Buckets come back ordered by date, then start time, then end
/// time.
pub fn aggregate_rows(rows: &[CalendarRow]) -> Vec<CalendarAggregation> {
    let mut buckets: BTreeMap<(NaiveDate, NaiveTime, NaiveTime), (u32, u32, u32)> =
        BTreeMap::new();

    for row in rows {
        let bucket = buckets
            .entry((row.date, row.start_time, row.end_time))
            .or_default();
        match row.status {
            AttendanceStatus::Present => bucket.0 += 1,
            AttendanceStatus::Absent => bucket.1 += 1,
            AttendanceStatus::Closed => bucket.2 += 1,
        }
    }

    buckets
        .into_iter()
        .map(
            |((date, start_time, end_time), (present, absent, closed))| CalendarAggregation {
                date,
                start_time,
                end_time,
                present,
                absent,
                closed,
            },
        )
        .collect()
}

/// Resolves the attendance status of one child on one date. A closure
/// covering the date wins over an absence; otherwise the child is
/// present.
fn classify_date(
    context: &ExpansionContext<'_>,
    child_id: Uuid,
    date: NaiveDate,
) -> (AttendanceStatus, Option<String>) {
    if let Some(closure) = context.closures.iter().find(|closure| closure.covers(date)) {
        return (AttendanceStatus::Closed, closure.reason.clone());
    }
    if let Some(absence) = context
        .absences
        .iter()
        .find(|absence| absence.child_id == child_id && absence.covers(date))
    {
        return (AttendanceStatus::Absent, absence.reason.clone());
    }
    (AttendanceStatus::Present, None)
}
