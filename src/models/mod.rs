//! Core data models for the attendance engine.
//!
//! This module contains all the domain models used throughout the engine.

mod absence;
mod calendar_row;
mod child;
mod compliance;
mod end_mark;
mod group;
mod schedule;
mod settings;
mod time_slot;

pub use absence::{Absence, ClosurePeriod};
pub use calendar_row::{AttendanceStatus, CalendarAggregation, CalendarRow};
pub use child::Child;
pub use compliance::{ComplianceStatus, GroupComplianceSnapshot};
pub use end_mark::EndMark;
pub use group::{Group, GroupStaffLevel};
pub use schedule::{Schedule, ScheduleRule};
pub use settings::{
    AutomationSettings, DEFAULT_DESCRIPTION_TEMPLATE, DEFAULT_YEARS_AFTER_BIRTH,
};
pub use time_slot::TimeSlot;
