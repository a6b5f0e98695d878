//! Orchestration services for the Attendance Engine.
//!
//! Services load from the storage ports, run the pure calculations, and
//! persist the results. Cross-request hazards are handled with per-key
//! async locks: end mark maintenance serializes per child, calendar
//! rebuilds serialize per group.

mod calendar;
mod compliance;
mod end_mark;
mod lifecycle;
mod locks;
mod status;
mod timeline;

pub use calendar::CalendarService;
pub use compliance::ComplianceService;
pub use end_mark::EndMarkAutomationService;
pub use lifecycle::ChildLifecycleHandler;
pub use locks::KeyedLocks;
pub use status::StatusService;
pub use timeline::TimelineService;
