//! Storage boundaries for the Attendance Engine.
//!
//! Every trait here is an async port the engine's services call through;
//! tenant scoping is explicit in every signature rather than carried in
//! ambient state. The [`memory`] module provides the in-process
//! implementation used by tests and local runs.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{
    Absence, AutomationSettings, CalendarRow, Child, ClosurePeriod, EndMark, Group,
    GroupComplianceSnapshot, GroupStaffLevel, Schedule, TimeSlot,
};

pub mod memory;

pub use memory::InMemoryStore;

/// Child storage.
#[async_trait]
pub trait ChildRepository: Send + Sync {
    /// Fetches one child by id.
    async fn get(&self, tenant: Uuid, id: Uuid) -> EngineResult<Option<Child>>;
    /// Lists every child of the tenant.
    async fn list(&self, tenant: Uuid) -> EngineResult<Vec<Child>>;
    /// Inserts or replaces a child.
    async fn upsert(&self, tenant: Uuid, child: Child) -> EngineResult<()>;
    /// Removes a child.
    async fn delete(&self, tenant: Uuid, id: Uuid) -> EngineResult<()>;
}

/// Schedule storage.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Fetches one schedule by id.
    async fn get(&self, tenant: Uuid, id: Uuid) -> EngineResult<Option<Schedule>>;
    /// Lists a child's schedules ordered by start date.
    async fn list_by_child(&self, tenant: Uuid, child_id: Uuid) -> EngineResult<Vec<Schedule>>;
    /// Lists schedules attached to a group directly or through a rule.
    async fn list_by_group(&self, tenant: Uuid, group_id: Uuid) -> EngineResult<Vec<Schedule>>;
    /// Inserts or replaces a schedule.
    async fn upsert(&self, tenant: Uuid, schedule: Schedule) -> EngineResult<()>;
    /// Inserts or replaces a batch of schedules.
    async fn upsert_all(&self, tenant: Uuid, schedules: Vec<Schedule>) -> EngineResult<()>;
    /// Removes a schedule.
    async fn delete(&self, tenant: Uuid, id: Uuid) -> EngineResult<()>;
    /// Removes every schedule of a child.
    async fn delete_by_child(&self, tenant: Uuid, child_id: Uuid) -> EngineResult<()>;
}

/// End mark storage.
#[async_trait]
pub trait EndMarkRepository: Send + Sync {
    /// Lists a child's end marks ordered by end date.
    async fn list_by_child(&self, tenant: Uuid, child_id: Uuid) -> EngineResult<Vec<EndMark>>;
    /// Inserts or replaces an end mark.
    async fn upsert(&self, tenant: Uuid, mark: EndMark) -> EngineResult<()>;
    /// Removes an end mark.
    async fn delete(&self, tenant: Uuid, id: Uuid) -> EngineResult<()>;
    /// Removes every end mark of a child.
    async fn delete_by_child(&self, tenant: Uuid, child_id: Uuid) -> EngineResult<()>;
}

/// Absence storage.
#[async_trait]
pub trait AbsenceRepository: Send + Sync {
    /// Lists a child's absences.
    async fn list_by_child(&self, tenant: Uuid, child_id: Uuid) -> EngineResult<Vec<Absence>>;
    /// Lists absences overlapping the inclusive date range.
    async fn list_in_range(
        &self,
        tenant: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<Absence>>;
    /// Inserts or replaces an absence.
    async fn upsert(&self, tenant: Uuid, absence: Absence) -> EngineResult<()>;
    /// Removes every absence of a child.
    async fn delete_by_child(&self, tenant: Uuid, child_id: Uuid) -> EngineResult<()>;
}

/// Closure period storage.
#[async_trait]
pub trait ClosureRepository: Send + Sync {
    /// Lists closure periods overlapping the inclusive date range.
    async fn list_in_range(
        &self,
        tenant: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<ClosurePeriod>>;
    /// Inserts or replaces a closure period.
    async fn upsert(&self, tenant: Uuid, closure: ClosurePeriod) -> EngineResult<()>;
}

/// Time slot storage.
#[async_trait]
pub trait TimeSlotRepository: Send + Sync {
    /// Fetches one time slot by id.
    async fn get(&self, tenant: Uuid, id: Uuid) -> EngineResult<Option<TimeSlot>>;
    /// Lists every time slot of the tenant.
    async fn list(&self, tenant: Uuid) -> EngineResult<Vec<TimeSlot>>;
    /// Inserts or replaces a time slot.
    async fn upsert(&self, tenant: Uuid, slot: TimeSlot) -> EngineResult<()>;
}

/// Group storage.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Fetches one group by id.
    async fn get(&self, tenant: Uuid, id: Uuid) -> EngineResult<Option<Group>>;
    /// Lists every group of the tenant.
    async fn list(&self, tenant: Uuid) -> EngineResult<Vec<Group>>;
    /// Inserts or replaces a group.
    async fn upsert(&self, tenant: Uuid, group: Group) -> EngineResult<()>;
}

/// Staffing level history storage.
#[async_trait]
pub trait StaffLevelRepository: Send + Sync {
    /// Lists a group's staffing levels ordered by effective-from time.
    async fn list_by_group(
        &self,
        tenant: Uuid,
        group_id: Uuid,
    ) -> EngineResult<Vec<GroupStaffLevel>>;
    /// Records a staffing level.
    async fn add(&self, tenant: Uuid, level: GroupStaffLevel) -> EngineResult<()>;
}

/// Compliance snapshot storage, append-only.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Appends a snapshot.
    async fn add(&self, tenant: Uuid, snapshot: GroupComplianceSnapshot) -> EngineResult<()>;
    /// Fetches the most recently captured snapshot for a group.
    async fn latest(
        &self,
        tenant: Uuid,
        group_id: Uuid,
    ) -> EngineResult<Option<GroupComplianceSnapshot>>;
    /// Lists a group's snapshots, newest capture first.
    async fn history(
        &self,
        tenant: Uuid,
        group_id: Uuid,
    ) -> EngineResult<Vec<GroupComplianceSnapshot>>;
}

/// Materialized calendar row storage.
#[async_trait]
pub trait CalendarRowRepository: Send + Sync {
    /// Lists cached rows for a group over the inclusive date range,
    /// ordered by date, slot start time, then child id.
    async fn list_range(
        &self,
        tenant: Uuid,
        group_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<CalendarRow>>;
    /// Atomically replaces a group's rows inside the inclusive date
    /// range with the given rows.
    async fn replace_range(
        &self,
        tenant: Uuid,
        group_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        rows: Vec<CalendarRow>,
    ) -> EngineResult<()>;
    /// Removes every cached row of a child across all groups.
    async fn delete_by_child(&self, tenant: Uuid, child_id: Uuid) -> EngineResult<()>;
}

/// Per-tenant automation settings storage.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Fetches the tenant's settings, creating the defaults on first
    /// access.
    async fn get_or_create_default(&self, tenant: Uuid) -> EngineResult<AutomationSettings>;
    /// Replaces the tenant's settings.
    async fn update(&self, tenant: Uuid, settings: AutomationSettings) -> EngineResult<()>;
}

/// Enumerates the tenants known to the store, for background sweeps.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Lists every known tenant id in stable order.
    async fn tenant_ids(&self) -> EngineResult<Vec<Uuid>>;
}

/// The bundle of storage ports the engine's services share.
///
/// Cloning is cheap; every field is an [`Arc`].
#[derive(Clone)]
pub struct Stores {
    /// Child storage
    pub children: Arc<dyn ChildRepository>,
    /// Schedule storage
    pub schedules: Arc<dyn ScheduleRepository>,
    /// End mark storage
    pub end_marks: Arc<dyn EndMarkRepository>,
    /// Absence storage
    pub absences: Arc<dyn AbsenceRepository>,
    /// Closure period storage
    pub closures: Arc<dyn ClosureRepository>,
    /// Time slot storage
    pub time_slots: Arc<dyn TimeSlotRepository>,
    /// Group storage
    pub groups: Arc<dyn GroupRepository>,
    /// Staffing level storage
    pub staff_levels: Arc<dyn StaffLevelRepository>,
    /// Compliance snapshot storage
    pub snapshots: Arc<dyn SnapshotRepository>,
    /// Calendar row cache storage
    pub calendar_rows: Arc<dyn CalendarRowRepository>,
    /// Automation settings storage
    pub settings: Arc<dyn SettingsRepository>,
    /// Tenant enumeration
    pub tenants: Arc<dyn TenantDirectory>,
}

impl Stores {
    /// Creates a bundle backed by a single shared [`InMemoryStore`].
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            children: store.clone(),
            schedules: store.clone(),
            end_marks: store.clone(),
            absences: store.clone(),
            closures: store.clone(),
            time_slots: store.clone(),
            groups: store.clone(),
            staff_levels: store.clone(),
            snapshots: store.clone(),
            calendar_rows: store.clone(),
            settings: store.clone(),
            tenants: store,
        }
    }
}
