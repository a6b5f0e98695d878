//! In-memory storage for tests and local runs.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::calculation::sort_rows;
use crate::error::EngineResult;
use crate::models::{
    Absence, AutomationSettings, CalendarRow, Child, ClosurePeriod, EndMark, Group,
    GroupComplianceSnapshot, GroupStaffLevel, Schedule, TimeSlot,
};

use super::{
    AbsenceRepository, CalendarRowRepository, ChildRepository, ClosureRepository,
    EndMarkRepository, GroupRepository, ScheduleRepository, SettingsRepository,
    SnapshotRepository, StaffLevelRepository, TenantDirectory, TimeSlotRepository,
};

/// Shared in-process store implementing every storage port.
///
/// Entity maps are keyed by `(tenant, id)`. A tenant becomes visible to
/// [`TenantDirectory::tenant_ids`] after its first write. A single lock
/// guards the whole store, which makes range replacement atomic.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    children: HashMap<(Uuid, Uuid), Child>,
    schedules: HashMap<(Uuid, Uuid), Schedule>,
    end_marks: HashMap<(Uuid, Uuid), EndMark>,
    absences: HashMap<(Uuid, Uuid), Absence>,
    closures: HashMap<(Uuid, Uuid), ClosurePeriod>,
    time_slots: HashMap<(Uuid, Uuid), TimeSlot>,
    groups: HashMap<(Uuid, Uuid), Group>,
    staff_levels: HashMap<(Uuid, Uuid), GroupStaffLevel>,
    snapshots: Vec<(Uuid, GroupComplianceSnapshot)>,
    calendar_rows: Vec<(Uuid, CalendarRow)>,
    settings: HashMap<Uuid, AutomationSettings>,
    tenants: BTreeSet<Uuid>,
}

impl Inner {
    fn touch(&mut self, tenant: Uuid) {
        self.tenants.insert(tenant);
    }
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChildRepository for InMemoryStore {
    async fn get(&self, tenant: Uuid, id: Uuid) -> EngineResult<Option<Child>> {
        Ok(self.inner.read().await.children.get(&(tenant, id)).cloned())
    }

    async fn list(&self, tenant: Uuid) -> EngineResult<Vec<Child>> {
        let inner = self.inner.read().await;
        let mut children: Vec<Child> = inner
            .children
            .iter()
            .filter(|((owner, _), _)| *owner == tenant)
            .map(|(_, child)| child.clone())
            .collect();
        children.sort_by_key(|child| child.id);
        Ok(children)
    }

    async fn upsert(&self, tenant: Uuid, child: Child) -> EngineResult<()> {
        let mut inner = self.inner.write().await;
        inner.touch(tenant);
        inner.children.insert((tenant, child.id), child);
        Ok(())
    }

    async fn delete(&self, tenant: Uuid, id: Uuid) -> EngineResult<()> {
        self.inner.write().await.children.remove(&(tenant, id));
        Ok(())
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryStore {
    async fn get(&self, tenant: Uuid, id: Uuid) -> EngineResult<Option<Schedule>> {
        Ok(self.inner.read().await.schedules.get(&(tenant, id)).cloned())
    }

    async fn list_by_child(&self, tenant: Uuid, child_id: Uuid) -> EngineResult<Vec<Schedule>> {
        let inner = self.inner.read().await;
        let mut schedules: Vec<Schedule> = inner
            .schedules
            .iter()
            .filter(|((owner, _), schedule)| *owner == tenant && schedule.child_id == child_id)
            .map(|(_, schedule)| schedule.clone())
            .collect();
        schedules.sort_by_key(|schedule| (schedule.start_date, schedule.id));
        Ok(schedules)
    }

    async fn list_by_group(&self, tenant: Uuid, group_id: Uuid) -> EngineResult<Vec<Schedule>> {
        let inner = self.inner.read().await;
        let mut schedules: Vec<Schedule> = inner
            .schedules
            .iter()
            .filter(|((owner, _), schedule)| *owner == tenant && schedule.touches_group(group_id))
            .map(|(_, schedule)| schedule.clone())
            .collect();
        schedules.sort_by_key(|schedule| (schedule.start_date, schedule.id));
        Ok(schedules)
    }

    async fn upsert(&self, tenant: Uuid, schedule: Schedule) -> EngineResult<()> {
        let mut inner = self.inner.write().await;
        inner.touch(tenant);
        inner.schedules.insert((tenant, schedule.id), schedule);
        Ok(())
    }

    async fn upsert_all(&self, tenant: Uuid, schedules: Vec<Schedule>) -> EngineResult<()> {
        let mut inner = self.inner.write().await;
        inner.touch(tenant);
        for schedule in schedules {
            inner.schedules.insert((tenant, schedule.id), schedule);
        }
        Ok(())
    }

    async fn delete(&self, tenant: Uuid, id: Uuid) -> EngineResult<()> {
        self.inner.write().await.schedules.remove(&(tenant, id));
        Ok(())
    }

    async fn delete_by_child(&self, tenant: Uuid, child_id: Uuid) -> EngineResult<()> {
        self.inner
            .write()
            .await
            .schedules
            .retain(|(owner, _), schedule| {
                !(*owner == tenant && schedule.child_id == child_id)
            });
        Ok(())
    }
}

#[async_trait]
impl EndMarkRepository for InMemoryStore {
    async fn list_by_child(&self, tenant: Uuid, child_id: Uuid) -> EngineResult<Vec<EndMark>> {
        let inner = self.inner.read().await;
        let mut marks: Vec<EndMark> = inner
            .end_marks
            .iter()
            .filter(|((owner, _), mark)| *owner == tenant && mark.child_id == child_id)
            .map(|(_, mark)| mark.clone())
            .collect();
        marks.sort_by_key(|mark| (mark.end_date, mark.id));
        Ok(marks)
    }

    async fn upsert(&self, tenant: Uuid, mark: EndMark) -> EngineResult<()> {
        let mut inner = self.inner.write().await;
        inner.touch(tenant);
        inner.end_marks.insert((tenant, mark.id), mark);
        Ok(())
    }

    async fn delete(&self, tenant: Uuid, id: Uuid) -> EngineResult<()> {
        self.inner.write().await.end_marks.remove(&(tenant, id));
        Ok(())
    }

    async fn delete_by_child(&self, tenant: Uuid, child_id: Uuid) -> EngineResult<()> {
        self.inner
            .write()
            .await
            .end_marks
            .retain(|(owner, _), mark| !(*owner == tenant && mark.child_id == child_id));
        Ok(())
    }
}

#[async_trait]
impl AbsenceRepository for InMemoryStore {
    async fn list_by_child(&self, tenant: Uuid, child_id: Uuid) -> EngineResult<Vec<Absence>> {
        let inner = self.inner.read().await;
        let mut absences: Vec<Absence> = inner
            .absences
            .iter()
            .filter(|((owner, _), absence)| *owner == tenant && absence.child_id == child_id)
            .map(|(_, absence)| absence.clone())
            .collect();
        absences.sort_by_key(|absence| (absence.start_date, absence.id));
        Ok(absences)
    }

    async fn list_in_range(
        &self,
        tenant: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<Absence>> {
        let inner = self.inner.read().await;
        let mut absences: Vec<Absence> = inner
            .absences
            .iter()
            .filter(|((owner, _), absence)| {
                *owner == tenant && absence.start_date <= end && absence.end_date >= start
            })
            .map(|(_, absence)| absence.clone())
            .collect();
        absences.sort_by_key(|absence| (absence.start_date, absence.id));
        Ok(absences)
    }

    async fn upsert(&self, tenant: Uuid, absence: Absence) -> EngineResult<()> {
        let mut inner = self.inner.write().await;
        inner.touch(tenant);
        inner.absences.insert((tenant, absence.id), absence);
        Ok(())
    }

    async fn delete_by_child(&self, tenant: Uuid, child_id: Uuid) -> EngineResult<()> {
        self.inner
            .write()
            .await
            .absences
            .retain(|(owner, _), absence| !(*owner == tenant && absence.child_id == child_id));
        Ok(())
    }
}

#[async_trait]
impl ClosureRepository for InMemoryStore {
    async fn list_in_range(
        &self,
        tenant: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<ClosurePeriod>> {
        let inner = self.inner.read().await;
        let mut closures: Vec<ClosurePeriod> = inner
            .closures
            .iter()
            .filter(|((owner, _), closure)| {
                *owner == tenant && closure.start_date <= end && closure.end_date >= start
            })
            .map(|(_, closure)| closure.clone())
            .collect();
        closures.sort_by_key(|closure| (closure.start_date, closure.id));
        Ok(closures)
    }

    async fn upsert(&self, tenant: Uuid, closure: ClosurePeriod) -> EngineResult<()> {
        let mut inner = self.inner.write().await;
        inner.touch(tenant);
        inner.closures.insert((tenant, closure.id), closure);
        Ok(())
    }
}

#[async_trait]
impl TimeSlotRepository for InMemoryStore {
    async fn get(&self, tenant: Uuid, id: Uuid) -> EngineResult<Option<TimeSlot>> {
        Ok(self.inner.read().await.time_slots.get(&(tenant, id)).cloned())
    }

    async fn list(&self, tenant: Uuid) -> EngineResult<Vec<TimeSlot>> {
        let inner = self.inner.read().await;
        let mut slots: Vec<TimeSlot> = inner
            .time_slots
            .iter()
            .filter(|((owner, _), _)| *owner == tenant)
            .map(|(_, slot)| slot.clone())
            .collect();
        slots.sort_by_key(|slot| slot.id);
        Ok(slots)
    }

    async fn upsert(&self, tenant: Uuid, slot: TimeSlot) -> EngineResult<()> {
        let mut inner = self.inner.write().await;
        inner.touch(tenant);
        inner.time_slots.insert((tenant, slot.id), slot);
        Ok(())
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn get(&self, tenant: Uuid, id: Uuid) -> EngineResult<Option<Group>> {
        Ok(self.inner.read().await.groups.get(&(tenant, id)).cloned())
    }

    async fn list(&self, tenant: Uuid) -> EngineResult<Vec<Group>> {
        let inner = self.inner.read().await;
        let mut groups: Vec<Group> = inner
            .groups
            .iter()
            .filter(|((owner, _), _)| *owner == tenant)
            .map(|(_, group)| group.clone())
            .collect();
        groups.sort_by_key(|group| group.id);
        Ok(groups)
    }

    async fn upsert(&self, tenant: Uuid, group: Group) -> EngineResult<()> {
        let mut inner = self.inner.write().await;
        inner.touch(tenant);
        inner.groups.insert((tenant, group.id), group);
        Ok(())
    }
}

#[async_trait]
impl StaffLevelRepository for InMemoryStore {
    async fn list_by_group(
        &self,
        tenant: Uuid,
        group_id: Uuid,
    ) -> EngineResult<Vec<GroupStaffLevel>> {
        let inner = self.inner.read().await;
        let mut levels: Vec<GroupStaffLevel> = inner
            .staff_levels
            .iter()
            .filter(|((owner, _), level)| *owner == tenant && level.group_id == group_id)
            .map(|(_, level)| level.clone())
            .collect();
        levels.sort_by_key(|level| (level.effective_from, level.id));
        Ok(levels)
    }

    async fn add(&self, tenant: Uuid, level: GroupStaffLevel) -> EngineResult<()> {
        let mut inner = self.inner.write().await;
        inner.touch(tenant);
        inner.staff_levels.insert((tenant, level.id), level);
        Ok(())
    }
}

#[async_trait]
impl SnapshotRepository for InMemoryStore {
    async fn add(&self, tenant: Uuid, snapshot: GroupComplianceSnapshot) -> EngineResult<()> {
        let mut inner = self.inner.write().await;
        inner.touch(tenant);
        inner.snapshots.push((tenant, snapshot));
        Ok(())
    }

    async fn latest(
        &self,
        tenant: Uuid,
        group_id: Uuid,
    ) -> EngineResult<Option<GroupComplianceSnapshot>> {
        let inner = self.inner.read().await;
        Ok(inner
            .snapshots
            .iter()
            .filter(|(owner, snapshot)| *owner == tenant && snapshot.group_id == group_id)
            .max_by_key(|(_, snapshot)| snapshot.captured_at)
            .map(|(_, snapshot)| snapshot.clone()))
    }

    async fn history(
        &self,
        tenant: Uuid,
        group_id: Uuid,
    ) -> EngineResult<Vec<GroupComplianceSnapshot>> {
        let inner = self.inner.read().await;
        let mut snapshots: Vec<GroupComplianceSnapshot> = inner
            .snapshots
            .iter()
            .filter(|(owner, snapshot)| *owner == tenant && snapshot.group_id == group_id)
            .map(|(_, snapshot)| snapshot.clone())
            .collect();
        snapshots.sort_by_key(|snapshot| (Reverse(snapshot.captured_at), snapshot.id));
        Ok(snapshots)
    }
}

#[async_trait]
impl CalendarRowRepository for InMemoryStore {
    async fn list_range(
        &self,
        tenant: Uuid,
        group_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<CalendarRow>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<CalendarRow> = inner
            .calendar_rows
            .iter()
            .filter(|(owner, row)| {
                *owner == tenant
                    && row.group_id == group_id
                    && row.date >= start
                    && row.date <= end
            })
            .map(|(_, row)| row.clone())
            .collect();
        sort_rows(&mut rows);
        Ok(rows)
    }

    async fn replace_range(
        &self,
        tenant: Uuid,
        group_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        rows: Vec<CalendarRow>,
    ) -> EngineResult<()> {
        let mut inner = self.inner.write().await;
        inner.touch(tenant);
        inner.calendar_rows.retain(|(owner, row)| {
            !(*owner == tenant
                && row.group_id == group_id
                && row.date >= start
                && row.date <= end)
        });
        inner
            .calendar_rows
            .extend(rows.into_iter().map(|row| (tenant, row)));
        Ok(())
    }

    async fn delete_by_child(&self, tenant: Uuid, child_id: Uuid) -> EngineResult<()> {
        self.inner
            .write()
            .await
            .calendar_rows
            .retain(|(owner, row)| !(*owner == tenant && row.child_id == child_id));
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for InMemoryStore {
    async fn get_or_create_default(&self, tenant: Uuid) -> EngineResult<AutomationSettings> {
        let mut inner = self.inner.write().await;
        inner.touch(tenant);
        Ok(inner
            .settings
            .entry(tenant)
            .or_insert_with(|| AutomationSettings::default_for(tenant))
            .clone())
    }

    async fn update(&self, tenant: Uuid, settings: AutomationSettings) -> EngineResult<()> {
        let mut inner = self.inner.write().await;
        inner.touch(tenant);
        inner.settings.insert(tenant, settings);
        Ok(())
    }
}

#[async_trait]
impl TenantDirectory for InMemoryStore {
    async fn tenant_ids(&self) -> EngineResult<Vec<Uuid>> {
        Ok(self.inner.read().await.tenants.iter().copied().collect())
    }
}
