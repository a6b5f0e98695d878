//! System end mark maintenance.
//!
//! Keeps each child's single system-generated end mark aligned with the
//! tenant's automation policy: the mark's date tracks the child's birth
//! date plus the configured number of years, and its reason tracks the
//! resolved description template. Manual marks always win; automation
//! never creates a mark next to one.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::add_years;
use crate::error::EngineResult;
use crate::models::{Child, EndMark};
use crate::repository::Stores;

use super::locks::KeyedLocks;
use super::timeline::TimelineService;

/// Maintains system-generated end marks and triggers timeline
/// recalculation when they change.
///
/// Clones share the per-child serialization state, so concurrent
/// maintenance calls for the same child take turns regardless of which
/// clone they go through.
#[derive(Clone)]
pub struct EndMarkAutomationService {
    stores: Stores,
    timeline: TimelineService,
    locks: Arc<KeyedLocks<(Uuid, Uuid)>>,
}

impl EndMarkAutomationService {
    /// Creates the service over the given stores.
    pub fn new(stores: Stores) -> Self {
        let timeline = TimelineService::new(stores.clone());
        Self {
            stores,
            timeline,
            locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// Reconciles the child's system end mark with the tenant's
    /// automation settings.
    ///
    /// Intended to run on child-added and child-updated events. Manual
    /// end mark edits do not come through here; they recalculate the
    /// timeline directly.
    ///
    /// # Returns
    ///
    /// `true` if any mark was created, updated or deleted (the child's
    /// timeline has been recalculated), `false` if nothing needed doing.
    pub async fn maintain(&self, tenant: Uuid, child: &Child) -> EngineResult<bool> {
        let settings = self.stores.settings.get_or_create_default(tenant).await?;
        if !settings.is_enabled {
            debug!(child_id = %child.id, "End mark automation disabled for tenant, skipping");
            return Ok(false);
        }

        let expected_end = add_years(child.date_of_birth, settings.years_after_birth);
        let expected_reason = settings.resolve_description(child);

        // Serialize per child so two rapid update events cannot both
        // observe "no marks" and create duplicates.
        let _guard = self.locks.acquire((tenant, child.id)).await;

        let marks = self.stores.end_marks.list_by_child(tenant, child.id).await?;
        let system_marks: Vec<&EndMark> =
            marks.iter().filter(|mark| mark.is_system_generated).collect();

        let changed = match system_marks.as_slice() {
            [] => {
                if marks.is_empty() {
                    self.create_mark(tenant, child, expected_end, &expected_reason)
                        .await?;
                    true
                } else {
                    debug!(
                        child_id = %child.id,
                        "Manual end marks present, leaving them untouched"
                    );
                    false
                }
            }
            [only] => {
                self.reconcile_mark(tenant, (*only).clone(), expected_end, &expected_reason)
                    .await?
            }
            [earliest, extras @ ..] => {
                warn!(
                    child_id = %child.id,
                    found = system_marks.len(),
                    "Multiple system end marks found, repairing"
                );
                for extra in extras {
                    self.stores.end_marks.delete(tenant, extra.id).await?;
                }
                self.reconcile_mark(tenant, (*earliest).clone(), expected_end, &expected_reason)
                    .await?;
                true
            }
        };

        if changed {
            self.timeline.recalculate_child(tenant, child.id).await?;
        }
        Ok(changed)
    }

    async fn create_mark(
        &self,
        tenant: Uuid,
        child: &Child,
        end_date: NaiveDate,
        reason: &str,
    ) -> EngineResult<()> {
        let mark = EndMark {
            id: Uuid::new_v4(),
            child_id: child.id,
            end_date,
            reason: Some(reason.to_string()),
            is_system_generated: true,
        };
        info!(
            child_id = %child.id,
            end_date = %end_date,
            "Created system end mark"
        );
        self.stores.end_marks.upsert(tenant, mark).await
    }

    /// Brings one system mark in line with the expected date and reason,
    /// keeping its identity. Returns whether anything was written.
    async fn reconcile_mark(
        &self,
        tenant: Uuid,
        mut mark: EndMark,
        expected_end: NaiveDate,
        expected_reason: &str,
    ) -> EngineResult<bool> {
        let mut changed = false;
        if mark.end_date != expected_end {
            mark.end_date = expected_end;
            changed = true;
        }
        if mark.reason.as_deref() != Some(expected_reason) {
            changed |= mark.set_reason(Some(expected_reason.to_string()));
        }
        if changed {
            info!(
                child_id = %mark.child_id,
                end_date = %mark.end_date,
                "Updated system end mark"
            );
            self.stores.end_marks.upsert(tenant, mark).await?;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Schedule;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn make_child(born: &str) -> Child {
        Child {
            id: Uuid::new_v4(),
            given_name: "Mia".to_string(),
            family_name: "Nguyen".to_string(),
            date_of_birth: make_date(born),
        }
    }

    async fn system_marks(stores: &Stores, tenant: Uuid, child_id: Uuid) -> Vec<EndMark> {
        stores
            .end_marks
            .list_by_child(tenant, child_id)
            .await
            .unwrap()
            .into_iter()
            .filter(|mark| mark.is_system_generated)
            .collect()
    }

    // ==========================================================================
    // EM-001: First maintenance creates the mark and derives the timeline
    // ==========================================================================
    #[tokio::test]
    async fn test_em_001_creates_mark_and_recalculates_timeline() {
        let stores = Stores::in_memory();
        let service = EndMarkAutomationService::new(stores.clone());
        let tenant = Uuid::new_v4();
        let child = make_child("2021-03-15");

        stores
            .schedules
            .upsert(
                tenant,
                Schedule {
                    id: Uuid::new_v4(),
                    child_id: child.id,
                    group_id: Uuid::new_v4(),
                    start_date: make_date("2024-01-01"),
                    end_date: None,
                    rules: Vec::new(),
                },
            )
            .await
            .unwrap();

        assert!(service.maintain(tenant, &child).await.unwrap());

        let marks = system_marks(&stores, tenant, child.id).await;
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].end_date, make_date("2025-03-15"));
        let reason = marks[0].reason.as_deref().unwrap();
        assert!(reason.contains("Mia Nguyen"));
        assert!(reason.contains("2021-03-15"));

        // Timeline picked the mark up: end = mark date - 1 day
        let schedules = stores.schedules.list_by_child(tenant, child.id).await.unwrap();
        assert_eq!(schedules[0].end_date, Some(make_date("2025-03-14")));
    }

    // ==========================================================================
    // EM-002: Disabled automation leaves everything alone
    // ==========================================================================
    #[tokio::test]
    async fn test_em_002_disabled_automation_is_a_no_op() {
        let stores = Stores::in_memory();
        let service = EndMarkAutomationService::new(stores.clone());
        let tenant = Uuid::new_v4();
        let child = make_child("2021-03-15");

        let mut settings = stores.settings.get_or_create_default(tenant).await.unwrap();
        settings.is_enabled = false;
        stores.settings.update(tenant, settings).await.unwrap();

        assert!(!service.maintain(tenant, &child).await.unwrap());
        assert!(system_marks(&stores, tenant, child.id).await.is_empty());
    }

    // ==========================================================================
    // EM-003: Manual marks suppress automatic creation
    // ==========================================================================
    #[tokio::test]
    async fn test_em_003_manual_marks_win() {
        let stores = Stores::in_memory();
        let service = EndMarkAutomationService::new(stores.clone());
        let tenant = Uuid::new_v4();
        let child = make_child("2021-03-15");

        stores
            .end_marks
            .upsert(
                tenant,
                EndMark {
                    id: Uuid::new_v4(),
                    child_id: child.id,
                    end_date: make_date("2024-12-01"),
                    reason: Some("family moving".to_string()),
                    is_system_generated: false,
                },
            )
            .await
            .unwrap();

        assert!(!service.maintain(tenant, &child).await.unwrap());

        let marks = stores.end_marks.list_by_child(tenant, child.id).await.unwrap();
        assert_eq!(marks.len(), 1);
        assert!(!marks[0].is_system_generated);
        assert_eq!(marks[0].reason.as_deref(), Some("family moving"));
    }

    // ==========================================================================
    // EM-004: Policy change updates the mark in place, no second mark
    // ==========================================================================
    #[tokio::test]
    async fn test_em_004_policy_change_updates_existing_mark() {
        let stores = Stores::in_memory();
        let service = EndMarkAutomationService::new(stores.clone());
        let tenant = Uuid::new_v4();
        let child = make_child("2021-03-15");

        service.maintain(tenant, &child).await.unwrap();
        let original = system_marks(&stores, tenant, child.id).await.remove(0);
        assert_eq!(original.end_date, make_date("2025-03-15"));

        let mut settings = stores.settings.get_or_create_default(tenant).await.unwrap();
        settings.years_after_birth = 5;
        stores.settings.update(tenant, settings).await.unwrap();

        assert!(service.maintain(tenant, &child).await.unwrap());

        let marks = system_marks(&stores, tenant, child.id).await;
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].id, original.id);
        assert_eq!(marks[0].end_date, make_date("2026-03-15"));
        let reason = marks[0].reason.as_deref().unwrap();
        assert!(reason.contains('5'));
    }

    // ==========================================================================
    // EM-005: Unchanged state is a no-op
    // ==========================================================================
    #[tokio::test]
    async fn test_em_005_second_run_without_changes_is_a_no_op() {
        let stores = Stores::in_memory();
        let service = EndMarkAutomationService::new(stores.clone());
        let tenant = Uuid::new_v4();
        let child = make_child("2021-03-15");

        assert!(service.maintain(tenant, &child).await.unwrap());
        assert!(!service.maintain(tenant, &child).await.unwrap());
        assert_eq!(system_marks(&stores, tenant, child.id).await.len(), 1);
    }

    // ==========================================================================
    // EM-006: Duplicate system marks are repaired down to the earliest
    // ==========================================================================
    #[tokio::test]
    async fn test_em_006_duplicate_system_marks_are_repaired() {
        let stores = Stores::in_memory();
        let service = EndMarkAutomationService::new(stores.clone());
        let tenant = Uuid::new_v4();
        let child = make_child("2021-03-15");

        let earliest_id = Uuid::new_v4();
        for (id, end) in [
            (Uuid::new_v4(), "2026-01-01"),
            (earliest_id, "2024-06-01"),
            (Uuid::new_v4(), "2025-08-01"),
        ] {
            stores
                .end_marks
                .upsert(
                    tenant,
                    EndMark {
                        id,
                        child_id: child.id,
                        end_date: make_date(end),
                        reason: None,
                        is_system_generated: true,
                    },
                )
                .await
                .unwrap();
        }

        assert!(service.maintain(tenant, &child).await.unwrap());

        let marks = system_marks(&stores, tenant, child.id).await;
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].id, earliest_id);
        assert_eq!(marks[0].end_date, make_date("2025-03-15"));
    }

    // ==========================================================================
    // EM-007: Concurrent maintenance never doubles up
    // ==========================================================================
    #[tokio::test]
    async fn test_em_007_concurrent_maintenance_creates_one_mark() {
        let stores = Stores::in_memory();
        let service = EndMarkAutomationService::new(stores.clone());
        let tenant = Uuid::new_v4();
        let child = make_child("2021-03-15");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = service.clone();
            let child = child.clone();
            handles.push(tokio::spawn(async move {
                service.maintain(tenant, &child).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(system_marks(&stores, tenant, child.id).await.len(), 1);
    }

    // ==========================================================================
    // EM-008: An extreme year policy saturates the mark date, no panic
    // ==========================================================================
    #[tokio::test]
    async fn test_em_008_extreme_year_policy_saturates_mark_date() {
        let stores = Stores::in_memory();
        let service = EndMarkAutomationService::new(stores.clone());
        let tenant = Uuid::new_v4();
        let child = make_child("2021-03-15");

        let mut settings = stores.settings.get_or_create_default(tenant).await.unwrap();
        settings.years_after_birth = 300_000;
        stores.settings.update(tenant, settings).await.unwrap();

        assert!(service.maintain(tenant, &child).await.unwrap());

        let marks = system_marks(&stores, tenant, child.id).await;
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].end_date, NaiveDate::MAX);
    }
}
