//! Automation settings model.
//!
//! This module defines the per-tenant settings controlling the end mark
//! automation, including the reason template applied to generated marks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Child;

/// Default number of years after birth at which care ends automatically.
pub const DEFAULT_YEARS_AFTER_BIRTH: u32 = 4;

/// Default reason template for system-generated end marks.
pub const DEFAULT_DESCRIPTION_TEMPLATE: &str =
    "Automatic end of care for {childName}, {YearsAfterBirth} years after birth ({birthDate})";

/// Per-tenant configuration for the end mark automation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationSettings {
    /// The tenant these settings belong to.
    pub tenant_id: Uuid,
    /// Whether the automation runs for this tenant.
    pub is_enabled: bool,
    /// How many years after a child's birth care ends automatically.
    pub years_after_birth: u32,
    /// Template for the reason text of generated marks. Supports the
    /// placeholders `{childName}`, `{YearsAfterBirth}` and `{birthDate}`.
    pub description_template: String,
}

impl AutomationSettings {
    /// Returns the default settings for a tenant: automation enabled,
    /// four years after birth, and the standard reason template.
    pub fn default_for(tenant_id: Uuid) -> Self {
        Self {
            tenant_id,
            is_enabled: true,
            years_after_birth: DEFAULT_YEARS_AFTER_BIRTH,
            description_template: DEFAULT_DESCRIPTION_TEMPLATE.to_string(),
        }
    }

    /// Renders the reason template for a child.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::{AutomationSettings, Child};
    /// use chrono::NaiveDate;
    /// use uuid::Uuid;
    ///
    /// let settings = AutomationSettings {
    ///     tenant_id: Uuid::new_v4(),
    ///     is_enabled: true,
    ///     years_after_birth: 4,
    ///     description_template: "{childName} leaves {YearsAfterBirth} years after {birthDate}".to_string(),
    /// };
    /// let child = Child {
    ///     id: Uuid::new_v4(),
    ///     given_name: "Mia".to_string(),
    ///     family_name: "Larsen".to_string(),
    ///     date_of_birth: NaiveDate::from_ymd_opt(2022, 4, 9).unwrap(),
    /// };
    /// assert_eq!(
    ///     settings.resolve_description(&child),
    ///     "Mia Larsen leaves 4 years after 2022-04-09"
    /// );
    /// ```
    pub fn resolve_description(&self, child: &Child) -> String {
        self.description_template
            .replace("{childName}", &child.full_name())
            .replace("{YearsAfterBirth}", &self.years_after_birth.to_string())
            .replace("{birthDate}", &format_birth_date(child.date_of_birth))
    }
}

fn format_birth_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
