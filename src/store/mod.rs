use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::PlanError;
use crate::model::MealPlan;
use crate::profile::Profile;

pub mod memory;
pub mod sqlite;

/// ========================================
/// Persistence Adapter
/// ========================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPlan {
    pub id: i64,
    pub name: String,
    pub user_profile: Profile,
    pub plan_data: MealPlan,
    pub created_at: DateTime<Utc>,
}

/// Store contract shared by both backends: ids are unique and stable once
/// assigned, listing is strictly newest-first, delete is idempotent, and
/// records are never mutated in place.
pub trait PlanStore: Send + Sync {
    fn save(&self, name: &str, profile: &Profile, plan: &MealPlan) -> Result<i64, PlanError>;
    fn list(&self) -> Result<Vec<PlanSummary>, PlanError>;
    fn load(&self, id: i64) -> Result<Option<SavedPlan>, PlanError>;
    fn delete(&self, id: i64) -> Result<(), PlanError>;
}

pub type DynStore = Box<dyn PlanStore>;

pub(crate) fn validate_name(name: &str) -> Result<(), PlanError> {
    if name.trim().is_empty() {
        return Err(PlanError::InvalidName);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod contract {
    //! Shared conformance checks run against every backend.

    use super::*;
    use crate::extract::extract_plan;
    use crate::profile::{BudgetPeriod, CookingStyle, Goal};

    pub fn sample_profile() -> Profile {
        Profile {
            weight: "70".into(),
            weight_unit: "kg".into(),
            height: "175".into(),
            height_unit: "cm".into(),
            goal: Goal::Energy,
            budget: 50.0,
            currency: "GBP".into(),
            budget_period: BudgetPeriod::Week,
            cooking_style: CookingStyle::Quick,
            cuisine: "any".into(),
            favorites: String::new(),
            dislikes: String::new(),
        }
    }

    pub fn sample_plan() -> MealPlan {
        let day = r#"{"breakfast":"b","lunch":"l","dinner":"d","snacks":"s"}"#;
        let json = format!(
            r#"{{
                "weeklySchedule": {{
                    "monday": {day}, "tuesday": {day}, "wednesday": {day},
                    "thursday": {day}, "friday": {day}, "saturday": {day}, "sunday": {day}
                }},
                "recipes": [],
                "shoppingList": {{"produce": [{{"item": "greens", "price": 10.0}}]}},
                "financialBreakdown": {{"weeklyTotal": "£10.00"}}
            }}"#
        );
        extract_plan(&json).unwrap()
    }

    pub fn exercise(store: &dyn PlanStore) {
        let profile = sample_profile();
        let plan = sample_plan();

        assert!(store.list().unwrap().is_empty());

        let first = store.save("Week A", &profile, &plan).unwrap();
        let second = store.save("Week B", &profile, &plan).unwrap();
        assert_ne!(first, second);

        // Newest first.
        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "Week B");
        assert_eq!(listed[1].name, "Week A");

        let loaded = store.load(first).unwrap().expect("saved plan loads");
        assert_eq!(loaded.id, first);
        assert_eq!(loaded.name, "Week A");
        assert_eq!(loaded.user_profile.currency, "GBP");
        assert_eq!(loaded.plan_data.shopping_list.items().count(), 1);

        assert!(store.load(first + 1000).unwrap().is_none());

        store.delete(first).unwrap();
        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Week B");

        // Idempotent delete.
        store.delete(first).unwrap();

        // Ids are never reused after a delete.
        let third = store.save("Week C", &profile, &plan).unwrap();
        assert!(third > second);

        assert!(matches!(
            store.save("  ", &profile, &plan),
            Err(PlanError::InvalidName)
        ));
    }
}
