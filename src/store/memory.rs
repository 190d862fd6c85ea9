use chrono::Utc;
use parking_lot::Mutex;

use super::{validate_name, PlanStore, PlanSummary, SavedPlan};
use crate::errors::PlanError;
use crate::model::MealPlan;
use crate::profile::Profile;

/// In-process backend with the same semantics as the SQLite store. Used in
/// tests and when no database path is configured; in that mode the web
/// client keeps its own copy in browser storage, so losing this on restart
/// mirrors the reference deployment.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    plans: Vec<SavedPlan>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlanStore for MemoryStore {
    fn save(&self, name: &str, profile: &Profile, plan: &MealPlan) -> Result<i64, PlanError> {
        validate_name(name)?;
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.plans.push(SavedPlan {
            id,
            name: name.to_string(),
            user_profile: profile.clone(),
            plan_data: plan.clone(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    fn list(&self) -> Result<Vec<PlanSummary>, PlanError> {
        let inner = self.inner.lock();
        // Insertion order is creation order, so newest-first is a reverse.
        Ok(inner
            .plans
            .iter()
            .rev()
            .map(|p| PlanSummary {
                id: p.id,
                name: p.name.clone(),
                created_at: p.created_at,
            })
            .collect())
    }

    fn load(&self, id: i64) -> Result<Option<SavedPlan>, PlanError> {
        let inner = self.inner.lock();
        Ok(inner.plans.iter().find(|p| p.id == id).cloned())
    }

    fn delete(&self, id: i64) -> Result<(), PlanError> {
        let mut inner = self.inner.lock();
        inner.plans.retain(|p| p.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    #[test]
    fn satisfies_the_store_contract() {
        let store = MemoryStore::new();
        contract::exercise(&store);
    }
}
