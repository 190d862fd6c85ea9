use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::errors::PlanError;
use crate::model::MealPlan;
use crate::profile::Profile;
use crate::store::{PlanSummary, SavedPlan};

/// CRUD over saved plans, backed by the configured `PlanStore`.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub name: String,
    pub user_profile: Profile,
    pub plan_data: MealPlan,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub plans: Vec<PlanSummary>,
}

#[derive(Debug, Serialize)]
pub struct LoadResponse {
    pub success: bool,
    pub plan: SavedPlan,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveRequest>,
) -> Result<Json<SaveResponse>, PlanError> {
    let id = state
        .store
        .save(&req.name, &req.user_profile, &req.plan_data)?;
    tracing::info!(id, name = %req.name, "saved meal plan");
    Ok(Json(SaveResponse { success: true, id }))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListResponse>, PlanError> {
    let plans = state.store.list()?;
    Ok(Json(ListResponse {
        success: true,
        plans,
    }))
}

pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<LoadResponse>, PlanError> {
    let plan = state.store.load(id)?.ok_or(PlanError::NotFound(id))?;
    Ok(Json(LoadResponse {
        success: true,
        plan,
    }))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, PlanError> {
    state.store.delete(id)?;
    tracing::info!(id, "deleted meal plan");
    Ok(Json(DeleteResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptBlocks;
    use crate::provider::Provider;
    use crate::store::contract;
    use crate::store::memory::MemoryStore;
    use async_trait::async_trait;

    struct NoProvider;

    #[async_trait]
    impl Provider for NoProvider {
        async fn generate(&self, _blocks: &PromptBlocks) -> Result<String, PlanError> {
            Err(PlanError::Configuration("GEMINI_API_KEY not configured".into()))
        }
    }

    fn state() -> Arc<AppState> {
        Arc::new(AppState {
            provider: Box::new(NoProvider),
            store: Box::new(MemoryStore::new()),
            artifacts_dir: None,
        })
    }

    #[tokio::test]
    async fn save_list_delete_round_trip() {
        let state = state();
        let req = SaveRequest {
            name: "Week A".into(),
            user_profile: contract::sample_profile(),
            plan_data: contract::sample_plan(),
        };
        let Json(saved) = create(State(state.clone()), Json(req)).await.unwrap();
        assert!(saved.success);

        let Json(listed) = list(State(state.clone())).await.unwrap();
        assert_eq!(listed.plans.len(), 1);
        assert_eq!(listed.plans[0].name, "Week A");

        let Json(loaded) = get_one(State(state.clone()), Path(saved.id)).await.unwrap();
        assert_eq!(loaded.plan.name, "Week A");

        let Json(deleted) = remove(State(state.clone()), Path(saved.id)).await.unwrap();
        assert!(deleted.success);
        // Idempotent second delete.
        remove(State(state.clone()), Path(saved.id)).await.unwrap();

        let err = get_one(State(state), Path(saved.id)).await.unwrap_err();
        assert!(matches!(err, PlanError::NotFound(_)));
    }

    #[tokio::test]
    async fn missing_plan_maps_to_not_found() {
        let err = get_one(State(state()), Path(999)).await.unwrap_err();
        assert!(matches!(err, PlanError::NotFound(999)));
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let req = SaveRequest {
            name: "   ".into(),
            user_profile: contract::sample_profile(),
            plan_data: contract::sample_plan(),
        };
        let err = create(State(state()), Json(req)).await.unwrap_err();
        assert!(matches!(err, PlanError::InvalidName));
    }
}
