use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use super::AppState;
use crate::errors::PlanError;
use crate::model::MealPlan;
use crate::pipeline;
use crate::profile::Profile;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub plan: MealPlan,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// `POST /api/generate` with body `{ "profile": Profile }`.
///
/// The body is pulled apart by hand so every failure, including a bad
/// profile shape, comes back in the `{success:false, error}` envelope
/// rather than an extractor rejection.
pub async fn handle(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<GenerateResponse>, PlanError> {
    let profile_value = body
        .get("profile")
        .cloned()
        .ok_or_else(|| PlanError::InvalidProfile("missing \"profile\" in request body".into()))?;
    let profile: Profile = serde_json::from_value(profile_value)
        .map_err(|e| PlanError::InvalidProfile(e.to_string()))?;

    let generated = pipeline::generate_plan(
        state.provider.as_ref(),
        &profile,
        state.artifacts_dir.as_deref(),
    )
    .await?;

    Ok(Json(GenerateResponse {
        success: true,
        plan: generated.plan,
        warnings: generated.warnings,
    }))
}
