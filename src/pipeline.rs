use std::path::Path;

use chrono::Utc;
use uuid::Uuid;

use crate::artifacts;
use crate::audit;
use crate::errors::PlanError;
use crate::extract;
use crate::model::MealPlan;
use crate::profile::Profile;
use crate::prompt::{self, PromptStyle, VarietyFactors};
use crate::provider::Provider;

/// An accepted plan plus the non-fatal audit report and the variety factors
/// that seeded the prompt.
#[derive(Debug)]
pub struct GeneratedPlan {
    pub plan: MealPlan,
    pub warnings: Vec<String>,
    pub factors: VarietyFactors,
}

/// Run the full generation pipeline for one request: prompt, provider call,
/// extraction, audit. A malformed or schema-violating response gets exactly
/// one retry with the strict prompt before the failure is surfaced.
pub async fn generate_plan(
    provider: &dyn Provider,
    profile: &Profile,
    artifacts_dir: Option<&Path>,
) -> Result<GeneratedPlan, PlanError> {
    profile.validate()?;

    let request_id = Uuid::new_v4();
    let factors = VarietyFactors::sample(Utc::now(), &mut rand::thread_rng());
    tracing::info!(
        %request_id,
        season = factors.season,
        theme = factors.theme,
        seed = factors.seed,
        "generating meal plan"
    );

    let blocks = prompt::build(profile, &factors, PromptStyle::Standard);
    let raw = provider.generate(&blocks).await?;
    save_artifacts(artifacts_dir, request_id, "standard", &blocks, &raw);

    let plan = match extract::extract_plan(&raw) {
        Ok(plan) => plan,
        Err(e @ (PlanError::Malformed(_) | PlanError::Schema(_))) => {
            tracing::warn!(%request_id, error = %e, "unusable response, retrying with strict prompt");
            let strict = prompt::build(profile, &factors, PromptStyle::Strict);
            let raw = provider.generate(&strict).await?;
            save_artifacts(artifacts_dir, request_id, "strict", &strict, &raw);
            extract::extract_plan(&raw)?
        }
        Err(e) => return Err(e),
    };

    let warnings = audit::audit(&plan, profile);
    for w in &warnings {
        tracing::warn!(%request_id, warning = %w, "constraint audit");
    }

    Ok(GeneratedPlan {
        plan,
        warnings,
        factors,
    })
}

fn save_artifacts(
    root: Option<&Path>,
    request_id: Uuid,
    stage: &str,
    blocks: &prompt::PromptBlocks,
    raw: &str,
) {
    if let Some(root) = root {
        if let Err(e) = artifacts::save_stage(root, request_id, stage, blocks, raw) {
            tracing::warn!(%request_id, stage, error = %e, "failed to save artifacts");
        }
    }
}
