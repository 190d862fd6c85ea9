use async_trait::async_trait;

use crate::config::Config;
use crate::errors::PlanError;
use crate::prompt::PromptBlocks;

pub mod gemini;

/// A text-generation backend. One attempt per call; retry policy belongs to
/// the pipeline, not the provider.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn generate(&self, blocks: &PromptBlocks) -> Result<String, PlanError>;
}

pub type DynProvider = Box<dyn Provider>;

/// Build the configured provider. The API key may be absent at startup;
/// the provider then fails each request with a configuration error, which
/// matches the reference server's behavior.
pub fn make_provider(cfg: &Config, api_key: Option<String>) -> Result<DynProvider, PlanError> {
    Ok(Box::new(gemini::Gemini::new(
        cfg.model.clone(),
        cfg.api_base.clone(),
        api_key,
        cfg.timeout_secs,
    )?))
}
