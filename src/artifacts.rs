use std::path::{Path, PathBuf};

use fs_err as fs;
use uuid::Uuid;

use crate::prompt::PromptBlocks;

/// Save one generation stage's prompt blocks and raw model response under
/// `<root>/<request-id>/`. Best-effort debugging aid; callers log failures
/// instead of failing the request.
pub fn save_stage(
    root: &Path,
    request_id: Uuid,
    stage: &str,
    blocks: &PromptBlocks,
    raw_response: &str,
) -> anyhow::Result<PathBuf> {
    let dir = root.join(request_id.to_string());
    fs::create_dir_all(&dir)?;

    let prompt = format!("{}\n\n----- user -----\n\n{}", blocks.system, blocks.user);
    fs::write(dir.join(format!("{stage}.prompt.txt")), prompt)?;
    fs::write(dir.join(format!("{stage}.response.txt")), raw_response)?;
    Ok(dir)
}
