//! Applying a generated diff to the working tree.

use std::io::Write;
use std::path::Path;

use mendbot_core::AgentError;
use tokio::process::Command;
use tracing::info;

/// Write the diff to a scoped temporary file and apply it with
/// `git apply --whitespace=fix`. The file is removed when the handle
/// drops, whether the apply passed or not.
pub async fn apply_patch(work_dir: &Path, diff: &str) -> Result<(), AgentError> {
    let mut file = tempfile::Builder::new()
        .prefix("mendbot-")
        .suffix(".patch")
        .tempfile()
        .map_err(|e| AgentError::ExternalTool(format!("failed to create patch file: {e}")))?;

    file.write_all(diff.as_bytes())
        .map_err(|e| AgentError::ExternalTool(format!("failed to write patch file: {e}")))?;
    if !diff.ends_with('\n') {
        file.write_all(b"\n")
            .map_err(|e| AgentError::ExternalTool(format!("failed to write patch file: {e}")))?;
    }
    file.flush()
        .map_err(|e| AgentError::ExternalTool(format!("failed to write patch file: {e}")))?;

    let output = Command::new("git")
        .arg("apply")
        .arg("--whitespace=fix")
        .arg(file.path())
        .current_dir(work_dir)
        .output()
        .await
        .map_err(|e| AgentError::ExternalTool(format!("failed to spawn git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AgentError::PatchApply(format!(
            "git apply rejected the diff: {}",
            stderr.trim()
        )));
    }

    info!("applied patch ({} bytes)", diff.len());
    Ok(())
}
