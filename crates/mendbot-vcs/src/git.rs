//! Git operations via the `git` command-line tool.

use std::path::{Path, PathBuf};
use std::process::Output;

use async_trait::async_trait;
use mendbot_core::AgentError;
use tokio::process::Command;
use tracing::info;

use crate::{PushMode, VersionControlClient};

/// Runs git against one working tree, committing as a fixed bot
/// identity.
pub struct GitCli {
    work_dir: PathBuf,
    bot_name: String,
    bot_email: String,
}

impl GitCli {
    pub fn new(work_dir: &Path, bot_name: &str, bot_email: &str) -> Self {
        Self {
            work_dir: work_dir.to_path_buf(),
            bot_name: bot_name.to_string(),
            bot_email: bot_email.to_string(),
        }
    }

    /// Run git with the given args. Nonzero exit becomes an error with
    /// stderr folded into the message.
    async fn git(&self, args: &[&str]) -> Result<Output, AgentError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .await
            .map_err(|e| AgentError::ExternalTool(format!("failed to spawn git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AgentError::ExternalTool(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }
        Ok(output)
    }
}

#[async_trait]
impl VersionControlClient for GitCli {
    async fn checkout_branch(&self, branch: &str) -> Result<(), AgentError> {
        self.git(&["checkout", "-B", branch]).await?;
        info!("checked out branch {branch}");
        Ok(())
    }

    async fn commit_all(&self, message: &str) -> Result<(), AgentError> {
        self.git(&["config", "user.name", &self.bot_name]).await?;
        self.git(&["config", "user.email", &self.bot_email]).await?;
        self.git(&["add", "-A"]).await?;

        let status = self.git(&["status", "--porcelain"]).await?;
        if status.stdout.is_empty() {
            info!("nothing to commit, working tree clean");
            return Ok(());
        }

        self.git(&["commit", "-m", message]).await?;
        info!("committed changes: {message}");
        Ok(())
    }

    async fn push(&self, branch: &str, mode: PushMode) -> Result<(), AgentError> {
        let mut args = vec!["push", "-u", "origin", branch];
        match mode {
            PushMode::Tracking => {}
            PushMode::ForceWithLease => args.push("--force-with-lease"),
            PushMode::Force => args.push("--force"),
        }
        self.git(&args).await?;
        info!("pushed {branch} ({mode})");
        Ok(())
    }

    async fn fetch_remote(&self, branch: &str) -> Result<(), AgentError> {
        self.git(&["fetch", "origin", branch]).await?;
        Ok(())
    }

    async fn rebase(&self, branch: &str) -> Result<(), AgentError> {
        let upstream = format!("origin/{branch}");
        self.git(&["rebase", &upstream]).await?;
        info!("rebased onto {upstream}");
        Ok(())
    }
}
