//! Issue and pull-request operations via the `gh` command-line tool.

use std::process::Output;

use async_trait::async_trait;
use mendbot_core::{AgentError, IssueRef};
use serde::Deserialize;
use tokio::process::Command;
use tracing::info;

use crate::{IssueTrackerClient, PullRequest, PullRequestDraft};

/// Talks to the hosting service through `gh`, scoped to one repository.
pub struct GhCli {
    repo: String,
    token: Option<String>,
}

impl GhCli {
    /// `repo` is the full identifier, e.g. "owner/name". The token, when
    /// present, is handed to `gh` as `GH_TOKEN`.
    pub fn new(repo: &str, token: Option<String>) -> Self {
        Self {
            repo: repo.to_string(),
            token,
        }
    }

    fn apply_token(&self, cmd: &mut Command) {
        if let Some(token) = &self.token {
            cmd.env("GH_TOKEN", token);
        }
    }

    async fn gh(&self, args: &[&str]) -> Result<Output, AgentError> {
        let mut cmd = Command::new("gh");
        cmd.args(args);
        self.apply_token(&mut cmd);

        let output = cmd
            .output()
            .await
            .map_err(|e| AgentError::ExternalTool(format!("failed to spawn gh: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AgentError::ExternalTool(format!(
                "gh {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }
        Ok(output)
    }
}

#[derive(Debug, Deserialize)]
struct IssueView {
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    labels: Vec<IssueLabel>,
}

#[derive(Debug, Deserialize)]
struct IssueLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RepoView {
    #[serde(rename = "defaultBranchRef")]
    default_branch_ref: Option<BranchRef>,
}

#[derive(Debug, Deserialize)]
struct BranchRef {
    name: String,
}

/// Parse `gh issue view --json title,body,labels` output.
fn parse_issue_view(number: u64, raw: &str) -> Result<IssueRef, AgentError> {
    let view: IssueView = serde_json::from_str(raw)
        .map_err(|e| AgentError::ExternalTool(format!("unparseable gh issue output: {e}")))?;
    Ok(IssueRef {
        number,
        title: view.title,
        body: view.body,
        labels: view.labels.into_iter().map(|label| label.name).collect(),
    })
}

/// Parse `gh repo view --json defaultBranchRef` output.
fn parse_default_branch(raw: &str) -> Result<String, AgentError> {
    let view: RepoView = serde_json::from_str(raw)
        .map_err(|e| AgentError::ExternalTool(format!("unparseable gh repo output: {e}")))?;
    view.default_branch_ref
        .map(|branch| branch.name)
        .ok_or_else(|| AgentError::ExternalTool("repository has no default branch".to_string()))
}

/// Pull the PR number out of the URL `gh pr create` prints.
fn parse_pr_number(url: &str) -> Result<u64, AgentError> {
    url.rsplit('/')
        .next()
        .and_then(|tail| tail.parse::<u64>().ok())
        .ok_or_else(|| AgentError::ExternalTool(format!("unexpected pull request URL: {url}")))
}

#[async_trait]
impl IssueTrackerClient for GhCli {
    async fn fetch_issue(&self, number: u64) -> Result<IssueRef, AgentError> {
        let number_arg = number.to_string();
        let output = self
            .gh(&[
                "issue",
                "view",
                &number_arg,
                "--repo",
                &self.repo,
                "--json",
                "title,body,labels",
            ])
            .await?;

        let issue = parse_issue_view(number, &String::from_utf8_lossy(&output.stdout))?;
        info!("fetched issue #{number}: {}", issue.title);
        Ok(issue)
    }

    async fn default_branch(&self) -> Result<String, AgentError> {
        let output = self
            .gh(&["repo", "view", &self.repo, "--json", "defaultBranchRef"])
            .await?;
        parse_default_branch(&String::from_utf8_lossy(&output.stdout))
    }

    async fn create_pull_request(
        &self,
        draft: &PullRequestDraft,
    ) -> Result<PullRequest, AgentError> {
        let output = self
            .gh(&[
                "pr",
                "create",
                "--repo",
                &self.repo,
                "--title",
                &draft.title,
                "--body",
                &draft.body,
                "--head",
                &draft.head,
                "--base",
                &draft.base,
            ])
            .await?;

        let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let number = parse_pr_number(&url)?;
        info!("created pull request #{number}: {url}");
        Ok(PullRequest {
            number,
            url,
            branch: draft.head.clone(),
        })
    }
}
