use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::info;

/// Run all preflight checks before touching the working tree.
pub fn run_all(github_token: Option<&str>) -> Result<()> {
    check_git()?;
    check_gh_cli()?;
    check_gh_auth(github_token)?;
    info!("all preflight checks passed");
    Ok(())
}

fn check_git() -> Result<()> {
    let output = Command::new("git")
        .arg("--version")
        .output()
        .context("git is not installed. Install git and try again.")?;
    if !output.status.success() {
        bail!("git --version failed");
    }
    let version = String::from_utf8_lossy(&output.stdout);
    info!("git: {}", version.trim());
    Ok(())
}

fn check_gh_cli() -> Result<()> {
    let output = Command::new("gh")
        .arg("--version")
        .output()
        .context("GitHub CLI (gh) is not installed. Install it: https://cli.github.com")?;
    if !output.status.success() {
        bail!("gh --version failed");
    }
    let version = String::from_utf8_lossy(&output.stdout);
    info!("gh: {}", version.lines().next().unwrap_or("").trim());
    Ok(())
}

fn check_gh_auth(github_token: Option<&str>) -> Result<()> {
    let mut cmd = Command::new("gh");
    cmd.args(["auth", "status"]);
    if let Some(token) = github_token {
        cmd.env("GH_TOKEN", token);
    }
    let output = cmd.output().context("failed to check gh auth status")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "GitHub CLI not authenticated. Pass --github-token or run: gh auth login\nDetails: {}",
            stderr.trim()
        );
    }
    info!("gh: authenticated");
    Ok(())
}
