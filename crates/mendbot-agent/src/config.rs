use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "mendbot", about = "Turns tracker issues into pull requests")]
pub struct AgentConfig {
    /// Issue number to work on
    #[arg(long, env = "ISSUE_NUMBER")]
    pub issue: u64,

    /// Full repository identifier, e.g. "owner/name"
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repo: String,

    /// API key for the model provider
    #[arg(long, env = "ANTHROPIC_API_KEY")]
    pub api_key: String,

    /// CI run attempt; re-runs get their own branch names
    #[arg(long, env = "GITHUB_RUN_ATTEMPT", default_value = "1")]
    pub run_attempt: String,

    /// Token for the hosting CLI, handed to gh as GH_TOKEN
    #[arg(long, env = "GITHUB_TOKEN")]
    pub github_token: Option<String>,

    /// Model to request patches from
    #[arg(long, env = "MENDBOT_MODEL", default_value = "claude-sonnet-4")]
    pub model: String,

    /// Output-token bound for the model call
    #[arg(long, env = "MENDBOT_MAX_OUTPUT_TOKENS", default_value = "8192")]
    pub max_output_tokens: u32,

    /// Sampling temperature; low keeps patches conservative
    #[arg(long, env = "MENDBOT_TEMPERATURE", default_value = "0.2")]
    pub temperature: f32,

    /// Override the model endpoint base URL, e.g. to go through a proxy
    #[arg(long, env = "ANTHROPIC_BASE_URL")]
    pub base_url: Option<String>,

    /// Project test command; skipped when its program is not installed
    #[arg(long, env = "MENDBOT_TEST_COMMAND", default_value = "pytest -q")]
    pub test_command: String,

    /// Directory containing the checked-out working tree
    #[arg(long, env = "MENDBOT_WORK_DIR", default_value = ".")]
    pub work_dir: PathBuf,

    /// Committer name for agent commits
    #[arg(long, default_value = "mendbot")]
    pub bot_name: String,

    /// Committer email for agent commits
    #[arg(long, default_value = "mendbot[bot]@users.noreply.github.com")]
    pub bot_email: String,
}
