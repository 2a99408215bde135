use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use mendbot_agent::config::AgentConfig;
use mendbot_agent::{preflight, workflow};
use mendbot_model::ModelClient;
use mendbot_vcs::{GhCli, GitCli};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AgentConfig::parse();
    info!("mendbot starting");
    info!(
        "repo: {}, issue: #{}, attempt: {}",
        config.repo, config.issue, config.run_attempt
    );

    preflight::run_all(config.github_token.as_deref())?;

    let tracker = GhCli::new(&config.repo, config.github_token.clone());
    let vcs = GitCli::new(&config.work_dir, &config.bot_name, &config.bot_email);
    let generator = match &config.base_url {
        Some(base_url) => ModelClient::with_base_url(
            base_url,
            &config.api_key,
            &config.model,
            config.max_output_tokens,
            config.temperature,
        ),
        None => ModelClient::new(
            &config.api_key,
            &config.model,
            config.max_output_tokens,
            config.temperature,
        ),
    };

    match workflow::execute(
        &tracker,
        &vcs,
        &generator,
        &config.work_dir,
        config.issue,
        &config.run_attempt,
        &config.test_command,
    )
    .await
    {
        Ok(report) => {
            if let Some(pr) = &report.pull_request {
                info!("done: pull request #{} at {}", pr.number, pr.url);
            }
            Ok(())
        }
        Err(e) => {
            error!("run failed: {e}");
            Err(e)
        }
    }
}
