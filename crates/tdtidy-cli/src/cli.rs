use anyhow::Context;
use clap::{Parser, Subcommand};
use tdtidy_core::Orchestrator;
use tdtidy_core::domain::{Action, RetentionOptions};
use tdtidy_core::ports::{IntervalPacer, SystemClock};
use tdtidy_ecs::{EcsRegistry, EcsRegistryConfig};

/// tdtidy — deregister and delete old ECS task definitions
#[derive(Debug, Parser)]
#[command(name = "tdtidy", version, about)]
pub struct Cli {
    /// Turn on dry-run. List the target task definitions without changing them.
    #[arg(long, global = true, env = "TDTIDY_DRY_RUN")]
    dry_run: bool,

    /// Retention period for task definitions, in days
    #[arg(long, global = true, env = "TDTIDY_RETENTION_PERIOD", default_value_t = 0)]
    retention_period: u32,

    /// Only consider task definitions whose family starts with this prefix
    #[arg(long, global = true, env = "TDTIDY_FAMILY_PREFIX", default_value = "")]
    family_prefix: String,

    /// AWS region (defaults to the standard provider chain)
    #[arg(long, global = true)]
    region: Option<String>,

    /// Custom ECS endpoint URL (e.g. localstack)
    #[arg(long, global = true, env = "TDTIDY_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, env = "TDTIDY_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Command {
    /// Deregister active task definitions, keeping the latest revision of each family
    Deregister,
    /// Delete inactive task definitions
    Delete,
    /// Deregister, then delete
    All,
}

impl Command {
    fn actions(self) -> &'static [Action] {
        match self {
            Command::Deregister => &[Action::Deregister],
            Command::Delete => &[Action::Delete],
            Command::All => &Action::ALL,
        }
    }
}

impl Cli {
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    fn options(&self) -> RetentionOptions {
        RetentionOptions::new(self.dry_run, self.retention_period)
            .with_family_prefix(self.family_prefix.as_str())
    }

    fn registry_config(&self) -> EcsRegistryConfig {
        EcsRegistryConfig {
            region: self.region.clone(),
            endpoint_url: self.endpoint_url.clone(),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let registry = EcsRegistry::new(self.registry_config()).await;
        let orchestrator = Orchestrator::new(
            registry,
            &SystemClock,
            IntervalPacer::default(),
            self.options(),
        )?;
        tracing::info!(threshold = %orchestrator.threshold().to_rfc3339(), "threshold datetime");

        for &action in self.command.actions() {
            let report = orchestrator
                .run(action)
                .await
                .with_context(|| format!("{action} failed"))?;
            print!("{report}");
        }
        Ok(())
    }
}
