use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use qwatch::config::{Config, ConnectionMode, load_config, load_config_from_path};
use qwatch::dedup::FileStore;
use qwatch::monitor::Monitor;
use qwatch::notify::{Notifier, SlackNotifier, StdoutNotifier};
use qwatch::remote::runner_for;
use qwatch::report::GlyphTable;

#[derive(Parser)]
#[command(
    name = "qwatch",
    about = "Grid Engine queue monitor posting dashboards and resource alerts to Slack"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the last posted reports
    #[arg(long, env = "QWATCH_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Repeat a cycle every N seconds instead of running once
    #[arg(long, conflicts_with = "once")]
    interval: Option<u64>,

    /// Run a single cycle and exit (the default)
    #[arg(long, default_value_t = false)]
    once: bool,

    /// Print messages to stdout instead of posting them
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Use ASCII markers instead of the Slack emoji
    #[arg(long, default_value_t = false)]
    plain_glyphs: bool,

    /// Run commands on this machine instead of over ssh
    #[arg(long, default_value_t = false)]
    local: bool,

    /// Give up after this many attempts on transport faults (0 = never)
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Emit logs as JSON lines
    #[arg(long, default_value_t = false)]
    log_json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    qwatch::logging::init(cli.log_json)?;

    let config = load_config_for_cli(&cli);
    validate(&config, cli.dry_run)?;

    let notifier: Box<dyn Notifier> = if cli.dry_run {
        Box::new(StdoutNotifier::default())
    } else {
        Box::new(SlackNotifier::from_config(&config.slack)?)
    };
    let store = FileStore::new(config.state.resolve_dir());
    tracing::info!(state_dir = %store.dir().display(), dry_run = cli.dry_run, "starting qwatch");

    let runner = runner_for(&config.connection);
    let mut monitor = Monitor::new(config, runner, notifier, store);
    if cli.plain_glyphs {
        monitor = monitor.with_glyphs(GlyphTable::plain());
    }

    let interval = if cli.once { None } else { cli.interval };
    match interval {
        Some(0) => Err(eyre!("--interval must be greater than 0")),
        Some(secs) => Ok(monitor.run_periodic(Duration::from_secs(secs)).await?),
        None => {
            monitor.run_with_retry().await?;
            Ok(())
        }
    }
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(ref dir) = cli.state_dir {
        config.state.dir = Some(dir.clone());
    }
    if let Some(attempts) = cli.max_attempts {
        config.retry.max_attempts = attempts;
    }
    if cli.local {
        config.connection.mode = ConnectionMode::Local;
    }

    config
}

fn validate(config: &Config, dry_run: bool) -> Result<()> {
    config.validate()?;
    if !dry_run
        && config.user_report.enabled
        && std::env::var_os(&config.slack.webhook_env).is_none()
    {
        return Err(eyre!(
            "user_report is enabled but {} is not set",
            config.slack.webhook_env
        ));
    }
    Ok(())
}
