use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::monitor::retry::{Backoff, RetryPolicy};
use crate::report::glyph::GlyphTable;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub commands: CommandsConfig,
    pub parsing: ParsingConfig,
    pub slack: SlackConfig,
    pub thresholds: ThresholdsConfig,
    pub retry: RetryConfig,
    pub state: StateConfig,
    pub dashboard: DashboardConfig,
    pub user_report: UserReportConfig,
    pub secondary_check: SecondaryCheckConfig,
    pub glyphs: GlyphTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    Ssh,
    Local,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub mode: ConnectionMode,
    pub user: String,
    /// Jump host; empty connects to `machine` directly.
    pub gateway: String,
    pub machine: String,
    pub port: u16,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            mode: ConnectionMode::Ssh,
            user: String::new(),
            gateway: String::new(),
            machine: String::new(),
            port: 22,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    pub full_status: String,
    pub queue_listing: String,
    pub host_status: String,
    pub job_table: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        CommandsConfig {
            full_status: "/usr/sge/bin/linux-x64/qstat -f".to_string(),
            queue_listing: "/usr/sge/bin/linux-x64/qstat".to_string(),
            host_status: "/usr/sge/bin/linux-x64/qhost".to_string(),
            job_table: "/usr/sge/bin/linux-x64/qstat | tail -n +3".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Host name prefix of the queue instances shown on the dashboard.
    pub node_prefix: String,
    pub host_header_lines: usize,
    pub job_header_lines: usize,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        ParsingConfig {
            node_prefix: "compute-".to_string(),
            host_header_lines: 3,
            job_header_lines: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    pub api_url: String,
    pub channel: String,
    pub username: String,
    pub icon: String,
    /// Environment variable holding the bot token.
    pub token_env: String,
    /// Environment variable holding the incoming-webhook URL.
    pub webhook_env: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        SlackConfig {
            api_url: "https://slack.com/api/chat.postMessage".to_string(),
            channel: String::new(),
            username: "mirai".to_string(),
            icon: ":ssh-mirai:".to_string(),
            token_env: "LAB_TOKEN".to_string(),
            webhook_env: "WEB_HOOK_URL".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ThresholdsConfig {
    /// Memory use (percent of `max_mem`) above which jobs are warned.
    pub memory_percent: f64,
    /// Load above the core count at which jobs are warned.
    pub cpu_excess: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        ThresholdsConfig {
            memory_percent: 95.0,
            cpu_excess: 1.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub cooldown_secs: u64,
    /// Exponential growth factor; 1 keeps the cooldown fixed.
    pub backoff_factor: u32,
    pub max_cooldown_secs: u64,
    /// 0 retries forever.
    pub max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            cooldown_secs: 180,
            backoff_factor: 1,
            max_cooldown_secs: 1800,
            max_attempts: 0,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        let base = Duration::from_secs(self.cooldown_secs);
        let backoff = if self.backoff_factor <= 1 {
            Backoff::Fixed(base)
        } else {
            Backoff::Exponential {
                base,
                factor: self.backoff_factor,
                max: Duration::from_secs(self.max_cooldown_secs),
            }
        };
        RetryPolicy {
            backoff,
            max_attempts: (self.max_attempts > 0).then_some(self.max_attempts),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Directory for the last-posted reports; defaults to the user data dir.
    pub dir: Option<PathBuf>,
}

impl StateConfig {
    pub fn resolve_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .or_else(|| dirs::data_dir().map(|p| p.join("qwatch")))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Post the raw `qstat -f` output under the dashboard.
    pub post_full_status: bool,
    /// Suppress the dashboard when it is identical to the last one.
    pub dedup: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            post_full_status: true,
            dedup: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UserReportConfig {
    pub enabled: bool,
    /// Defaults to `connection.user`.
    pub user: Option<String>,
    pub label: String,
    pub excluded_nodes: Vec<String>,
}

impl Default for UserReportConfig {
    fn default() -> Self {
        UserReportConfig {
            enabled: false,
            user: None,
            label: "mirai".to_string(),
            excluded_nodes: vec!["compute-3-1".to_string()],
        }
    }
}

impl Config {
    /// Reject settings that would make a cycle run against the wrong target.
    pub fn validate(&self) -> Result<()> {
        if self.connection.mode == ConnectionMode::Ssh && self.connection.machine.is_empty() {
            return Err(Error::Config(
                "connection.machine is not set; configure it or pass --local to run on this host"
                    .to_string(),
            ));
        }
        if self.secondary_check.enabled && self.secondary_check.commands.is_empty() {
            return Err(Error::Config(
                "secondary_check is enabled but has no commands".to_string(),
            ));
        }
        if self.user_report.enabled && self.listing_user().is_empty() {
            return Err(Error::Config(
                "user_report is enabled but neither user_report.user nor connection.user is set"
                    .to_string(),
            ));
        }
        Ok(())
    }

    fn listing_user(&self) -> &str {
        self.user_report
            .user
            .as_deref()
            .unwrap_or(&self.connection.user)
    }

    /// `qstat -u <user>` with one `grep -v` per excluded node.
    pub fn user_listing_command(&self) -> Option<String> {
        if !self.user_report.enabled {
            return None;
        }
        let user = self.listing_user();
        let mut command = format!("{} -u {}", self.commands.queue_listing, user);
        for node in &self.user_report.excluded_nodes {
            let _ = write!(command, " | grep -v {node}");
        }
        Some(command)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SecondaryCheckConfig {
    pub enabled: bool,
    /// Joined into one script and run in a single session, so shell state carries
    /// from one line to the next. The script's output is reported.
    pub commands: Vec<String>,
    pub timeout_secs: u64,
    pub username: String,
    pub icon: String,
}

impl Default for SecondaryCheckConfig {
    fn default() -> Self {
        SecondaryCheckConfig {
            enabled: false,
            commands: Vec::new(),
            timeout_secs: 60,
            username: "date".to_string(),
            icon: ":datem:".to_string(),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("qwatch").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), %err, "invalid config, using defaults");
            Config::default()
        }),
        Err(_) => Config::default(),
    }
}
