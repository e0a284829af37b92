use crate::config::Config;
use crate::error::Result;
use crate::remote::CommandRunner;

use super::snapshot::RawStatus;

/// Runs the fixed command set of a poll cycle, in order.
pub struct Collector<'a, R> {
    runner: &'a R,
    config: &'a Config,
}

impl<'a, R: CommandRunner> Collector<'a, R> {
    pub fn new(runner: &'a R, config: &'a Config) -> Self {
        Collector { runner, config }
    }

    /// Any transport fault aborts the whole collection; nothing is returned
    /// for a partially fetched cycle.
    #[tracing::instrument(name = "collector.collect", level = "debug", skip_all)]
    pub async fn collect(&self) -> Result<RawStatus> {
        let commands = &self.config.commands;

        let hosts = self.runner.run(&commands.host_status).await?;
        let jobs = self.runner.run(&commands.job_table).await?;
        let full_status = self.runner.run(&commands.full_status).await?;
        let queue_listing = self.runner.run(&commands.queue_listing).await?;
        let user_listing = match self.config.user_listing_command() {
            Some(command) => Some(self.runner.run(&command).await?),
            None => None,
        };

        Ok(RawStatus {
            full_status,
            queue_listing,
            hosts,
            jobs,
            user_listing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::testing::ScriptedRunner;

    #[tokio::test]
    async fn runs_commands_in_fixed_order() {
        let mut config = Config::default();
        config.commands.host_status = "qhost".to_string();
        config.commands.job_table = "qstat | tail -n +3".to_string();
        config.commands.full_status = "qstat -f".to_string();
        config.commands.queue_listing = "qstat".to_string();
        config.user_report.enabled = true;
        config.user_report.user = Some("alice".to_string());
        config.user_report.excluded_nodes.clear();

        let runner = ScriptedRunner::new()
            .respond("qhost", "H")
            .respond("qstat | tail -n +3", "J")
            .respond("qstat -f", "F")
            .respond("qstat", "Q")
            .respond("qstat -u alice", "U");

        let raw = Collector::new(&runner, &config).collect().await.unwrap();
        assert_eq!(raw.hosts, "H");
        assert_eq!(raw.jobs, "J");
        assert_eq!(raw.full_status, "F");
        assert_eq!(raw.queue_listing, "Q");
        assert_eq!(raw.user_listing.as_deref(), Some("U"));
        assert_eq!(
            runner.calls(),
            vec!["qhost", "qstat | tail -n +3", "qstat -f", "qstat", "qstat -u alice"]
        );
    }

    #[tokio::test]
    async fn transport_fault_aborts_collection() {
        let config = Config::default();
        let runner = ScriptedRunner::new().fail(&config.commands.job_table);
        let err = Collector::new(&runner, &config).collect().await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(runner.calls().len(), 2);
    }
}
