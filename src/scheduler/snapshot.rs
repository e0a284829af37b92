use crate::config::ParsingConfig;
use crate::error::Result;

use super::host::{HOST_SCHEMA, NodeStatus, parse_hosts};
use super::job::{JOB_SCHEMA, JobRow, parse_jobs};
use super::queue::{QueueBlock, parse_queue_blocks};

/// Command outputs of one poll cycle, collected in full before any parsing.
#[derive(Debug, Clone, Default)]
pub struct RawStatus {
    /// `qstat -f`
    pub full_status: String,
    /// `qstat`
    pub queue_listing: String,
    /// `qhost`
    pub hosts: String,
    /// `qstat` without its header lines
    pub jobs: String,
    /// `qstat -u <user>`, when the user report is enabled
    pub user_listing: Option<String>,
}

/// Typed view of the cluster for one cycle.
#[derive(Debug, Clone)]
pub struct ClusterSnapshot {
    pub hosts: Vec<NodeStatus>,
    pub jobs: Vec<JobRow>,
    pub queues: Vec<QueueBlock>,
}

impl ClusterSnapshot {
    /// Fails on the first data-quality error so no report is built from a
    /// partially understood feed.
    pub fn parse(raw: &RawStatus, parsing: &ParsingConfig) -> Result<Self> {
        let hosts = parse_hosts(
            &raw.hosts,
            HOST_SCHEMA.with_header_lines(parsing.host_header_lines),
        )?;
        let jobs = parse_jobs(
            &raw.jobs,
            JOB_SCHEMA.with_header_lines(parsing.job_header_lines),
        )?;
        let queues = parse_queue_blocks(&raw.full_status, &parsing.node_prefix)?;

        tracing::debug!(
            hosts = hosts.len(),
            jobs = jobs.len(),
            queues = queues.len(),
            "parsed cluster snapshot"
        );

        Ok(ClusterSnapshot {
            hosts,
            jobs,
            queues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn raw() -> RawStatus {
        RawStatus {
            full_status: "----------\nall.q@compute-0-0 BIP 0/4/4 4.0 lx\n 1 0.5 a alice r d t 4\n"
                .to_string(),
            queue_listing: String::new(),
            hosts: "h\n-\nglobal\ncompute-0-0 lx 4 4.0 8G 1G 1G 0\n".to_string(),
            jobs: "1 0.5 a alice r 10/19/2026 09:00:00 all.q@compute-0-0 4\n".to_string(),
            user_listing: None,
        }
    }

    #[test]
    fn parses_all_three_tables() {
        let snapshot = ClusterSnapshot::parse(&raw(), &ParsingConfig::default()).unwrap();
        assert_eq!(snapshot.hosts.len(), 1);
        assert_eq!(snapshot.jobs.len(), 1);
        assert_eq!(snapshot.queues.len(), 1);
    }

    #[test]
    fn any_bad_table_aborts_the_snapshot() {
        let mut bad = raw();
        bad.hosts = "h\n-\nglobal\ncompute-0-0 lx 4 4.0 8X 1G 1G 0\n".to_string();
        let err = ClusterSnapshot::parse(&bad, &ParsingConfig::default()).unwrap_err();
        assert!(matches!(err, Error::UnitCoercion { .. }));
    }
}
