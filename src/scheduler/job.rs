use crate::error::Result;

use super::table::{TableSchema, parse_records};

/// `qstat` job table. The default command already strips the two header lines,
/// so nothing is skipped here.
pub const JOB_SCHEMA: TableSchema = TableSchema::new(
    &[
        "job_id", "priority", "name", "user", "state", "date", "time", "queue", "slots",
    ],
    0,
);

/// One job listed by `qstat`. Pending jobs carry no queue and are dropped by the
/// table parser as short rows.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRow {
    pub job_id: String,
    pub priority: String,
    pub name: String,
    pub user: String,
    pub state: String,
    pub date: String,
    pub time: String,
    pub queue: String,
    pub slots: u32,
}

impl JobRow {
    /// Host part of `queue@node`.
    pub fn node(&self) -> Option<&str> {
        self.queue.split_once('@').map(|(_, node)| node)
    }
}

pub fn parse_jobs(text: &str, schema: TableSchema) -> Result<Vec<JobRow>> {
    parse_records(text, schema)
        .into_iter()
        .map(|record| {
            Ok(JobRow {
                job_id: record.get("job_id").to_string(),
                priority: record.get("priority").to_string(),
                name: record.get("name").to_string(),
                user: record.get("user").to_string(),
                state: record.get("state").to_string(),
                date: record.get("date").to_string(),
                time: record.get("time").to_string(),
                queue: record.get("queue").to_string(),
                slots: record.parse_u32("slots")?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const QSTAT: &str = "\
 481516 0.55500 relax.sh   tanaka       r     10/19/2026 09:12:44 all.q@compute-0-0.local           8
 481517 0.50500 md_run     suzuki       r     10/19/2026 09:40:01 gpu.q@compute-1-2.local           4
 481520 0.00000 pending    suzuki       qw    10/19/2026 10:02:13                                   2
";

    #[test]
    fn parses_running_jobs_and_skips_pending() {
        let jobs = parse_jobs(QSTAT, JOB_SCHEMA).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].job_id, "481516");
        assert_eq!(jobs[0].user, "tanaka");
        assert_eq!(jobs[0].slots, 8);
        assert_eq!(jobs[1].node(), Some("compute-1-2.local"));
    }

    #[test]
    fn queue_without_host_has_no_node() {
        let job = JobRow {
            job_id: "1".into(),
            priority: "0".into(),
            name: "x".into(),
            user: "u".into(),
            state: "r".into(),
            date: "d".into(),
            time: "t".into(),
            queue: "all.q".into(),
            slots: 1,
        };
        assert_eq!(job.node(), None);
    }
}
