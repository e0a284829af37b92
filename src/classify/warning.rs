//! Per-job warnings derived by joining host metrics with the job table.
//!
//! The join is inner on the node name: a host over a threshold with no job row
//! on it yields nothing, which happens when the job table lags the host table.

use crate::scheduler::host::NodeStatus;
use crate::scheduler::job::JobRow;

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryWarning {
    pub user: String,
    pub queue: String,
    pub job_id: String,
    /// Memory use of the node, in percent of its capacity.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuWarning {
    pub user: String,
    pub queue: String,
    pub job_id: String,
}

/// Jobs on `node`, in job-table order.
fn jobs_on<'a>(jobs: &'a [JobRow], node: &'a str) -> impl Iterator<Item = &'a JobRow> + 'a {
    jobs.iter().filter(move |job| job.node() == Some(node))
}

pub fn memory_warnings(hosts: &[NodeStatus], jobs: &[JobRow], threshold: f64) -> Vec<MemoryWarning> {
    let mut warnings = Vec::new();
    for host in hosts {
        let percent = host.memory_percent();
        // NaN (zero capacity over zero use) never exceeds the threshold.
        if percent.is_nan() || percent <= threshold {
            continue;
        }
        for job in jobs_on(jobs, &host.node) {
            warnings.push(MemoryWarning {
                user: job.user.clone(),
                queue: job.queue.clone(),
                job_id: job.job_id.clone(),
                percent,
            });
        }
    }
    warnings
}

pub fn cpu_warnings(hosts: &[NodeStatus], jobs: &[JobRow], threshold: f64) -> Vec<CpuWarning> {
    hosts
        .iter()
        .filter(|host| host.cpu_excess() > threshold)
        .flat_map(|host| jobs_on(jobs, &host.node))
        .map(|job| CpuWarning {
            user: job.user.clone(),
            queue: job.queue.clone(),
            job_id: job.job_id.clone(),
        })
        .collect()
}
