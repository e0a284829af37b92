use std::fmt::Write;

use crate::classify::{CpuWarning, MemoryWarning};
use crate::format::format_significant;

pub fn render_memory_warnings(warnings: &[MemoryWarning]) -> String {
    let mut out = String::new();
    for w in warnings {
        let _ = writeln!(out, "@{}", w.user);
        let _ = writeln!(
            out,
            ":warning: job #{} on {} is using {}% of the node's memory. It may slow down or crash.",
            w.job_id,
            w.queue,
            format_significant(w.percent, 3)
        );
        let _ = writeln!(out, "Please move it to a node with more memory.");
    }
    out
}

pub fn render_cpu_warnings(warnings: &[CpuWarning]) -> String {
    let mut out = String::new();
    for w in warnings {
        let _ = writeln!(out, "@{}", w.user);
        let _ = writeln!(
            out,
            ":warning: job #{} on {} is using more CPU than its allocated cores. Check its parallel settings or look for zombie processes.",
            w.job_id, w.queue
        );
    }
    out
}
