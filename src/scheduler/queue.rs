//! `qstat -f` parsing: one block per queue instance, separated by dash rules.

use crate::error::{Error, Result};

const MIN_RULE_WIDTH: usize = 10;

/// A job line inside a queue block, reduced to what reservation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueJob {
    pub user: String,
    pub slots: u32,
}

/// One queue instance (`queue@node`) as reported by `qstat -f`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueBlock {
    pub queue: String,
    /// Only present when the feed uses the `resv/used/tot` form.
    pub reserved: Option<u32>,
    pub used: u32,
    pub equipped_cpus: u32,
    pub load_avg: f64,
    pub jobs: Vec<QueueJob>,
}

impl QueueBlock {
    /// Queue name before `@`, the dashboard row this block belongs to.
    pub fn group(&self) -> &str {
        self.queue
            .split_once('@')
            .map_or(self.queue.as_str(), |(group, _)| group)
    }

    pub fn node(&self) -> &str {
        self.queue.split_once('@').map_or("", |(_, node)| node)
    }
}

fn is_rule(line: &str, ch: char) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= MIN_RULE_WIDTH && trimmed.chars().all(|c| c == ch)
}

/// Group lines into dash-separated blocks, stopping at the `#` rule that opens the
/// pending-jobs trailer.
fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = vec![Vec::new()];
    for line in text.lines() {
        if is_rule(line, '#') {
            break;
        }
        if is_rule(line, '-') {
            blocks.push(Vec::new());
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        if let Some(current) = blocks.last_mut() {
            current.push(line);
        }
    }
    blocks.retain(|b| !b.is_empty());
    blocks
}

fn matches_node_prefix(first_token: &str, node_prefix: &str) -> bool {
    first_token
        .split_once('@')
        .is_some_and(|(queue, node)| !queue.is_empty() && node.starts_with(node_prefix))
}

fn header_error(line: &str, reason: impl Into<String>) -> Error {
    Error::QueueHeader {
        line: line.trim().to_string(),
        reason: reason.into(),
    }
}

/// `resv/used/tot` or `used/tot`.
fn parse_slot_field(line: &str, field: &str) -> Result<(Option<u32>, u32, u32)> {
    let parts = field
        .split('/')
        .map(|p| p.parse::<u32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| header_error(line, format!("slot field `{field}` is not numeric")))?;

    match parts.as_slice() {
        [reserved, used, total] => Ok((Some(*reserved), *used, *total)),
        [used, total] => Ok((None, *used, *total)),
        _ => Err(header_error(
            line,
            format!("slot field `{field}` has {} parts", parts.len()),
        )),
    }
}

fn parse_job_line(line: &str) -> Result<Option<QueueJob>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 4 {
        tracing::debug!(line, "skipping short job line");
        return Ok(None);
    }
    let last = tokens[tokens.len() - 1];
    let slots = last.parse::<u32>().map_err(|_| Error::Coercion {
        column: "slots",
        value: last.to_string(),
    })?;
    Ok(Some(QueueJob {
        user: tokens[3].to_string(),
        slots,
    }))
}

fn parse_block(lines: &[&str]) -> Result<QueueBlock> {
    let header = lines[0];
    let tokens: Vec<&str> = header.split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(header_error(header, "expected at least 4 columns"));
    }

    let (reserved, used, equipped_cpus) = parse_slot_field(header, tokens[2])?;
    let load_avg = tokens[3]
        .parse::<f64>()
        .map_err(|_| header_error(header, format!("load average `{}` is not numeric", tokens[3])))?;

    let mut jobs = Vec::new();
    for line in &lines[1..] {
        if let Some(job) = parse_job_line(line)? {
            jobs.push(job);
        }
    }

    Ok(QueueBlock {
        queue: tokens[0].to_string(),
        reserved,
        used,
        equipped_cpus,
        load_avg,
        jobs,
    })
}

/// Parse every block whose header names a host starting with `node_prefix`.
pub fn parse_queue_blocks(text: &str, node_prefix: &str) -> Result<Vec<QueueBlock>> {
    split_blocks(text)
        .into_iter()
        .filter(|lines| {
            lines[0]
                .split_whitespace()
                .next()
                .is_some_and(|first| matches_node_prefix(first, node_prefix))
        })
        .map(|lines| parse_block(&lines))
        .collect()
}
