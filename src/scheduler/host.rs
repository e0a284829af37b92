use crate::error::Result;

use super::table::{TableSchema, normalize_memory, parse_records};

/// `qhost` layout. The first three lines are the column header, the dash rule and
/// the `global` pseudo-host.
pub const HOST_SCHEMA: TableSchema = TableSchema::new(
    &[
        "node",
        "os",
        "cores",
        "load",
        "max_mem",
        "used_mem",
        "max_swap",
        "used_swap",
    ],
    3,
);

/// Resource usage of one execution host. Memory and swap are in the feed's K
/// baseline; `used_mem` may exceed `max_mem` when the feed lags.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStatus {
    pub node: String,
    pub os: String,
    pub cores: f64,
    pub load: f64,
    pub max_mem: f64,
    pub used_mem: f64,
    pub max_swap: f64,
    pub used_swap: f64,
}

impl NodeStatus {
    pub fn memory_percent(&self) -> f64 {
        self.used_mem / self.max_mem * 100.0
    }

    /// Load beyond the configured core count.
    pub fn cpu_excess(&self) -> f64 {
        self.load - self.cores
    }
}

pub fn parse_hosts(text: &str, schema: TableSchema) -> Result<Vec<NodeStatus>> {
    parse_records(text, schema)
        .into_iter()
        .map(|record| {
            Ok(NodeStatus {
                node: record.get("node").to_string(),
                os: record.get("os").to_string(),
                cores: record.parse_f64("cores")?,
                load: record.parse_f64("load")?,
                max_mem: normalize_memory(record.get("max_mem"))?,
                used_mem: normalize_memory(record.get("used_mem"))?,
                max_swap: normalize_memory(record.get("max_swap"))?,
                used_swap: normalize_memory(record.get("used_swap"))?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const QHOST: &str = "\
HOSTNAME                ARCH         NCPU  LOAD  MEMTOT  MEMUSE  SWAPTO  SWAPUS
-------------------------------------------------------------------------------
global                  -               -     -       -       -       -       -
compute-0-0             lx-amd64       16 15.82   62.9G   20.1G    2.0G  150.4M
compute-0-1             lx-amd64        8  0.01   31.4G  512.0M    2.0G     0.0
";

    #[test]
    fn parses_hosts_after_global_row() {
        let hosts = parse_hosts(QHOST, HOST_SCHEMA).unwrap();
        assert_eq!(hosts.len(), 2);
        let first = &hosts[0];
        assert_eq!(first.node, "compute-0-0");
        assert_eq!(first.os, "lx-amd64");
        assert_eq!(first.cores, 16.0);
        assert!((first.load - 15.82).abs() < 1e-9);
        assert!((first.max_mem - 62_900_000.0).abs() < 1e-3);
        assert!((first.used_swap - 150_400.0).abs() < 1e-6);
        assert_eq!(hosts[1].used_swap, 0.0);
    }

    #[test]
    fn used_memory_above_max_is_kept() {
        let text = "h\n-\nglobal\nnode-a lx 4 1.0 1G 2G 0 0\n";
        let hosts = parse_hosts(text, HOST_SCHEMA).unwrap();
        assert!((hosts[0].memory_percent() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn unavailable_host_aborts_the_table() {
        let text = "h\n-\nglobal\nnode-a lx 4 1.0 1G - 0 0\n";
        let err = parse_hosts(text, HOST_SCHEMA).unwrap_err();
        assert!(matches!(err, Error::UnitCoercion { ref value } if value == "-"));
    }
}
