use super::Symbol;

const FULL_EFFORT_BAND: f64 = 0.5;
const IDLE_BELOW: f64 = 1.0;
const NUMERIC_BELOW: f64 = 32.0;

/// Classify the actual load of a queue instance. Thresholds are checked in order
/// and the first match wins: an idle node with a single core lands in the
/// full-effort band before the idle check is reached.
pub fn classify_load(load_avg: f64, equipped_cpus: f64) -> Symbol {
    if load_avg > equipped_cpus + FULL_EFFORT_BAND {
        Symbol::CpuOverrun
    } else if load_avg > equipped_cpus - FULL_EFFORT_BAND {
        Symbol::FullEffort
    } else if load_avg < IDLE_BELOW {
        Symbol::NoJob
    } else if load_avg < NUMERIC_BELOW {
        Symbol::Load(load_avg.floor() as u32)
    } else {
        Symbol::Slack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_around_eight_cores() {
        assert_eq!(classify_load(8.4, 8.0), Symbol::FullEffort);
        assert_eq!(classify_load(8.6, 8.0), Symbol::CpuOverrun);
        assert_eq!(classify_load(7.6, 8.0), Symbol::FullEffort);
        assert_eq!(classify_load(0.9, 8.0), Symbol::NoJob);
        // Well past the band, the overrun check wins over the numeric band.
        assert_eq!(classify_load(15.7, 8.0), Symbol::CpuOverrun);
    }

    #[test]
    fn numeric_band_truncates() {
        assert_eq!(classify_load(15.7, 64.0), Symbol::Load(15));
        assert_eq!(classify_load(1.0, 64.0), Symbol::Load(1));
        assert_eq!(classify_load(31.99, 64.0), Symbol::Load(31));
    }

    #[test]
    fn heavy_load_on_large_node_is_slack() {
        assert_eq!(classify_load(32.0, 64.0), Symbol::Slack);
        assert_eq!(classify_load(50.0, 128.0), Symbol::Slack);
    }

    #[test]
    fn idle_single_core_node_reaches_full_effort_first() {
        // 0.6 > 1.0 - 0.5, so the idle branch never sees it.
        assert_eq!(classify_load(0.6, 1.0), Symbol::FullEffort);
        assert_eq!(classify_load(0.4, 1.0), Symbol::NoJob);
    }
}
