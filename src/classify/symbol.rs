/// Outcome of classifying one queue instance. Display text lives in
/// `report::glyph`, so the classifiers never deal in emoji.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Nothing reserved, or nothing running.
    NoJob,
    /// Spare capacity.
    Slack,
    /// Fully occupied, shared between users or matching the core count.
    FullEffort,
    /// Load above the equipped cores.
    CpuOverrun,
    /// Every slot reserved by this one user.
    Owner(String),
    /// Truncated load average between 1 and 32.
    Load(u32),
}
