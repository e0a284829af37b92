use serde::Deserialize;

use crate::classify::Symbol;

/// Display text for each classification outcome and status marker.
///
/// `owner` and `load` are templates: `{user}` and `{n}` are substituted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GlyphTable {
    pub no_job: String,
    pub slack: String,
    pub full_effort: String,
    pub cpu_overrun: String,
    pub owner: String,
    pub load: String,
    pub running: String,
    pub queued: String,
    pub maintenance: String,
}

impl Default for GlyphTable {
    fn default() -> Self {
        Self::slack_emoji()
    }
}

impl GlyphTable {
    /// The lab workspace's custom emoji.
    pub fn slack_emoji() -> Self {
        GlyphTable {
            no_job: ":ジョブなし:".to_string(),
            slack: ":余裕:".to_string(),
            full_effort: ":全力:".to_string(),
            cpu_overrun: ":cpu利用率超過:".to_string(),
            owner: ":{user}:".to_string(),
            load: ":n{n}:".to_string(),
            running: ":pi-run:".to_string(),
            queued: ":gre-humming:".to_string(),
            maintenance: ":maintenance:".to_string(),
        }
    }

    /// ASCII markers for terminals and logs.
    pub fn plain() -> Self {
        GlyphTable {
            no_job: "-".to_string(),
            slack: "~".to_string(),
            full_effort: "#".to_string(),
            cpu_overrun: "!".to_string(),
            owner: "@{user}".to_string(),
            load: "{n}".to_string(),
            running: "R".to_string(),
            queued: "Q".to_string(),
            maintenance: "[maintenance]".to_string(),
        }
    }

    pub fn render(&self, symbol: &Symbol) -> String {
        match symbol {
            Symbol::NoJob => self.no_job.clone(),
            Symbol::Slack => self.slack.clone(),
            Symbol::FullEffort => self.full_effort.clone(),
            Symbol::CpuOverrun => self.cpu_overrun.clone(),
            Symbol::Owner(user) => self.owner.replace("{user}", user),
            Symbol::Load(n) => self.load.replace("{n}", &n.to_string()),
        }
    }

    pub fn render_all(&self, symbols: &[Symbol]) -> String {
        symbols
            .iter()
            .map(|s| self.render(s))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slack_emoji_templates() {
        let glyphs = GlyphTable::slack_emoji();
        assert_eq!(glyphs.render(&Symbol::Owner("tanaka".into())), ":tanaka:");
        assert_eq!(glyphs.render(&Symbol::Load(15)), ":n15:");
        assert_eq!(glyphs.render(&Symbol::CpuOverrun), ":cpu利用率超過:");
    }

    #[test]
    fn every_symbol_renders_distinctly_in_plain() {
        let glyphs = GlyphTable::plain();
        let symbols = [
            Symbol::NoJob,
            Symbol::Slack,
            Symbol::FullEffort,
            Symbol::CpuOverrun,
            Symbol::Owner("sato".into()),
            Symbol::Load(3),
        ];
        let rendered: Vec<String> = symbols.iter().map(|s| glyphs.render(s)).collect();
        let mut unique = rendered.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), rendered.len());
        assert_eq!(glyphs.render_all(&symbols[..2]), "- ~");
    }
}
