use std::fmt::Write;

use crate::aggregate::GroupSummary;

use super::GlyphTable;

/// One three-line section per queue group, in first-seen order.
pub fn render_dashboard(groups: &[GroupSummary], glyphs: &GlyphTable) -> String {
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "*{}*", group.group);
        let _ = writeln!(out, "{} reserved", glyphs.render_all(&group.reserved));
        let _ = writeln!(out, "{} actual", glyphs.render_all(&group.actual));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Symbol;

    #[test]
    fn renders_reserved_then_actual() {
        let groups = [GroupSummary {
            group: "all.q".to_string(),
            reserved: vec![Symbol::Owner("tanaka".into()), Symbol::NoJob],
            actual: vec![Symbol::FullEffort, Symbol::NoJob],
        }];
        let text = render_dashboard(&groups, &GlyphTable::slack_emoji());
        assert_eq!(
            text,
            "*all.q*\n:tanaka: :ジョブなし: reserved\n:全力: :ジョブなし: actual\n"
        );
    }

    #[test]
    fn no_groups_renders_nothing() {
        assert_eq!(render_dashboard(&[], &GlyphTable::plain()), "");
    }
}
