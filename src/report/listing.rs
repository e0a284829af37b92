use crate::format::code_block;

use super::GlyphTable;

/// Raw `qstat` output, fenced.
pub fn render_queue_listing(listing: &str) -> String {
    code_block(listing.trim_end())
}

/// Per-user `qstat -u` output under a label line.
pub fn render_user_listing(label: &str, listing: &str) -> String {
    format!("`{label} updates:`\n{}\n", code_block(listing.trim_end()))
}

/// Output of the secondary queue check with job states swapped for glyphs.
///
/// Job lines always carry a `hh:mm:ss` time stamp, so output without any `:`
/// left after substitution has no jobs at all.
pub fn render_secondary_status(output: &str, glyphs: &GlyphTable) -> String {
    let rendered = output
        .trim_end()
        .replace(" R ", &format!(" {} ", glyphs.running))
        .replace(" Q ", &format!(" {} ", glyphs.queued))
        .replace("  ", " ");

    if rendered.contains(':') {
        rendered
    } else {
        glyphs.no_job.clone()
    }
}
