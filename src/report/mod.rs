//! Deterministic text rendering of classifier output.

pub mod alert;
pub mod dashboard;
pub mod glyph;
pub mod listing;

pub use alert::{render_cpu_warnings, render_memory_warnings};
pub use dashboard::render_dashboard;
pub use glyph::GlyphTable;
pub use listing::{render_queue_listing, render_secondary_status, render_user_listing};
