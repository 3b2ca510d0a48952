//! Rendering utilities for human surfaces (Markdown, HTML, console tables).
//!
//! Renderers work on the `Renderable*` model, not on report DTOs, and return plain strings.

#![forbid(unsafe_code)]

mod console;
mod html;
mod markdown;
mod model;

pub use console::{ACTUAL_MAX_CHARS, render_host_table, render_summary, truncate_display};
pub use html::render_html;
pub use markdown::render_markdown;
pub use model::{
    RenderableCheck, RenderableCheckStatus, RenderableHost, RenderableHostStatus,
    RenderableReport, RenderableSummary,
};

#[cfg(test)]
pub(crate) mod test_support;
