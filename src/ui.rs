pub mod html;
pub mod report;

pub use report::{ColumnKind, RenderSummary, Renderer, write_report};
