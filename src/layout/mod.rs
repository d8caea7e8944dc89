//! Aligned output.
//!
//! - [`Columns`]: unlabeled rows padded to the widest visible cell
//! - [`Table`]: columns with a header row, or a JSON array of objects
//! - [`Info`]: `header  value` blocks, or a JSON object
//!
//! Widths are measured on tag-stripped text so markup never shifts alignment.

pub mod columns;
pub mod format;
pub mod info;
pub mod table;

pub use columns::{cell_text, Columns};
pub use format::OutputFormat;
pub use info::Info;
pub use table::Table;
