//! Rule-driven conversion of a small Markdown dialect into HTML fragments.
//!
//! The entry point is [`transform`]. It threads the document through the
//! phases of the standard [`Registry`]: fenced blocks and link targets,
//! headers, dividers, inline formatting, lists, blockquotes, images, links
//! and checkboxes, and finally newline conversion. Multi-line constructs are
//! rebuilt by the [`blocks`] module, and fenced blocks tagged `table` are
//! rendered by [`render_table`].
//!
//! The output is a fragment without a document wrapper. Syntax
//! highlighting, math and diagram rendering are left to the consumer.

#[macro_use]
mod macros;

pub mod blocks;
pub mod html;
pub mod io;
pub mod process;
pub mod registry;
pub mod rule;
pub mod table;

pub use html::normalize_fragment;
pub use io::{html_path_for, render_file, render_path};
pub use process::{TransformOptions, transform, transform_with};
pub use registry::{Phase, PhaseKind, Registry};
pub use rule::{Action, Builder, Classification, ListKind, MatchMode, Rule, TextPattern};
pub use table::render_table;
