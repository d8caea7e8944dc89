//! Tagged-text rendering.
//!
//! Output strings carry a small fixed markup vocabulary (`<h1>`, `<value>`,
//! `<error>`, ...). This module provides:
//! - [`TagTable`] - the ordered vocabulary and its renderers
//! - [`Writer`] - renders markup to ANSI (or plain text) and writes it
//! - [`strip_tag`], [`strip_tags`], [`strip_color`] - markup and escape removal
//! - [`visible_width`] - display width of a cell for column alignment

pub mod strip;
pub mod tags;
pub mod writer;

pub use strip::{strip_color, strip_tag, strip_tags, visible_width};
pub use tags::{render_colors, render_error, render_underline, Renderer, TagTable};
pub use writer::{Capture, PlainOut, Writer};
