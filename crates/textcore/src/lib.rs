//! Gap-buffer text storage and navigation engine for Stilus.
//!
//! The engine is layered bottom-up: [`Line`] is a gap buffer over the
//! characters of one line; [`Document`] is a second gap buffer over the
//! lines themselves; [`Editor`] binds a document to a cursor, a viewport and
//! the two modal editing states; [`History`] is the bounded snapshot chain
//! behind undo and redo. Everything here is purely in-memory and
//! single-threaded — rendering, key binding and file persistence live in the
//! application crate and consume this one read-only.

pub mod cursor;
pub mod document;
pub mod editor;
pub mod error;
pub mod history;
pub mod line;

pub use cursor::{Cursor, Mode};
pub use document::Document;
pub use editor::Editor;
pub use error::{Error, Result};
pub use history::History;
pub use line::Line;
