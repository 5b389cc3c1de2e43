//! Authoring: reversible tile edits applied through the world facade.
//!
//! # Invariants
//! - Every edit command carries enough context to undo itself.
//! - A new edit clears the redo stack.

mod editor;

pub use editor::{EditCommand, EditError, Editor};
