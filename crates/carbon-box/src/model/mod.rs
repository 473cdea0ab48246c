//! Data model for the select box.
//!
//! - [`EntryModel`]: the ordered entries flattened from the source control
//! - [`SelectionState`]: which entries are active

mod entry;
mod selection;

pub use entry::{Entry, EntryModel, GroupHeader};
pub use selection::{Activation, SelectionMode, SelectionState};
