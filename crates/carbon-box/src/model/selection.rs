//! Selection state for the select box.
//!
//! [`SelectionState`] tracks which entries are *active* (chosen). It knows
//! nothing about the source control; the widget mirrors every
//! [`Activation`] onto the source itself.
//!
//! # Example
//!
//! ```
//! use carbon_box::model::{EntryModel, SelectionMode, SelectionState};
//! use carbon_box::source::SourceNode;
//!
//! let model = EntryModel::build(&[SourceNode::option("Red"), SourceNode::option("Green")]);
//! let mut selection = SelectionState::new(SelectionMode::Multiple);
//!
//! selection.activate(&model, 1);
//! selection.activate(&model, 0);
//! assert_eq!(selection.active_indices().collect::<Vec<_>>(), vec![0, 1]);
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::entry::{Entry, EntryModel};

/// Selection behavior mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// At most one entry is active (default).
    #[default]
    Single,
    /// Any number of entries can be active; activation toggles.
    Multiple,
}

/// The outcome of a successful activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    /// The activated entry.
    pub index: usize,
    /// Membership of the entry after the activation.
    pub active: bool,
    /// Entry that lost its membership as a side effect (single mode only).
    pub deselected: Option<usize>,
    /// Whether membership actually changed.
    pub changed: bool,
}

/// Tracks the active entries.
///
/// Invariant: a disabled entry is never a member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    mode: SelectionMode,
    /// Ordered set, so iteration follows sequence order rather than
    /// activation order.
    active: BTreeSet<usize>,
}

impl SelectionState {
    /// Create an empty selection.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            active: BTreeSet::new(),
        }
    }

    /// Get the selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Whether multiple entries may be active.
    pub fn is_multiple(&self) -> bool {
        self.mode == SelectionMode::Multiple
    }

    /// Check whether an entry is active.
    pub fn is_active(&self, index: usize) -> bool {
        self.active.contains(&index)
    }

    /// Active entry indices in sequence order.
    pub fn active_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.active.iter().copied()
    }

    /// The first active entry in sequence order.
    ///
    /// In single mode this is *the* active entry.
    pub fn current(&self) -> Option<usize> {
        self.active.first().copied()
    }

    /// Number of active entries.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether nothing is active.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Activate an entry.
    ///
    /// Single mode replaces the active entry; multiple mode toggles
    /// membership. Returns `None` (and changes nothing) when the entry is
    /// absent or disabled.
    pub fn activate(&mut self, model: &EntryModel, index: usize) -> Option<Activation> {
        if !model.is_enabled(index) {
            return None;
        }

        let activation = match self.mode {
            SelectionMode::Single => {
                let previous = self.current();
                self.active.clear();
                self.active.insert(index);
                Activation {
                    index,
                    active: true,
                    deselected: previous.filter(|&p| p != index),
                    changed: previous != Some(index),
                }
            }
            SelectionMode::Multiple => {
                let active = if self.active.remove(&index) {
                    false
                } else {
                    self.active.insert(index);
                    true
                };
                Activation {
                    index,
                    active,
                    deselected: None,
                    changed: true,
                }
            }
        };

        Some(activation)
    }

    /// Reset the selection from the source `selected` flags.
    ///
    /// Disabled entries are skipped. In single mode the last pre-selected
    /// entry wins, matching native list controls.
    pub fn restore(&mut self, model: &EntryModel, selected: &[bool]) {
        self.active.clear();

        let candidates = selected
            .iter()
            .enumerate()
            .filter(|&(i, &s)| s && model.is_enabled(i))
            .map(|(i, _)| i);

        match self.mode {
            SelectionMode::Single => {
                if let Some(last) = candidates.last() {
                    self.active.insert(last);
                }
            }
            SelectionMode::Multiple => self.active.extend(candidates),
        }
    }

    /// The active entries in sequence order.
    pub fn active_entries<'a>(&self, model: &'a EntryModel) -> Vec<&'a Entry> {
        self.active.iter().filter_map(|&i| model.get(i)).collect()
    }
}
