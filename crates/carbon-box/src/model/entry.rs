//! The option model: a flat, ordered list of navigable entries.

use carbon_box_core::logging::report;

use crate::error::CarbonError;
use crate::source::SourceNode;

/// One navigable, potentially selectable unit derived from a source option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Position in the flattened sequence. Equals the source option ordinal.
    pub index: usize,
    /// The display text.
    pub label: String,
    /// Whether the entry can be focused or activated.
    pub disabled: bool,
    /// Label of the group this entry belongs to, if any.
    pub group: Option<String>,
}

impl Entry {
    /// Whether the entry can be focused or activated.
    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    /// Case-insensitive prefix match against an already lower-cased needle.
    pub(crate) fn label_starts_with(&self, lowered: &str) -> bool {
        self.label.to_lowercase().starts_with(lowered)
    }
}

/// A group header. Headers are rendered but never navigable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupHeader {
    /// Header text.
    pub label: String,
    /// Index of the first member entry (equal to `end` for an empty group).
    pub start: usize,
    /// One past the index of the last member entry.
    pub end: usize,
}

/// The flattened entry sequence built from a source control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryModel {
    entries: Vec<Entry>,
    groups: Vec<GroupHeader>,
}

/// A source option as seen while flattening, before it becomes an [`Entry`].
pub(crate) struct FlatOption {
    pub entry: Entry,
    pub selected: bool,
}

impl EntryModel {
    /// Build the model from the source children.
    ///
    /// Children that are neither options nor groups are reported and
    /// skipped; building continues with the remaining children.
    pub fn build(nodes: &[SourceNode]) -> Self {
        Self::build_with_selection(nodes).0
    }

    /// Build the model and collect the source `selected` flags alongside.
    pub(crate) fn build_with_selection(nodes: &[SourceNode]) -> (Self, Vec<bool>) {
        let mut model = Self::default();
        let mut flat = Vec::new();
        let mut position = 0;
        model.flatten(nodes, None, false, &mut position, &mut flat);

        let selected = flat.iter().map(|f| f.selected).collect();
        model.entries = flat.into_iter().map(|f| f.entry).collect();
        (model, selected)
    }

    fn flatten(
        &mut self,
        nodes: &[SourceNode],
        group: Option<&str>,
        group_disabled: bool,
        position: &mut usize,
        out: &mut Vec<FlatOption>,
    ) {
        for node in nodes {
            match node {
                SourceNode::Option(option) => {
                    out.push(FlatOption {
                        entry: Entry {
                            index: out.len(),
                            label: option.label.clone(),
                            disabled: option.disabled || group_disabled,
                            group: group.map(String::from),
                        },
                        selected: option.selected,
                    });
                }
                SourceNode::Group {
                    label,
                    disabled,
                    children,
                } => {
                    let header = self.groups.len();
                    self.groups.push(GroupHeader {
                        label: label.clone(),
                        start: out.len(),
                        end: out.len(),
                    });
                    self.flatten(
                        children,
                        Some(label.as_str()),
                        group_disabled || *disabled,
                        position,
                        out,
                    );
                    self.groups[header].end = out.len();
                }
                SourceNode::Other { tag } => {
                    report(&CarbonError::malformed_entry(*position, tag.clone()));
                }
            }
            *position += 1;
        }
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the model has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the entry at an index.
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Iterate the entries in sequence order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// The group headers, in document order.
    pub fn groups(&self) -> &[GroupHeader] {
        &self.groups
    }

    /// Whether the entry at `index` exists and is enabled.
    pub fn is_enabled(&self, index: usize) -> bool {
        self.get(index).is_some_and(Entry::is_enabled)
    }

    /// Index of the first enabled entry.
    pub fn first_enabled(&self) -> Option<usize> {
        self.entries.iter().position(Entry::is_enabled)
    }

    /// Index of the last enabled entry.
    pub fn last_enabled(&self) -> Option<usize> {
        self.entries.iter().rposition(Entry::is_enabled)
    }
}

impl<'a> IntoIterator for &'a EntryModel {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
