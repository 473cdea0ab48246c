//! Source control adapter.
//!
//! The select box never owns its data: it augments an existing list control
//! (the *source control*) and keeps the two in sync. [`SourceControl`] is the
//! contract the widget needs from that control. [`ListControl`] is an
//! in-memory implementation used by headless hosts and tests.
//!
//! # Example
//!
//! ```
//! use carbon_box::source::{ListControl, SourceControl, SourceNode, SourceOption};
//!
//! let control = ListControl::from(["Red", "Green", "Blue"])
//!     .with_node(SourceNode::group(
//!         "Greys",
//!         vec![SourceNode::option("Black"), SourceNode::Option(SourceOption::new("White").disabled())],
//!     ));
//!
//! assert_eq!(control.option_count(), 5);
//! ```

use carbon_box_core::Signal;

/// One option of the source control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOption {
    /// The display text.
    pub label: String,
    /// Whether the option cannot be chosen.
    pub disabled: bool,
    /// Whether the option is currently selected.
    pub selected: bool,
}

impl SourceOption {
    /// Create an enabled, unselected option.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            disabled: false,
            selected: false,
        }
    }

    /// Mark the option as disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Mark the option as pre-selected.
    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }
}

/// A child of the source control, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceNode {
    /// A selectable option.
    Option(SourceOption),
    /// An option group. The header itself is never selectable.
    Group {
        /// Group header text.
        label: String,
        /// A disabled group disables all of its options.
        disabled: bool,
        /// Members of the group.
        children: Vec<SourceNode>,
    },
    /// Anything else. Reported and skipped when building entries.
    Other {
        /// The tag name of the unexpected child.
        tag: String,
    },
}

impl SourceNode {
    /// Shorthand for an enabled option.
    pub fn option(label: impl Into<String>) -> Self {
        Self::Option(SourceOption::new(label))
    }

    /// Shorthand for an enabled group.
    pub fn group(label: impl Into<String>, children: Vec<SourceNode>) -> Self {
        Self::Group {
            label: label.into(),
            disabled: false,
            children,
        }
    }
}

/// The contract the select box needs from the control it replaces.
///
/// Options are addressed by their ordinal among all options in document
/// order, with group headers and malformed children not counted.
pub trait SourceControl {
    /// The tag name of the control (`"select"` for a list control).
    fn tag_name(&self) -> &str;

    /// Whether this is a list control the widget can mount on.
    fn is_list_control(&self) -> bool {
        self.tag_name().eq_ignore_ascii_case("select")
    }

    /// Whether the control allows multiple selection.
    fn is_multiple(&self) -> bool;

    /// Set the control's `multiple` flag.
    fn set_multiple(&mut self, multiple: bool);

    /// Whether the whole control is disabled.
    fn is_disabled(&self) -> bool;

    /// Enumerate the children in document order.
    fn children(&self) -> Vec<SourceNode>;

    /// Set the `selected` property of the option at `option_index`.
    fn set_selected(&mut self, option_index: usize, selected: bool);

    /// Emit the control's change notification.
    fn notify_change(&mut self);
}

/// An in-memory list control.
///
/// Mirrors native select semantics: in single mode selecting an option
/// deselects every other option.
#[derive(Debug)]
pub struct ListControl {
    tag: String,
    multiple: bool,
    disabled: bool,
    nodes: Vec<SourceNode>,
    change_count: usize,

    /// Signal emitted on every change notification.
    pub changed: Signal<()>,
}

impl Default for ListControl {
    fn default() -> Self {
        Self::new()
    }
}

impl ListControl {
    /// Create an empty single-select list control.
    pub fn new() -> Self {
        Self::with_tag("select")
    }

    /// Create an empty control with an arbitrary tag name.
    ///
    /// Any tag other than `select` is rejected when mounting.
    pub fn with_tag(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            multiple: false,
            disabled: false,
            nodes: Vec::new(),
            change_count: 0,
            changed: Signal::new(),
        }
    }

    /// Set multiple selection using builder pattern.
    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Set the disabled flag using builder pattern.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Append a child using builder pattern.
    pub fn with_node(mut self, node: SourceNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Append a child.
    pub fn push(&mut self, node: SourceNode) {
        self.nodes.push(node);
    }

    /// Set the disabled flag of an option.
    pub fn set_option_disabled(&mut self, option_index: usize, disabled: bool) {
        if let Some(option) = self.option_mut(option_index) {
            option.disabled = disabled;
        }
    }

    /// Get the number of options (group headers excluded).
    pub fn option_count(&self) -> usize {
        self.options().len()
    }

    /// Get the option at an ordinal.
    pub fn option(&self, option_index: usize) -> Option<&SourceOption> {
        self.options().into_iter().nth(option_index)
    }

    /// Ordinals of the currently selected options.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.options()
            .iter()
            .enumerate()
            .filter(|(_, o)| o.selected)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of change notifications emitted so far.
    pub fn change_count(&self) -> usize {
        self.change_count
    }

    fn options(&self) -> Vec<&SourceOption> {
        fn walk<'a>(nodes: &'a [SourceNode], out: &mut Vec<&'a SourceOption>) {
            for node in nodes {
                match node {
                    SourceNode::Option(option) => out.push(option),
                    SourceNode::Group { children, .. } => walk(children, out),
                    SourceNode::Other { .. } => {}
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.nodes, &mut out);
        out
    }

    fn options_mut(&mut self) -> Vec<&mut SourceOption> {
        fn walk<'a>(nodes: &'a mut [SourceNode], out: &mut Vec<&'a mut SourceOption>) {
            for node in nodes {
                match node {
                    SourceNode::Option(option) => out.push(option),
                    SourceNode::Group { children, .. } => walk(children, out),
                    SourceNode::Other { .. } => {}
                }
            }
        }

        let mut out = Vec::new();
        walk(&mut self.nodes, &mut out);
        out
    }

    fn option_mut(&mut self, option_index: usize) -> Option<&mut SourceOption> {
        self.options_mut().into_iter().nth(option_index)
    }
}

impl SourceControl for ListControl {
    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn is_multiple(&self) -> bool {
        self.multiple
    }

    fn set_multiple(&mut self, multiple: bool) {
        self.multiple = multiple;
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn children(&self) -> Vec<SourceNode> {
        self.nodes.clone()
    }

    fn set_selected(&mut self, option_index: usize, selected: bool) {
        let multiple = self.multiple;
        for (i, option) in self.options_mut().into_iter().enumerate() {
            if i == option_index {
                option.selected = selected;
            } else if selected && !multiple {
                option.selected = false;
            }
        }
    }

    fn notify_change(&mut self) {
        self.change_count += 1;
        self.changed.emit(());
    }
}

impl From<Vec<String>> for ListControl {
    fn from(labels: Vec<String>) -> Self {
        labels
            .into_iter()
            .fold(Self::new(), |control, label| control.with_node(SourceNode::option(label)))
    }
}

impl From<Vec<&str>> for ListControl {
    fn from(labels: Vec<&str>) -> Self {
        Self::from(labels.into_iter().map(String::from).collect::<Vec<_>>())
    }
}

impl<const N: usize> From<[&str; N]> for ListControl {
    fn from(labels: [&str; N]) -> Self {
        Self::from(labels.to_vec())
    }
}
