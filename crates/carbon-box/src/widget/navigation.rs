//! Keyboard focus traversal.
//!
//! Focus moves by a step count in a direction and always lands on an enabled
//! entry. When the computed target is disabled, the walk continues in the
//! direction of travel; when it runs off the end of the sequence it snaps
//! back to the enabled entry closest to that end. The walk is a loop bounded
//! by the sequence length, so an all-disabled sequence terminates with no
//! focus instead of recursing.

use serde::{Deserialize, Serialize};

use crate::model::EntryModel;

/// Direction of focus travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards the first entry.
    Up,
    /// Towards the last entry.
    Down,
}

/// Compute the entry focus should move to.
///
/// `anchor` is the entry travel starts from. Without an anchor, moving down
/// starts just before the first entry and moving up just after the last, so
/// a single step lands on the first or last entry respectively.
///
/// Returns `None` only when the model has no enabled entry.
pub fn next_focus(
    model: &EntryModel,
    anchor: Option<usize>,
    direction: Direction,
    step: usize,
) -> Option<usize> {
    let last = model.len().checked_sub(1)?;
    let first_enabled = model.first_enabled()?;
    let last_enabled = model.last_enabled()?;
    let step = step.max(1);

    let mut index = match (anchor.map(|a| a.min(last)), direction) {
        (Some(a), Direction::Up) => a.saturating_sub(step),
        (Some(a), Direction::Down) => a.saturating_add(step).min(last),
        (None, Direction::Up) => model.len().saturating_sub(step),
        (None, Direction::Down) => (step - 1).min(last),
    };

    for _ in 0..model.len() {
        if model.is_enabled(index) {
            return Some(index);
        }
        match direction {
            Direction::Up if index == 0 => return Some(first_enabled),
            Direction::Up => index -= 1,
            Direction::Down if index == last => return Some(last_enabled),
            Direction::Down => index += 1,
        }
    }

    None
}

/// The keyboard cursor.
///
/// Invariant: a focused entry is always enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusState {
    focused: Option<usize>,
}

impl FocusState {
    /// The focused entry, if any.
    pub fn get(&self) -> Option<usize> {
        self.focused
    }

    /// Focus an entry. Returns `true` if focus changed.
    ///
    /// Disabled or absent entries are refused.
    pub fn set(&mut self, model: &EntryModel, index: usize) -> bool {
        if !model.is_enabled(index) || self.focused == Some(index) {
            return false;
        }
        self.focused = Some(index);
        true
    }

    /// Drop the focus. Returns `true` if something was focused.
    pub fn clear(&mut self) -> bool {
        self.focused.take().is_some()
    }

    /// Drop the focus if it no longer references an enabled entry.
    pub fn revalidate(&mut self, model: &EntryModel) -> bool {
        match self.focused {
            Some(index) if !model.is_enabled(index) => self.clear(),
            _ => false,
        }
    }
}

/// A request for the presenter to bring an entry into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    /// The entry to reveal.
    pub index: usize,
    /// Direction focus travelled to reach it.
    pub direction: Direction,
}

/// Scroll position of the dropdown list, in presenter units.
///
/// Presenters that keep rendered entry geometry can use this to apply a
/// [`ScrollRequest`] and to derive the page size for Page Up/Page Down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Distance from the top of the list to the top of the viewport.
    pub offset: f32,
    /// Visible height.
    pub height: f32,
}

impl Viewport {
    /// Create a viewport scrolled to the top.
    pub fn new(height: f32) -> Self {
        Self {
            offset: 0.0,
            height,
        }
    }

    /// Whether an entry spanning `top..top + height` is fully visible.
    pub fn is_visible(&self, top: f32, height: f32) -> bool {
        top >= self.offset && top + height <= self.offset + self.height
    }

    /// Scroll so the entry is visible. Returns `true` if the offset changed.
    ///
    /// A fully visible entry leaves the offset alone. Otherwise the trailing
    /// edge of the viewport in the direction of travel is aligned with the
    /// matching edge of the entry: its bottom when moving down, its top
    /// when moving up.
    pub fn reveal(&mut self, top: f32, height: f32, direction: Direction) -> bool {
        if self.is_visible(top, height) {
            return false;
        }

        let offset = match direction {
            Direction::Down => top + height - self.height,
            Direction::Up => top,
        }
        .max(0.0);

        let changed = offset != self.offset;
        self.offset = offset;
        changed
    }

    /// Number of uniformly sized entries that fit in one page (at least 1).
    pub fn page_size(&self, entry_height: f32) -> usize {
        if entry_height <= 0.0 {
            return 1;
        }
        ((self.height / entry_height).floor() as usize).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{SourceNode, SourceOption};

    fn build(flags: &[bool]) -> EntryModel {
        let nodes: Vec<SourceNode> = flags
            .iter()
            .enumerate()
            .map(|(i, &enabled)| {
                let option = SourceOption::new(format!("Item {i}"));
                SourceNode::Option(if enabled { option } else { option.disabled() })
            })
            .collect();
        EntryModel::build(&nodes)
    }

    #[test]
    fn test_step_skips_disabled() {
        let model = build(&[true, false, true]);
        assert_eq!(next_focus(&model, Some(0), Direction::Down, 1), Some(2));
        assert_eq!(next_focus(&model, Some(2), Direction::Up, 1), Some(0));
    }

    #[test]
    fn test_clamps_at_boundaries() {
        let model = build(&[true, true, true, true]);
        assert_eq!(next_focus(&model, Some(1), Direction::Down, 10), Some(3));
        assert_eq!(next_focus(&model, Some(2), Direction::Up, 10), Some(0));
        assert_eq!(next_focus(&model, Some(3), Direction::Down, 1), Some(3));
        assert_eq!(next_focus(&model, Some(0), Direction::Up, 1), Some(0));
    }

    #[test]
    fn test_snaps_when_walk_leaves_sequence() {
        // Disabled tail: walking down off the bottom snaps to the last enabled entry.
        let model = build(&[false, true, true, false, false]);
        assert_eq!(next_focus(&model, Some(2), Direction::Down, 1), Some(2));
        assert_eq!(next_focus(&model, Some(1), Direction::Down, 3), Some(2));

        // Disabled head: walking up off the top snaps to the first enabled entry.
        assert_eq!(next_focus(&model, Some(1), Direction::Up, 1), Some(1));
        assert_eq!(next_focus(&model, Some(2), Direction::Up, 5), Some(1));
    }

    #[test]
    fn test_home_and_end() {
        let model = build(&[false, true, true, true, false]);
        let len = model.len();
        assert_eq!(next_focus(&model, Some(3), Direction::Up, len), Some(1));
        assert_eq!(next_focus(&model, Some(1), Direction::Down, len), Some(3));
    }

    #[test]
    fn test_without_anchor() {
        let model = build(&[false, true, true, false]);
        assert_eq!(next_focus(&model, None, Direction::Down, 1), Some(1));
        assert_eq!(next_focus(&model, None, Direction::Up, 1), Some(2));
    }

    #[test]
    fn test_no_enabled_entries() {
        assert_eq!(next_focus(&build(&[]), None, Direction::Down, 1), None);
        let model = build(&[false, false, false]);
        assert_eq!(next_focus(&model, Some(1), Direction::Down, 1), None);
        assert_eq!(next_focus(&model, None, Direction::Up, 3), None);
    }

    #[test]
    fn test_repeated_down_reaches_last_enabled() {
        let model = build(&[true, false, true, true, false, true, false, false]);
        let mut focus = model.first_enabled();
        for _ in 0..20 {
            let next = next_focus(&model, focus, Direction::Down, 1);
            assert!(next.is_some_and(|i| model.is_enabled(i)));
            focus = next;
        }
        assert_eq!(focus, model.last_enabled());
    }

    #[test]
    fn test_focus_state_refuses_disabled() {
        let model = build(&[true, false]);
        let mut focus = FocusState::default();
        assert!(!focus.set(&model, 1));
        assert!(focus.set(&model, 0));
        assert!(!focus.set(&model, 0));
        assert_eq!(focus.get(), Some(0));

        let rebuilt = build(&[false, false]);
        assert!(focus.revalidate(&rebuilt));
        assert_eq!(focus.get(), None);
    }

    #[test]
    fn test_viewport_reveal() {
        let mut viewport = Viewport::new(100.0);

        assert!(!viewport.reveal(40.0, 20.0, Direction::Down));
        assert!(viewport.reveal(120.0, 20.0, Direction::Down));
        assert_eq!(viewport.offset, 40.0);

        assert!(viewport.reveal(20.0, 20.0, Direction::Up));
        assert_eq!(viewport.offset, 20.0);
        assert_eq!(viewport.page_size(20.0), 5);
        assert_eq!(viewport.page_size(0.0), 1);
    }
}
