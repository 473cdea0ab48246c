//! Display value rendering.
//!
//! The head of the select box shows a text derived from the active entries.
//! [`DisplayRenderer`] lets hosts replace the default rendering.

use crate::model::Entry;

/// Strategy for turning the active entries into the head text.
///
/// Implement this trait to customize what the closed select box shows.
pub trait DisplayRenderer: Send + Sync {
    /// Render the active entries, given in sequence order.
    fn render(&self, active: &[&Entry]) -> String;
}

/// Default renderer: the labels joined by a separator.
#[derive(Debug, Clone)]
pub struct JoinedLabels {
    /// Text placed between labels.
    pub separator: String,
}

impl Default for JoinedLabels {
    fn default() -> Self {
        Self {
            separator: ", ".to_string(),
        }
    }
}

impl DisplayRenderer for JoinedLabels {
    fn render(&self, active: &[&Entry]) -> String {
        active
            .iter()
            .map(|e| e.label.as_str())
            .collect::<Vec<_>>()
            .join(&self.separator)
    }
}

impl<F> DisplayRenderer for F
where
    F: Fn(&[&Entry]) -> String + Send + Sync,
{
    fn render(&self, active: &[&Entry]) -> String {
        self(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: usize, label: &str) -> Entry {
        Entry {
            index,
            label: label.to_string(),
            disabled: false,
            group: None,
        }
    }

    #[test]
    fn test_joined_labels() {
        let (a, c) = (entry(0, "Red"), entry(2, "Blue"));
        assert_eq!(JoinedLabels::default().render(&[&a, &c]), "Red, Blue");
        assert_eq!(JoinedLabels::default().render(&[&a]), "Red");
        assert_eq!(JoinedLabels::default().render(&[]), "");
    }

    #[test]
    fn test_function_renderer() {
        fn count(active: &[&Entry]) -> String {
            format!("{} selected", active.len())
        }
        let a = entry(0, "Red");
        assert_eq!(count.render(&[&a]), "1 selected");
    }
}
