//! Select box configuration.
//!
//! Every field has a documented default, so an empty document is a valid
//! configuration:
//!
//! ```
//! use carbon_box::config::{CarbonBoxConfig, Layout};
//!
//! let config = CarbonBoxConfig::from_toml_str(r#"
//!     layout = "box"
//!     search_delay_ms = 250
//!     namespace = "shop-"
//! "#).unwrap();
//!
//! assert_eq!(config.layout, Layout::Box);
//! assert_eq!(config.class_names("option"), "crb-option shop-option");
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CarbonError, Result};
use crate::model::SelectionMode;

/// Prefix applied to every class name the widget produces.
pub const CLASS_PREFIX: &str = "crb-";

/// Default type-ahead expiry.
pub const DEFAULT_SEARCH_DELAY_MS: u64 = 300;

/// Longest accepted type-ahead expiry.
pub const MAX_SEARCH_DELAY_MS: u64 = 5_000;

/// How the dropdown is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// A head showing the current value and a dropdown that opens on demand.
    #[default]
    Dropdown,
    /// The list is always shown; closing is a no-op.
    Box,
}

/// The animation the presenter should use to show and hide the dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    #[default]
    Slide,
    Fade,
    None,
}

/// Configuration for a select box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarbonBoxConfig {
    /// Selection mode. `None` inherits the source control's `multiple` flag.
    pub mode: Option<SelectionMode>,
    /// Presentation layout.
    pub layout: Layout,
    /// Show/hide animation kind.
    pub transition: Transition,
    /// Show/hide animation duration in milliseconds.
    pub duration_ms: u64,
    /// Type-ahead expiry in milliseconds.
    pub search_delay_ms: u64,
    /// Optional user class prefix, added next to the built-in one.
    pub namespace: Option<String>,
    /// Entries per page until the presenter supplies a measured value.
    pub page_size: usize,
    /// Emit change notifications for activations that alter nothing, such
    /// as re-choosing the active entry in single mode.
    pub notify_unchanged: bool,
    /// Single mode: activate the first enabled entry when the source has no
    /// pre-selected entry.
    pub select_first_by_default: bool,
}

impl Default for CarbonBoxConfig {
    fn default() -> Self {
        Self {
            mode: None,
            layout: Layout::Dropdown,
            transition: Transition::Slide,
            duration_ms: 500,
            search_delay_ms: DEFAULT_SEARCH_DELAY_MS,
            namespace: None,
            page_size: 10,
            notify_unchanged: false,
            select_first_by_default: false,
        }
    }
}

impl CarbonBoxConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(document: &str) -> Result<Self> {
        Ok(toml::from_str(document)?)
    }

    /// Set the selection mode using builder pattern.
    pub fn with_mode(mut self, mode: SelectionMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set the layout using builder pattern.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the transition using builder pattern.
    pub fn with_transition(mut self, transition: Transition, duration_ms: u64) -> Self {
        self.transition = transition;
        self.duration_ms = duration_ms;
        self
    }

    /// Set the type-ahead expiry using builder pattern.
    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the class namespace using builder pattern.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the default page size using builder pattern.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set change-notification behavior for no-op activations.
    pub fn with_notify_unchanged(mut self, notify: bool) -> Self {
        self.notify_unchanged = notify;
        self
    }

    /// Set the single-mode default selection behavior.
    pub fn with_select_first_by_default(mut self, select: bool) -> Self {
        self.select_first_by_default = select;
        self
    }

    /// Type-ahead expiry as a duration.
    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }

    /// Animation duration as a duration.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Check every field, returning all problems found.
    pub fn validate(&self) -> Vec<CarbonError> {
        let mut errors = Vec::new();

        if !(1..=MAX_SEARCH_DELAY_MS).contains(&self.search_delay_ms) {
            errors.push(CarbonError::invalid_config(
                "search_delay_ms",
                format!(
                    "must be between 1 and {MAX_SEARCH_DELAY_MS}, got {}",
                    self.search_delay_ms
                ),
            ));
        }

        if self.page_size == 0 {
            errors.push(CarbonError::invalid_config(
                "page_size",
                "must be at least 1",
            ));
        }

        if let Some(namespace) = &self.namespace
            && (namespace.is_empty() || namespace.chars().any(char::is_whitespace))
        {
            errors.push(CarbonError::invalid_config(
                "namespace",
                format!("must be a non-empty class prefix without whitespace, got {namespace:?}"),
            ));
        }

        errors
    }

    /// Build the class list for a widget part.
    ///
    /// Always contains the built-in `crb-` class, followed by the user
    /// namespaced class when a namespace is configured.
    pub fn class_names(&self, key: &str) -> String {
        match &self.namespace {
            Some(namespace) => format!("{CLASS_PREFIX}{key} {namespace}{key}"),
            None => format!("{CLASS_PREFIX}{key}"),
        }
    }

    /// The selector matching a widget part by its built-in class.
    pub fn class_selector(key: &str) -> String {
        format!(".{CLASS_PREFIX}{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CarbonBoxConfig::default();
        assert_eq!(config.mode, None);
        assert_eq!(config.layout, Layout::Dropdown);
        assert_eq!(config.transition, Transition::Slide);
        assert_eq!(config.search_delay(), Duration::from_millis(300));
        assert_eq!(config.duration(), Duration::from_millis(500));
        assert!(!config.notify_unchanged);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_from_toml() {
        let config = CarbonBoxConfig::from_toml_str(
            r#"
            mode = "multiple"
            transition = "fade"
            duration_ms = 200
            notify_unchanged = true
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, Some(SelectionMode::Multiple));
        assert_eq!(config.transition, Transition::Fade);
        assert_eq!(config.duration_ms, 200);
        assert!(config.notify_unchanged);
        assert_eq!(config.search_delay_ms, DEFAULT_SEARCH_DELAY_MS);
    }

    #[test]
    fn test_from_toml_rejects_bad_values() {
        let err = CarbonBoxConfig::from_toml_str("layout = \"sideways\"").unwrap_err();
        assert!(matches!(err, CarbonError::ConfigParse(_)));
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let config = CarbonBoxConfig::default()
            .with_search_delay(Duration::ZERO)
            .with_page_size(0)
            .with_namespace("my ns");

        let fields: Vec<&str> = config
            .validate()
            .iter()
            .filter_map(|e| match e {
                CarbonError::InvalidConfig { field, .. } => Some(*field),
                _ => None,
            })
            .collect();
        assert_eq!(fields, vec!["search_delay_ms", "page_size", "namespace"]);
    }

    #[test]
    fn test_class_names() {
        let plain = CarbonBoxConfig::default();
        assert_eq!(plain.class_names("container"), "crb-container");

        let namespaced = CarbonBoxConfig::default().with_namespace("test-namespace-");
        assert_eq!(
            namespaced.class_names("container"),
            "crb-container test-namespace-container"
        );
        assert_eq!(CarbonBoxConfig::class_selector("option"), ".crb-option");
    }
}
