//! Carbon Box: a keyboard-navigable custom select box.
//!
//! A [`CarbonBox`] mounts on a native list control (anything implementing
//! [`SourceControl`]) and replaces its presentation with a custom dropdown
//! while keeping the control's `selected` flags authoritative for form
//! submission. The widget is headless: presenters forward input events and
//! draw from its state and signals.
//!
//! # Features
//!
//! - Single and multiple selection, mirrored onto the source control
//! - Arrow, Page Up/Down, Home/End navigation that never lands on a
//!   disabled entry
//! - Type-ahead search with a resetting expiry
//! - Option groups, where a disabled group disables its options
//! - Dropdown and always-open box layouts
//! - Outside-click dismissal shared by every instance
//!
//! # Example
//!
//! ```
//! use carbon_box::{CarbonBox, CarbonBoxConfig, ClickTarget, ListControl, SelectionMode};
//!
//! let source = ListControl::from(["Apple", "Banana", "Cherry"]);
//! let config = CarbonBoxConfig::default().with_mode(SelectionMode::Multiple);
//! let mut select = CarbonBox::new(source, config).unwrap();
//!
//! select.handle_click(ClickTarget::Head);
//! select.handle_click(ClickTarget::Entry(2));
//! select.handle_click(ClickTarget::Entry(0));
//!
//! assert_eq!(select.display_value(), "Apple, Cherry");
//! assert_eq!(select.source().selected_indices(), vec![0, 2]);
//! assert!(select.is_open());
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod source;
pub mod widget;

pub use carbon_box_core::{ConnectionId, Signal, TimerId, TimerManager};

pub use config::{CarbonBoxConfig, Layout, Transition};
pub use error::{CarbonError, Result};
pub use model::{Activation, Entry, EntryModel, GroupHeader, SelectionMode, SelectionState};
pub use render::{DisplayRenderer, JoinedLabels};
pub use source::{ListControl, SourceControl, SourceNode, SourceOption};
pub use widget::{
    CarbonBox, ChangeEvent, ClickTarget, Direction, DropdownState, Key, KeyPressEvent,
    KeyboardModifiers, OutsideClickRegistry, Point, Rect, ScrollRequest, Unmounted, Viewport,
};
