//! The select box widget and its input plumbing.
//!
//! - [`CarbonBox`]: the state machine mounted on a source control
//! - [`navigation`]: focus traversal and scroll requests
//! - [`search`]: type-ahead matching
//! - [`OutsideClickRegistry`]: document-level dismissal

mod carbon_box;
mod events;
mod geometry;
pub mod navigation;
mod registry;
pub mod search;

pub use carbon_box::{CarbonBox, ChangeEvent, DropdownState, Unmounted};
pub use events::{ClickTarget, Key, KeyPressEvent, KeyboardModifiers};
pub use geometry::{Point, Rect};
pub use navigation::{Direction, FocusState, ScrollRequest, Viewport, next_focus};
pub use registry::{Dismiss, InstanceId, OutsideClickRegistry};
pub use search::TypeAhead;
