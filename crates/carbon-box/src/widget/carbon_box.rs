//! The select box state machine.
//!
//! [`CarbonBox`] mounts on a [`SourceControl`] and owns everything the
//! presenter needs to draw a custom dropdown for it:
//! - The entry model flattened from the source options
//! - Active entries (single or multiple selection), mirrored onto the source
//! - The keyboard focus cursor with disabled-entry skipping
//! - Type-ahead search with a deferred, cancellable expiry
//! - The Closed/Open dropdown state
//!
//! The presenter forwards input ([`KeyPressEvent`], [`ClickTarget`], hover,
//! outside clicks) and listens to the widget's signals to redraw.
//!
//! # Example
//!
//! ```
//! use carbon_box::{CarbonBox, CarbonBoxConfig, Key, KeyPressEvent, ListControl};
//!
//! let source = ListControl::from(["Red", "Green", "Blue"]);
//! let mut select = CarbonBox::new(source, CarbonBoxConfig::default()).unwrap();
//!
//! select.changed.connect(|change| {
//!     println!("now showing: {}", change.value);
//! });
//!
//! select.open();
//! select.handle_key_press(&KeyPressEvent::character('g'));
//! select.handle_key_press(&KeyPressEvent::new(Key::Enter));
//!
//! assert_eq!(select.display_value(), "Green");
//! assert!(!select.is_open());
//! assert_eq!(select.source().selected_indices(), vec![1]);
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use carbon_box_core::logging::{report, targets};
use carbon_box_core::{Signal, TimerManager};

use crate::config::{CarbonBoxConfig, Layout};
use crate::error::CarbonError;
use crate::model::{Activation, Entry, EntryModel, SelectionMode, SelectionState};
use crate::render::{DisplayRenderer, JoinedLabels};
use crate::source::SourceControl;

use super::events::{ClickTarget, Key, KeyPressEvent};
use super::geometry::{Point, Rect};
use super::navigation::{Direction, FocusState, ScrollRequest, next_focus};
use super::search::TypeAhead;

/// Whether the dropdown is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropdownState {
    #[default]
    Closed,
    Open,
}

/// Payload of the [`CarbonBox::changed`] signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// The activated entry.
    pub index: usize,
    /// Membership of the entry after the activation.
    pub active: bool,
    /// The display value after the activation.
    pub value: String,
}

/// A source control the select box refused to mount on.
///
/// The source is handed back untouched so the host keeps using it natively.
/// The error has already been reported through `tracing`.
pub struct Unmounted<S> {
    source: S,
    error: CarbonError,
}

impl<S> Unmounted<S> {
    /// The reason mounting failed.
    pub fn error(&self) -> &CarbonError {
        &self.error
    }

    /// Take back the untouched source control.
    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S> fmt::Debug for Unmounted<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unmounted")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<S> fmt::Display for Unmounted<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "select box not mounted: {}", self.error)
    }
}

impl<S> std::error::Error for Unmounted<S> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// A keyboard-navigable select box kept in sync with its source control.
pub struct CarbonBox<S: SourceControl> {
    /// The control being augmented.
    source: S,

    /// Configuration the widget was mounted with.
    config: CarbonBoxConfig,

    /// Entries flattened from the source.
    model: EntryModel,

    /// Active entries.
    selection: SelectionState,

    /// Keyboard cursor.
    focus: FocusState,

    /// Type-ahead buffer and its expiry timer.
    search: TypeAhead,

    /// Timers owned by this instance.
    timers: TimerManager,

    /// Dropdown visibility.
    state: DropdownState,

    /// Whether the whole control is disabled.
    disabled: bool,

    /// Entries per page for Page Up/Page Down.
    page_size: usize,

    /// Screen regions occupied by the widget (head, dropdown).
    bounds: Vec<Rect>,

    /// Head text strategy.
    renderer: Box<dyn DisplayRenderer>,

    /// Cached head text.
    display_value: String,

    // Signals
    /// Signal emitted when the dropdown opens.
    pub opened: Signal<()>,
    /// Signal emitted when the dropdown closes.
    pub closed: Signal<()>,
    /// Signal emitted after an activation changes the selection.
    pub changed: Signal<ChangeEvent>,
    /// Signal emitted when the keyboard cursor moves or is dropped.
    pub focus_changed: Signal<Option<usize>>,
    /// Signal emitted when the presenter should bring an entry into view.
    pub scroll_requested: Signal<ScrollRequest>,
}

impl<S: SourceControl> fmt::Debug for CarbonBox<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarbonBox")
            .field("source", &self.source.tag_name())
            .field("state", &self.state)
            .field("mode", &self.selection.mode())
            .field("entries", &self.model.len())
            .field("active", &self.active())
            .field("focused", &self.focus.get())
            .field("search", &self.search.buffer())
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

impl<S: SourceControl> CarbonBox<S> {
    /// Mount a select box on a source control.
    ///
    /// Fails, handing the source back, when the configuration is invalid or
    /// the source is not a list control. Every problem is reported once.
    pub fn new(source: S, config: CarbonBoxConfig) -> Result<Self, Unmounted<S>> {
        let mut problems = config.validate();
        if !source.is_list_control() {
            problems.push(CarbonError::invalid_source(source.tag_name()));
        }
        for problem in &problems {
            report(problem);
        }
        if let Some(error) = problems.into_iter().next() {
            return Err(Unmounted { source, error });
        }

        let state = match config.layout {
            Layout::Box => DropdownState::Open,
            Layout::Dropdown => DropdownState::Closed,
        };

        let mut widget = Self {
            search: TypeAhead::new(config.search_delay()),
            page_size: config.page_size,
            model: EntryModel::default(),
            selection: SelectionState::default(),
            focus: FocusState::default(),
            timers: TimerManager::new(),
            disabled: false,
            bounds: Vec::new(),
            renderer: Box::new(JoinedLabels::default()),
            display_value: String::new(),
            state,
            source,
            config,
            opened: Signal::new(),
            closed: Signal::new(),
            changed: Signal::new(),
            focus_changed: Signal::new(),
            scroll_requested: Signal::new(),
        };
        widget.load_source();

        tracing::debug!(
            target: targets::WIDGET,
            entries = widget.model.len(),
            mode = ?widget.selection.mode(),
            disabled = widget.disabled,
            "select box mounted"
        );
        Ok(widget)
    }

    /// Replace the display renderer using builder pattern.
    pub fn with_renderer(mut self, renderer: impl DisplayRenderer + 'static) -> Self {
        self.set_renderer(renderer);
        self
    }

    /// Replace the display renderer.
    pub fn set_renderer(&mut self, renderer: impl DisplayRenderer + 'static) {
        self.renderer = Box::new(renderer);
        self.refresh_display();
    }

    /// Read the source and rebuild entries, selection and disabled flags.
    fn load_source(&mut self) {
        let (model, selected) = EntryModel::build_with_selection(&self.source.children());
        let mode = self.config.mode.unwrap_or(if self.source.is_multiple() {
            SelectionMode::Multiple
        } else {
            SelectionMode::Single
        });

        self.model = model;
        self.disabled = self.source.is_disabled();
        self.selection = SelectionState::new(mode);
        self.selection.restore(&self.model, &selected);

        // A single-select source keeps one selected option; follow the widget mode.
        if self.selection.is_multiple() != self.source.is_multiple() {
            tracing::debug!(
                target: targets::WIDGET,
                multiple = self.selection.is_multiple(),
                "source multiple flag aligned with selection mode"
            );
            self.source.set_multiple(self.selection.is_multiple());
        }

        if mode == SelectionMode::Single
            && self.selection.is_empty()
            && self.config.select_first_by_default
            && let Some(first) = self.model.first_enabled()
        {
            self.selection.activate(&self.model, first);
        }

        self.sync_source();
        self.refresh_display();
    }

    /// Write every entry's membership to the source `selected` property.
    fn sync_source(&mut self) {
        for index in 0..self.model.len() {
            if !self.selection.is_active(index) {
                self.source.set_selected(index, false);
            }
        }
        for index in self.selection.active_indices().collect::<Vec<_>>() {
            self.source.set_selected(index, true);
        }
    }

    fn refresh_display(&mut self) {
        let active = self.selection.active_entries(&self.model);
        self.display_value = self.renderer.render(&active);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The source control.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the source control.
    ///
    /// Call [`rebuild`](Self::rebuild) after changing its options.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Unmount, returning the source control.
    pub fn into_source(self) -> S {
        self.source
    }

    /// The configuration.
    pub fn config(&self) -> &CarbonBoxConfig {
        &self.config
    }

    /// The entry model.
    pub fn model(&self) -> &EntryModel {
        &self.model
    }

    /// Get an entry by index.
    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.model.get(index)
    }

    /// The selection state.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// The selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    /// Active entry indices in sequence order.
    pub fn active(&self) -> Vec<usize> {
        self.selection.active_indices().collect()
    }

    /// The focused entry index.
    pub fn focused(&self) -> Option<usize> {
        self.focus.get()
    }

    /// The focused entry.
    pub fn focused_entry(&self) -> Option<&Entry> {
        self.focus.get().and_then(|i| self.model.get(i))
    }

    /// The text the head shows.
    pub fn display_value(&self) -> &str {
        &self.display_value
    }

    /// The dropdown state.
    pub fn state(&self) -> DropdownState {
        self.state
    }

    /// Whether the dropdown is shown.
    pub fn is_open(&self) -> bool {
        self.state == DropdownState::Open
    }

    /// Whether the whole control is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// The current type-ahead buffer.
    pub fn search_buffer(&self) -> &str {
        self.search.buffer()
    }

    /// Entries per page for Page Up/Page Down.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Set the page size measured by the presenter (at least 1).
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }

    /// Class list for a widget part, honoring the configured namespace.
    pub fn class_names(&self, key: &str) -> String {
        self.config.class_names(key)
    }

    // =========================================================================
    // Dropdown Control
    // =========================================================================

    /// Show the dropdown. Returns `true` if the state changed.
    pub fn open(&mut self) -> bool {
        if self.disabled || self.state == DropdownState::Open {
            return false;
        }

        self.state = DropdownState::Open;
        tracing::debug!(target: targets::WIDGET, "dropdown opened");
        self.opened.emit(());
        true
    }

    /// Hide the dropdown. Returns `true` if the state changed.
    ///
    /// Drops the focus and the type-ahead buffer. A box layout never closes.
    pub fn close(&mut self) -> bool {
        if self.state == DropdownState::Closed || self.config.layout == Layout::Box {
            return false;
        }

        self.state = DropdownState::Closed;
        self.search.reset(&mut self.timers);
        if self.focus.clear() {
            self.focus_changed.emit(None);
        }
        tracing::debug!(target: targets::WIDGET, "dropdown closed");
        self.closed.emit(());
        true
    }

    /// Open a closed dropdown or close an open one.
    pub fn toggle(&mut self) -> bool {
        match self.state {
            DropdownState::Open => self.close(),
            DropdownState::Closed => self.open(),
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Move the keyboard cursor `step` entries in `direction`.
    ///
    /// Travel starts from the focused entry, or from the active entry when
    /// nothing is focused yet. Returns the newly focused entry, or `None`
    /// when no enabled entry exists.
    pub fn move_focus(&mut self, direction: Direction, step: usize) -> Option<usize> {
        let anchor = self.focus.get().or_else(|| self.selection.current());
        let target = next_focus(&self.model, anchor, direction, step)?;

        tracing::trace!(
            target: targets::NAVIGATION,
            ?anchor,
            ?direction,
            step,
            target,
            "focus moved"
        );
        self.focus_entry(target, Some(direction));
        Some(target)
    }

    /// Focus the first enabled entry.
    pub fn move_to_start(&mut self) -> Option<usize> {
        self.move_focus(Direction::Up, self.model.len())
    }

    /// Focus the last enabled entry.
    pub fn move_to_end(&mut self) -> Option<usize> {
        self.move_focus(Direction::Down, self.model.len())
    }

    /// Move the cursor by one page.
    pub fn move_page(&mut self, direction: Direction) -> Option<usize> {
        self.move_focus(direction, self.page_size)
    }

    /// Focus an entry, optionally asking the presenter to scroll to it.
    fn focus_entry(&mut self, index: usize, scroll: Option<Direction>) {
        if self.focus.set(&self.model, index) {
            self.focus_changed.emit(Some(index));
        }
        if let Some(direction) = scroll {
            self.scroll_requested.emit(ScrollRequest { index, direction });
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Activate an entry.
    ///
    /// Single mode makes the entry the only active one, closes the dropdown
    /// and leaves the cursor on it. Multiple mode toggles the entry and
    /// keeps the dropdown open. The source `selected` flags follow the
    /// selection, and a change notification is emitted when membership
    /// changed (or always, with `notify_unchanged`).
    ///
    /// Disabled, absent or control-disabled activations are silent no-ops
    /// returning `None`.
    pub fn activate(&mut self, index: usize) -> Option<Activation> {
        if self.disabled {
            return None;
        }
        let Some(activation) = self.selection.activate(&self.model, index) else {
            tracing::trace!(target: targets::WIDGET, index, "activation ignored");
            return None;
        };

        if let Some(previous) = activation.deselected {
            self.source.set_selected(previous, false);
        }
        self.source.set_selected(index, activation.active);
        self.refresh_display();

        tracing::debug!(
            target: targets::WIDGET,
            index,
            active = activation.active,
            changed = activation.changed,
            value = %self.display_value,
            "entry activated"
        );

        if activation.changed || self.config.notify_unchanged {
            self.source.notify_change();
            self.changed.emit(ChangeEvent {
                index,
                active: activation.active,
                value: self.display_value.clone(),
            });
        }

        if self.selection.mode() == SelectionMode::Single {
            self.close();
            self.focus_entry(index, None);
        }

        Some(activation)
    }

    /// Activate the focused entry. Returns `false` when nothing is focused.
    pub fn confirm(&mut self) -> bool {
        match self.focus.get() {
            Some(index) => self.activate(index).is_some(),
            None => false,
        }
    }

    // =========================================================================
    // Type-ahead
    // =========================================================================

    /// Feed one type-ahead character using the system clock.
    pub fn type_character(&mut self, ch: char) -> Option<usize> {
        self.type_character_at(ch, Instant::now())
    }

    /// Feed one type-ahead character at a given time.
    ///
    /// Focuses (without activating) the first enabled entry whose label
    /// starts with the accumulated buffer.
    pub fn type_character_at(&mut self, ch: char, now: Instant) -> Option<usize> {
        if self.disabled {
            return None;
        }
        self.process_timers(now);

        let previous = self.focus.get();
        let found = self
            .search
            .type_character(&self.model, ch, now, &mut self.timers)?;

        let direction = match previous {
            Some(p) if found < p => Direction::Up,
            _ => Direction::Down,
        };
        self.focus_entry(found, Some(direction));
        Some(found)
    }

    /// Fire timers due at `now`. Returns `true` if the search buffer expired.
    ///
    /// Hosts call this from their event loop, using
    /// [`time_until_next_timer`](Self::time_until_next_timer) to schedule
    /// the wake-up.
    pub fn process_timers(&mut self, now: Instant) -> bool {
        let fired = self.timers.process_expired(now);
        self.search.handle_timers(&fired)
    }

    /// How long until the next timer of this instance fires.
    pub fn time_until_next_timer(&mut self, now: Instant) -> Option<Duration> {
        self.timers.time_until_next(now)
    }

    // =========================================================================
    // Input Dispatch
    // =========================================================================

    /// Handle a key press using the system clock.
    pub fn handle_key_press(&mut self, event: &KeyPressEvent) -> bool {
        self.handle_key_press_at(event, Instant::now())
    }

    /// Handle a key press. Returns `true` if the event was consumed.
    ///
    /// While closed, Enter, Space and ArrowDown open the dropdown. While
    /// open, arrows, paging keys, Home and End move the cursor, Enter and Tab
    /// activate the focused entry, Escape closes, and printable characters
    /// feed type-ahead.
    pub fn handle_key_press_at(&mut self, event: &KeyPressEvent, now: Instant) -> bool {
        if self.disabled {
            return false;
        }

        if self.state == DropdownState::Closed {
            return match event.key {
                Key::Enter | Key::Space | Key::ArrowDown => self.open(),
                _ => false,
            };
        }

        match event.key {
            Key::ArrowUp => {
                self.move_focus(Direction::Up, 1);
                true
            }
            Key::ArrowDown => {
                self.move_focus(Direction::Down, 1);
                true
            }
            Key::PageUp => {
                self.move_page(Direction::Up);
                true
            }
            Key::PageDown => {
                self.move_page(Direction::Down);
                true
            }
            Key::Home => {
                self.move_to_start();
                true
            }
            Key::End => {
                self.move_to_end();
                true
            }
            Key::Escape => {
                self.close();
                true
            }
            Key::Enter | Key::Tab => self.confirm(),
            Key::Space | Key::Other => match event.printable() {
                Some(ch) => {
                    self.type_character_at(ch, now);
                    true
                }
                None => false,
            },
        }
    }

    /// Handle a pointer click inside the widget.
    pub fn handle_click(&mut self, target: ClickTarget) -> bool {
        if self.disabled {
            return false;
        }

        match target {
            ClickTarget::Head => self.toggle(),
            ClickTarget::Entry(index) => self.activate(index).is_some(),
            ClickTarget::GroupHeader => false,
        }
    }

    /// Handle the pointer entering an entry row.
    ///
    /// Moves the cursor to enabled entries without scrolling.
    pub fn handle_hover(&mut self, index: usize) -> bool {
        if self.state != DropdownState::Open || !self.model.is_enabled(index) {
            return false;
        }
        let changed = self.focus.set(&self.model, index);
        if changed {
            self.focus_changed.emit(Some(index));
        }
        changed
    }

    /// Record the screen regions the widget occupies.
    ///
    /// Presenters update this whenever the head or dropdown moves.
    pub fn set_bounds(&mut self, bounds: impl IntoIterator<Item = Rect>) {
        self.bounds = bounds.into_iter().collect();
    }

    /// Whether a point lies within the widget.
    pub fn contains_point(&self, point: Point) -> bool {
        self.bounds.iter().any(|r| r.contains(point))
    }

    /// Close the dropdown if a document click landed outside the widget.
    pub fn handle_document_click(&mut self, point: Point) -> bool {
        !self.contains_point(point) && self.close()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Re-read the source control.
    ///
    /// Re-syncs entries, disabled flags and pre-selection. Focus survives
    /// only if it still points at an enabled entry. A control that became
    /// disabled is closed.
    pub fn rebuild(&mut self) {
        self.search.reset(&mut self.timers);
        self.load_source();

        if self.focus.revalidate(&self.model) {
            self.focus_changed.emit(None);
        }
        if self.disabled {
            self.close();
        }

        tracing::debug!(
            target: targets::WIDGET,
            entries = self.model.len(),
            "select box rebuilt"
        );
    }
}
