//! Input events the presenter forwards to the select box.

/// Keys the select box reacts to.
///
/// Printable input travels in [`KeyPressEvent::text`]; keys without a
/// dedicated variant arrive as [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // Navigation
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,

    // Confirmation
    Enter,
    Tab,
    Escape,

    // Whitespace
    Space,

    /// A character key or any key not listed above.
    Other,
}

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardModifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyboardModifiers {
    /// Whether a command-style modifier (Ctrl, Alt, Meta) is held.
    ///
    /// Shortcuts with these modifiers are never treated as type-ahead input.
    pub fn has_command(&self) -> bool {
        self.control || self.alt || self.meta
    }
}

/// A key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPressEvent {
    /// The logical key.
    pub key: Key,
    /// Text produced by the key, empty for non-printing keys.
    pub text: String,
    /// Modifier state at the time of the press.
    pub modifiers: KeyboardModifiers,
}

impl KeyPressEvent {
    /// A press of a non-printing key without modifiers.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            text: String::new(),
            modifiers: KeyboardModifiers::default(),
        }
    }

    /// A press of a printable character key.
    pub fn character(ch: char) -> Self {
        let key = if ch == ' ' { Key::Space } else { Key::Other };
        Self {
            key,
            text: ch.to_string(),
            modifiers: KeyboardModifiers::default(),
        }
    }

    /// Set modifiers using builder pattern.
    pub fn with_modifiers(mut self, modifiers: KeyboardModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// The printable character carried by this press, if any.
    pub fn printable(&self) -> Option<char> {
        if self.modifiers.has_command() {
            return None;
        }
        let mut chars = self.text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if !ch.is_control() => Some(ch),
            _ => None,
        }
    }
}

/// What a pointer click landed on, as resolved by the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The always-visible head showing the current value.
    Head,
    /// An entry row in the dropdown list.
    Entry(usize),
    /// A group header row.
    GroupHeader,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable() {
        assert_eq!(KeyPressEvent::character('g').printable(), Some('g'));
        assert_eq!(KeyPressEvent::character(' ').printable(), Some(' '));
        assert_eq!(KeyPressEvent::new(Key::Enter).printable(), None);

        let ctrl = KeyboardModifiers {
            control: true,
            ..Default::default()
        };
        assert_eq!(
            KeyPressEvent::character('a').with_modifiers(ctrl).printable(),
            None
        );
    }
}
