//! Model of the barcode input widget.
//!
//! Wedge scanners emulate a keyboard: the scanned payload arrives as a
//! burst of character keystrokes terminated by Enter. The widget buffers
//! characters while focused and enabled, and hands the completed payload to
//! the dialog on the terminator instead of letting it submit a form. After
//! every submission the buffer is cleared and focus retained, so repeated
//! scans need no pointer interaction.

/// A keystroke delivered to the input widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    Char(char),
    /// Terminator emitted by the scanner (Enter / carriage return).
    Enter,
}

/// Single-line text field fed by a wedge scanner.
#[derive(Debug, Clone)]
pub struct BarcodeInput {
    buffer: String,
    placeholder: String,
    hint: String,
    enabled: bool,
    focused: bool,
}

impl BarcodeInput {
    pub fn new(placeholder: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            placeholder: placeholder.into(),
            hint: hint.into(),
            enabled: true,
            focused: false,
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn hint(&self) -> &str {
        &self.hint
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Disable the input while a request is in flight. The buffer is kept;
    /// only new keystrokes are rejected.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Feed one keystroke.
    ///
    /// Returns the raw accumulated payload when the terminator arrives; the
    /// buffer is cleared and focus retained so the next scan lands in an
    /// empty field. The payload is not trimmed here, the dialog decides
    /// whether it is worth submitting.
    pub fn key(&mut self, key: InputKey) -> Option<String> {
        if !self.enabled || !self.focused {
            return None;
        }

        match key {
            InputKey::Char(c) => {
                self.buffer.push(c);
                None
            }
            InputKey::Enter => {
                let payload = std::mem::take(&mut self.buffer);
                self.focus();
                Some(payload)
            }
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
