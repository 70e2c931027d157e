//! Single-line form inputs and validation helpers.
//!
//! Deliberately much simpler than a full textarea: every form in the app is
//! a stack of labeled single-line fields, so all we need is char-boundary
//! aware cursor editing, optional masking for passwords, and a way to list
//! which required fields are still empty.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;

use dermascan_api::SkinType;

#[derive(Debug, Clone)]
pub struct TextField {
    label: &'static str,
    value: String,
    /// Byte offset into `value`, always on a char boundary.
    cursor: usize,
    masked: bool,
}

impl TextField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            cursor: 0,
            masked: false,
        }
    }

    pub fn masked(label: &'static str) -> Self {
        Self {
            masked: true,
            ..Self::new(label)
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn toggle_masked(&mut self) {
        self.masked = !self.masked;
    }

    /// Apply one key event. Returns true when the event edited or moved
    /// within the field (so the caller knows it was consumed).
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.value.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                true
            }
            KeyCode::Backspace => {
                if let Some((idx, c)) = self.value[..self.cursor].char_indices().next_back() {
                    self.value.remove(idx);
                    self.cursor -= c.len_utf8();
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor < self.value.len() {
                    self.value.remove(self.cursor);
                }
                true
            }
            KeyCode::Left => {
                if let Some((idx, _)) = self.value[..self.cursor].char_indices().next_back() {
                    self.cursor = idx;
                }
                true
            }
            KeyCode::Right => {
                if let Some(c) = self.value[self.cursor..].chars().next() {
                    self.cursor += c.len_utf8();
                }
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.value.len();
                true
            }
            _ => false,
        }
    }

    /// Render as `label: value`, with a block cursor when focused and
    /// bullets instead of characters when masked.
    pub fn display_line(&self, focused: bool) -> Line<'static> {
        let mut spans: Vec<Span<'static>> = Vec::new();
        let label = format!("{}: ", self.label);
        spans.push(if focused {
            label.bold()
        } else {
            label.dim()
        });
        spans.extend(self.value_spans(focused));
        Line::from(spans)
    }

    pub fn value_spans(&self, focused: bool) -> Vec<Span<'static>> {
        let shown: String = if self.masked {
            self.value.chars().map(|_| '•').collect()
        } else {
            self.value.clone()
        };
        if !focused {
            return vec![Span::raw(shown)];
        }

        // The mask substitution is one bullet per char, so the cursor's char
        // position maps directly between the raw and shown strings.
        let cursor_chars = self.value[..self.cursor].chars().count();
        let cursor_byte = shown
            .char_indices()
            .nth(cursor_chars)
            .map_or(shown.len(), |(idx, _)| idx);
        let before = shown[..cursor_byte].to_string();
        let mut rest = shown[cursor_byte..].chars();
        let at = rest.next();
        let after: String = rest.collect();

        let mut spans = vec![Span::raw(before)];
        match at {
            Some(c) => spans.push(Span::raw(c.to_string()).reversed()),
            None => spans.push(Span::raw(" ").reversed()),
        }
        spans.push(Span::raw(after));
        spans
    }
}

/// Fixed-option skin-type selector, cycled with Left/Right/Space.
#[derive(Debug, Clone)]
pub struct SkinSelect {
    options: &'static [SkinType],
    selected: Option<usize>,
}

impl SkinSelect {
    pub fn new(options: &'static [SkinType]) -> Self {
        Self {
            options,
            selected: None,
        }
    }

    pub fn value(&self) -> Option<SkinType> {
        self.selected.map(|idx| self.options[idx])
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Right | KeyCode::Char(' ') => {
                self.selected = Some(match self.selected {
                    None => 0,
                    Some(idx) => (idx + 1) % self.options.len(),
                });
                true
            }
            KeyCode::Left => {
                self.selected = Some(match self.selected {
                    None => self.options.len() - 1,
                    Some(0) => self.options.len() - 1,
                    Some(idx) => idx - 1,
                });
                true
            }
            _ => false,
        }
    }

    pub fn display_line(&self, label: &'static str, focused: bool) -> Line<'static> {
        let label = format!("{label}: ");
        let value = match self.value() {
            Some(skin_type) => skin_type.label().to_string(),
            None => "-- Select --".to_string(),
        };
        let mut spans: Vec<Span<'static>> = Vec::new();
        spans.push(if focused { label.bold() } else { label.dim() });
        spans.push(if focused {
            format!("< {value} >").reversed()
        } else {
            Span::raw(value)
        });
        Line::from(spans)
    }
}

/// Advance or retreat a focus index over `len` slots, wrapping.
pub fn cycle_focus(focus: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (focus + 1) % len
    } else if focus == 0 {
        len - 1
    } else {
        focus - 1
    }
}

/// Labels of required fields whose values are blank, in declaration order.
pub fn missing_fields<'a>(fields: &[(&'a str, &str)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| *label)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;
    use crossterm::event::KeyEventState;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn edits_at_cursor() {
        let mut field = TextField::new("Name");
        for c in "ale".chars() {
            field.handle_key(key(KeyCode::Char(c)));
        }
        field.handle_key(key(KeyCode::Left));
        field.handle_key(key(KeyCode::Char('o')));
        assert_eq!(field.value(), "aloe");
        field.handle_key(key(KeyCode::End));
        field.handle_key(key(KeyCode::Backspace));
        assert_eq!(field.value(), "alo");
    }

    #[test]
    fn handles_multibyte_input() {
        let mut field = TextField::new("Name");
        field.set_value("crème");
        field.handle_key(key(KeyCode::Left));
        field.handle_key(key(KeyCode::Left));
        field.handle_key(key(KeyCode::Backspace));
        assert_eq!(field.value(), "crme");
    }

    #[test]
    fn masked_field_hides_value() {
        let mut field = TextField::masked("Password");
        field.set_value("secret");
        let spans = field.value_spans(false);
        assert_eq!(spans[0].content.as_ref(), "••••••");
        field.toggle_masked();
        let spans = field.value_spans(false);
        assert_eq!(spans[0].content.as_ref(), "secret");
    }

    #[test]
    fn skin_select_cycles_and_wraps() {
        let mut select = SkinSelect::new(&SkinType::FILTERABLE);
        assert_eq!(select.value(), None);
        select.handle_key(key(KeyCode::Left));
        assert_eq!(select.value(), Some(SkinType::Sensitive));
        select.handle_key(key(KeyCode::Right));
        assert_eq!(select.value(), Some(SkinType::Oily));
    }

    #[test]
    fn missing_fields_lists_blank_labels_in_order() {
        let missing = missing_fields(&[
            ("Product Name", "Calm Serum"),
            ("Product Description", "  "),
            ("Price", ""),
            ("Brand Name", "Derma"),
        ]);
        assert_eq!(missing, vec!["Product Description", "Price"]);
    }

    #[test]
    fn focus_cycles_both_ways() {
        assert_eq!(cycle_focus(2, 3, true), 0);
        assert_eq!(cycle_focus(0, 3, false), 2);
    }
}
