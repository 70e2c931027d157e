//! Debounced product-search input with a suggestion popup.
//!
//! Keystrokes never hit the network directly. Each edit bumps a generation
//! counter and asks the owner to schedule a fetch after a quiet interval;
//! the timer firing and the response both carry the generation they were
//! issued for, and anything that is no longer the newest generation is
//! dropped. That single rule covers both debouncing (a superseded timer
//! never fetches) and response ordering (a slow early response can never
//! overwrite a later one).

use std::time::Duration;

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Widget;

use dermascan_api::Suggestion;

use crate::forms::TextField;
use crate::scroll_state::ScrollState;

/// Quiet interval between the last keystroke and the suggestion fetch.
pub const SUGGESTION_DEBOUNCE: Duration = Duration::from_millis(300);

/// Most suggestion rows shown at once.
pub const MAX_SUGGESTION_ROWS: usize = 8;

/// What the owner must do after the field handled an input or event.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchAction {
    None,
    /// Start the quiet-interval timer for this generation/query.
    ScheduleFetch { generation: u64, query: String },
    /// Run a full (non-suggestion) product search for this term.
    Search(String),
}

pub struct SearchField {
    input: TextField,
    suggestions: Vec<Suggestion>,
    dropdown_visible: bool,
    state: ScrollState,
    /// Newest issued debounce/fetch token. Bumped on every edit.
    generation: u64,
    focused: bool,
}

impl SearchField {
    pub fn new() -> Self {
        Self {
            input: TextField::new("Search"),
            suggestions: Vec::new(),
            dropdown_visible: false,
            state: ScrollState::new(),
            generation: 0,
            focused: false,
        }
    }

    #[cfg(test)]
    pub fn query(&self) -> &str {
        self.input.value()
    }

    pub fn dropdown_visible(&self) -> bool {
        self.dropdown_visible
    }

    #[cfg(test)]
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Focus changes: losing focus hides the dropdown but keeps the cached
    /// results; regaining focus re-shows them if any are cached.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if focused {
            self.dropdown_visible = !self.suggestions.is_empty();
        } else {
            self.dropdown_visible = false;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> SearchAction {
        match key.code {
            KeyCode::Up if self.dropdown_visible => {
                self.state.move_up_wrap(self.suggestions.len());
                self.state
                    .ensure_visible(self.suggestions.len(), MAX_SUGGESTION_ROWS);
                SearchAction::None
            }
            KeyCode::Down if self.dropdown_visible => {
                self.state.move_down_wrap(self.suggestions.len());
                self.state
                    .ensure_visible(self.suggestions.len(), MAX_SUGGESTION_ROWS);
                SearchAction::None
            }
            KeyCode::Esc if self.dropdown_visible => {
                self.dropdown_visible = false;
                SearchAction::None
            }
            KeyCode::Enter => {
                if self.dropdown_visible
                    && let Some(idx) = self.state.selected_idx
                    && let Some(suggestion) = self.suggestions.get(idx).cloned()
                {
                    return self.select_suggestion(&suggestion);
                }
                let term = self.input.value().trim().to_string();
                if term.is_empty() {
                    return SearchAction::None;
                }
                self.dropdown_visible = false;
                SearchAction::Search(term)
            }
            _ => {
                if self.input.handle_key(key) {
                    self.on_query_edited()
                } else {
                    SearchAction::None
                }
            }
        }
    }

    /// A suggestion was chosen: its display name replaces the query text,
    /// the dropdown closes, and a full search runs for that name.
    fn select_suggestion(&mut self, suggestion: &Suggestion) -> SearchAction {
        self.input.set_value(suggestion.product_name.clone());
        self.dropdown_visible = false;
        // The replaced text must not re-trigger the debounce timer.
        self.generation += 1;
        SearchAction::Search(suggestion.product_name.clone())
    }

    fn on_query_edited(&mut self) -> SearchAction {
        self.generation += 1;
        self.state.reset();
        let query = self.input.value().trim().to_string();
        if query.is_empty() {
            self.suggestions.clear();
            self.dropdown_visible = false;
            return SearchAction::None;
        }
        SearchAction::ScheduleFetch {
            generation: self.generation,
            query,
        }
    }

    /// Whether a debounce firing for `generation` is still the newest one.
    pub fn debounce_is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Apply a completed lookup. Results for anything but the newest
    /// generation are dropped.
    pub fn on_suggestions(&mut self, generation: u64, suggestions: Vec<Suggestion>) {
        if generation != self.generation {
            tracing::debug!(generation, "dropping stale suggestion results");
            return;
        }
        self.suggestions = suggestions;
        self.state.clamp_selection(self.suggestions.len());
        self.dropdown_visible = self.focused && !self.suggestions.is_empty();
    }

    /// Reset the field entirely (navigation away from the browse view).
    pub fn clear(&mut self) {
        self.input.clear();
        self.suggestions.clear();
        self.dropdown_visible = false;
        self.state.reset();
        self.generation += 1;
    }

    pub fn input_line(&self) -> Line<'static> {
        let mut spans: Vec<Span<'static>> = vec!["⌕ ".dim()];
        if self.input.value().is_empty() && !self.focused {
            spans.push("Search products".dim().italic());
        } else {
            spans.extend(self.input.value_spans(self.focused));
        }
        Line::from(spans)
    }

    /// Rows the dropdown needs below the input, capped.
    pub fn dropdown_height(&self) -> u16 {
        if !self.dropdown_visible {
            return 0;
        }
        self.suggestions.len().min(MAX_SUGGESTION_ROWS) as u16
    }

    pub fn render_dropdown(&self, area: Rect, buf: &mut Buffer) {
        if !self.dropdown_visible || area.height == 0 {
            return;
        }
        let visible = MAX_SUGGESTION_ROWS.min(area.height as usize);
        let top = self.state.scroll_top.min(
            self.suggestions
                .len()
                .saturating_sub(visible),
        );
        for (row, (idx, suggestion)) in self
            .suggestions
            .iter()
            .enumerate()
            .skip(top)
            .take(visible)
            .enumerate()
        {
            let selected = self.state.selected_idx == Some(idx);
            let line = if selected {
                Line::from(format!("▸ {}", suggestion.product_name)).reversed()
            } else {
                Line::from(format!("  {}", suggestion.product_name))
            };
            let row_area = Rect {
                y: area.y + row as u16,
                height: 1,
                ..area
            };
            line.render(row_area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;
    use crossterm::event::KeyEventState;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_str(field: &mut SearchField, text: &str) -> Vec<SearchAction> {
        text.chars()
            .map(|c| field.handle_key(key(KeyCode::Char(c))))
            .collect()
    }

    fn suggestion(id: i64, name: &str) -> Suggestion {
        Suggestion {
            product_id: id,
            product_name: name.to_string(),
        }
    }

    #[test]
    fn each_keystroke_supersedes_the_previous_timer() {
        let mut field = SearchField::new();
        field.set_focused(true);
        let actions = type_str(&mut field, "aloe");

        // Four schedules were requested, one per keystroke...
        let generations: Vec<u64> = actions
            .iter()
            .map(|action| match action {
                SearchAction::ScheduleFetch { generation, .. } => *generation,
                other => panic!("expected schedule, got {other:?}"),
            })
            .collect();
        assert_eq!(generations, vec![1, 2, 3, 4]);

        // ...but only the newest one may actually fetch.
        assert!(!field.debounce_is_current(3));
        assert!(field.debounce_is_current(4));
        assert_eq!(
            actions.last(),
            Some(&SearchAction::ScheduleFetch {
                generation: 4,
                query: "aloe".to_string()
            })
        );
    }

    #[test]
    fn clearing_the_query_hides_dropdown_without_fetch() {
        let mut field = SearchField::new();
        field.set_focused(true);
        type_str(&mut field, "a");
        field.on_suggestions(1, vec![suggestion(1, "aloe gel")]);
        assert!(field.dropdown_visible());

        let action = field.handle_key(key(KeyCode::Backspace));
        assert_eq!(action, SearchAction::None);
        assert!(!field.dropdown_visible());
        assert!(field.suggestions().is_empty());
    }

    #[test]
    fn whitespace_only_query_schedules_nothing() {
        let mut field = SearchField::new();
        field.set_focused(true);
        let actions = type_str(&mut field, "  ");
        assert_eq!(actions, vec![SearchAction::None, SearchAction::None]);
    }

    #[test]
    fn stale_responses_never_replace_newer_ones() {
        let mut field = SearchField::new();
        field.set_focused(true);
        type_str(&mut field, "al");

        // The slow response for generation 1 arrives after generation 2
        // already applied.
        field.on_suggestions(2, vec![suggestion(2, "aloe toner")]);
        field.on_suggestions(1, vec![suggestion(1, "almond oil")]);

        let names: Vec<&str> = field
            .suggestions()
            .iter()
            .map(|s| s.product_name.as_str())
            .collect();
        assert_eq!(names, vec!["aloe toner"]);
    }

    #[test]
    fn failed_lookup_suppresses_dropdown() {
        let mut field = SearchField::new();
        field.set_focused(true);
        type_str(&mut field, "al");
        field.on_suggestions(2, vec![suggestion(1, "aloe gel")]);
        assert!(field.dropdown_visible());

        type_str(&mut field, "o");
        // Failure path: the task reports an empty list.
        field.on_suggestions(3, Vec::new());
        assert!(!field.dropdown_visible());
        assert!(field.suggestions().is_empty());
    }

    #[test]
    fn selecting_a_suggestion_searches_its_name() {
        let mut field = SearchField::new();
        field.set_focused(true);
        type_str(&mut field, "alo");
        field.on_suggestions(3, vec![suggestion(7, "Aloe Vera Gel")]);

        field.handle_key(key(KeyCode::Down));
        let action = field.handle_key(key(KeyCode::Enter));
        assert_eq!(action, SearchAction::Search("Aloe Vera Gel".to_string()));
        assert_eq!(field.query(), "Aloe Vera Gel");
        assert!(!field.dropdown_visible());
        // The programmatic text replacement must not leave a live timer.
        assert!(!field.debounce_is_current(3));
    }

    #[test]
    fn enter_without_selection_runs_full_search() {
        let mut field = SearchField::new();
        field.set_focused(true);
        type_str(&mut field, "aloe ");
        let action = field.handle_key(key(KeyCode::Enter));
        assert_eq!(action, SearchAction::Search("aloe".to_string()));
    }

    #[test]
    fn blur_hides_and_focus_restores_cached_results() {
        let mut field = SearchField::new();
        field.set_focused(true);
        type_str(&mut field, "a");
        field.on_suggestions(1, vec![suggestion(1, "aloe gel")]);
        assert!(field.dropdown_visible());

        field.set_focused(false);
        assert!(!field.dropdown_visible());
        assert_eq!(field.suggestions().len(), 1);

        field.set_focused(true);
        assert!(field.dropdown_visible());
    }

    #[test]
    fn results_arriving_while_blurred_stay_hidden() {
        let mut field = SearchField::new();
        field.set_focused(true);
        type_str(&mut field, "a");
        field.set_focused(false);
        field.on_suggestions(1, vec![suggestion(1, "aloe gel")]);
        assert!(!field.dropdown_visible());
    }
}
