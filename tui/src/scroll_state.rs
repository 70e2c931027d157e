/// Generic list cursor + scroll window shared by popups and card lists.
///
/// `selected_idx` is an index into the full item list; `scroll_top` is the
/// first visible row. Callers pass the current list length on every mutation
/// so the state can never point past the end after a refetch shrinks the
/// list.
#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    pub selected_idx: Option<usize>,
    pub scroll_top: usize,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.selected_idx = None;
        self.scroll_top = 0;
    }

    pub fn move_up_wrap(&mut self, len: usize) {
        if len == 0 {
            self.selected_idx = None;
            return;
        }
        self.selected_idx = Some(match self.selected_idx {
            Some(0) | None => len - 1,
            Some(idx) => idx - 1,
        });
    }

    pub fn move_down_wrap(&mut self, len: usize) {
        if len == 0 {
            self.selected_idx = None;
            return;
        }
        self.selected_idx = Some(match self.selected_idx {
            None => 0,
            Some(idx) if idx + 1 >= len => 0,
            Some(idx) => idx + 1,
        });
    }

    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.reset();
            return;
        }
        if let Some(idx) = self.selected_idx
            && idx >= len
        {
            self.selected_idx = Some(len - 1);
        }
    }

    /// Adjust `scroll_top` so the selection sits inside the visible window.
    pub fn ensure_visible(&mut self, len: usize, visible: usize) {
        if visible == 0 || len == 0 {
            self.scroll_top = 0;
            return;
        }
        let Some(idx) = self.selected_idx else {
            return;
        };
        if idx < self.scroll_top {
            self.scroll_top = idx;
        } else if idx >= self.scroll_top + visible {
            self.scroll_top = idx + 1 - visible;
        }
        let max_top = len.saturating_sub(visible);
        if self.scroll_top > max_top {
            self.scroll_top = max_top;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wraps_both_directions() {
        let mut state = ScrollState::new();
        state.move_down_wrap(3);
        assert_eq!(state.selected_idx, Some(0));
        state.move_up_wrap(3);
        assert_eq!(state.selected_idx, Some(2));
        state.move_down_wrap(3);
        assert_eq!(state.selected_idx, Some(0));
    }

    #[test]
    fn clamps_after_shrink() {
        let mut state = ScrollState::new();
        state.selected_idx = Some(5);
        state.clamp_selection(3);
        assert_eq!(state.selected_idx, Some(2));
        state.clamp_selection(0);
        assert_eq!(state.selected_idx, None);
    }

    #[test]
    fn keeps_selection_visible() {
        let mut state = ScrollState::new();
        state.selected_idx = Some(9);
        state.ensure_visible(10, 4);
        assert_eq!(state.scroll_top, 6);
        state.selected_idx = Some(2);
        state.ensure_visible(10, 4);
        assert_eq!(state.scroll_top, 2);
    }
}
