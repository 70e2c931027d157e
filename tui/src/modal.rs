//! App-owned modal dialogs.
//!
//! One modal at a time, owned by normal render state and drawn over the
//! active screen. Confirm modals carry the action they are guarding so the
//! app can dispatch it when the user accepts.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::layout::Flex;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Clear;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;

use crate::app_event::ProductStatus;

/// Action guarded by a confirm dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteProduct {
        product_id: i64,
        status: ProductStatus,
    },
    DeleteAccount,
}

#[derive(Debug)]
pub enum Modal {
    Info { title: String, message: String },
    Error { message: String },
    Confirm { message: String, action: PendingAction },
}

/// What the app should do after the modal consumed a key.
#[derive(Debug, PartialEq, Eq)]
pub enum ModalOutcome {
    Open,
    Dismissed,
    Confirmed(PendingAction),
}

impl Modal {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Modal::Info {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Modal::Error {
            message: message.into(),
        }
    }

    pub fn confirm(message: impl Into<String>, action: PendingAction) -> Self {
        Modal::Confirm {
            message: message.into(),
            action,
        }
    }

    pub fn handle_key(&self, key: KeyEvent) -> ModalOutcome {
        match self {
            Modal::Info { .. } | Modal::Error { .. } => match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => ModalOutcome::Dismissed,
                _ => ModalOutcome::Open,
            },
            Modal::Confirm { action, .. } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    ModalOutcome::Confirmed(action.clone())
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => ModalOutcome::Dismissed,
                _ => ModalOutcome::Open,
            },
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let (title, message, hint) = match self {
            Modal::Info { title, message } => {
                (title.as_str(), message.as_str(), "press Enter to continue")
            }
            Modal::Error { message } => ("Error", message.as_str(), "press Enter to continue"),
            Modal::Confirm { message, .. } => {
                ("Confirm", message.as_str(), "y confirm · n cancel")
            }
        };

        let area = centered(frame.area(), 56, 9);
        frame.render_widget(Clear, area);
        let block = Block::bordered().title(Line::from(title.to_string().bold()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [message_area, hint_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);
        frame.render_widget(
            Paragraph::new(message.to_string()).wrap(Wrap { trim: false }),
            message_area,
        );
        frame.render_widget(Line::from(hint.dim()).centered(), hint_area);
    }
}

/// Center a fixed-size box inside `area`, shrinking to fit.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    area
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

    #[test]
    fn info_dismisses_on_enter_only() {
        let modal = Modal::info("Done", "Saved.");
        assert_eq!(modal.handle_key(key(KeyCode::Char('x'))), ModalOutcome::Open);
        assert_eq!(modal.handle_key(key(KeyCode::Enter)), ModalOutcome::Dismissed);
    }

    #[test]
    fn confirm_returns_its_action_on_accept() {
        let action = PendingAction::DeleteProduct {
            product_id: 3,
            status: ProductStatus::Rejected,
        };
        let modal = Modal::confirm("Delete this product?", action.clone());
        assert_eq!(
            modal.handle_key(key(KeyCode::Char('y'))),
            ModalOutcome::Confirmed(action)
        );
        assert_eq!(modal.handle_key(key(KeyCode::Esc)), ModalOutcome::Dismissed);
    }
}
