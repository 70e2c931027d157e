//! Role selection and the seller login/signup forms.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use ratatui::Frame;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;

use dermascan_api as api;
use dermascan_api::RegisterRequest;

use crate::forms::TextField;
use crate::forms::cycle_focus;
use crate::forms::missing_fields;
use crate::modal::centered;
use crate::screens::Ctx;
use crate::screens::Nav;
use crate::tasks;
use crate::ui_colors::ACCENT;

/// Two-option role picker shown after the splash.
#[derive(Debug, Default)]
pub struct RoleSelectScreen {
    selected: usize,
}

impl RoleSelectScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Nav {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down | KeyCode::Tab => {
                self.selected = 1 - self.selected;
                Nav::None
            }
            KeyCode::Char('b') | KeyCode::Char('B') => Nav::BuyerEntry,
            KeyCode::Char('s') | KeyCode::Char('S') => Nav::SellerEntry,
            KeyCode::Enter => {
                if self.selected == 0 {
                    Nav::BuyerEntry
                } else {
                    Nav::SellerEntry
                }
            }
            _ => Nav::None,
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = centered(frame.area(), 44, 9);
        let block = Block::bordered().title(Line::from("dermascan".bold().fg(ACCENT)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let buyer = if self.selected == 0 {
            "▸ Buyer ◂".bold().reversed()
        } else {
            "  Buyer  ".into()
        };
        let seller = if self.selected == 1 {
            "▸ Seller ◂".bold().reversed()
        } else {
            "  Seller  ".into()
        };
        let lines = vec![
            Line::from("Get in as!".bold()).centered(),
            Line::default(),
            Line::from(buyer).centered(),
            Line::from(seller).centered(),
            Line::default(),
            Line::from("↑/↓ choose · Enter continue · Ctrl+C quit".dim()).centered(),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

#[derive(Debug)]
pub struct SellerLoginScreen {
    email: TextField,
    password: TextField,
    focus: usize,
    error: Option<String>,
    in_flight: bool,
}

impl SellerLoginScreen {
    pub fn new() -> Self {
        Self {
            email: TextField::new("Email"),
            password: TextField::masked("Password"),
            focus: 0,
            error: None,
            in_flight: false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut Ctx) -> Nav {
        match key.code {
            KeyCode::Esc => return Nav::RoleSelect,
            KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Nav::SellerSignup;
            }
            KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.password.toggle_masked();
                return Nav::None;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus = cycle_focus(self.focus, 2, true);
                return Nav::None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = cycle_focus(self.focus, 2, false);
                return Nav::None;
            }
            KeyCode::Enter => {
                self.submit(ctx);
                return Nav::None;
            }
            _ => {}
        }
        let field = if self.focus == 0 {
            &mut self.email
        } else {
            &mut self.password
        };
        field.handle_key(key);
        Nav::None
    }

    fn submit(&mut self, ctx: &mut Ctx) {
        if self.in_flight {
            return;
        }
        let missing = missing_fields(&[
            ("Email", self.email.value()),
            ("Password", self.password.value()),
        ]);
        if !missing.is_empty() {
            self.error = Some(format!("Please fill out: {}", missing.join(", ")));
            return;
        }
        self.error = None;
        self.in_flight = true;
        tasks::spawn_login(
            ctx.client,
            ctx.tx,
            self.email.value().trim().to_string(),
            self.password.value().to_string(),
        );
    }

    /// Login failed; show the service's message inline and allow a retry.
    pub fn on_login_failed(&mut self, error: &api::Error) {
        self.in_flight = false;
        self.error = Some(error.to_string());
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = centered(frame.area(), 52, 12);
        let block = Block::bordered().title(Line::from("Seller Login".bold().fg(ACCENT)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![
            Line::default(),
            self.email.display_line(self.focus == 0),
            self.password.display_line(self.focus == 1),
            Line::default(),
        ];
        if self.in_flight {
            lines.push(Line::from("Signing in…".dim()));
        } else if let Some(error) = &self.error {
            lines.push(Line::from(error.clone().red()));
        } else {
            lines.push(Line::default());
        }
        lines.push(Line::default());
        lines.push(
            Line::from("Enter log in · Ctrl+T show password · Ctrl+N sign up · Esc back".dim()),
        );
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

#[derive(Debug)]
pub struct SellerSignupScreen {
    name: TextField,
    email: TextField,
    password: TextField,
    business_license_id: TextField,
    seller_phno: TextField,
    focus: usize,
    error: Option<String>,
    success: Option<String>,
    in_flight: bool,
}

impl SellerSignupScreen {
    pub fn new() -> Self {
        Self {
            name: TextField::new("Seller Name"),
            email: TextField::new("Email"),
            password: TextField::masked("Password"),
            business_license_id: TextField::new("Business License ID"),
            seller_phno: TextField::new("Phone Number"),
            focus: 0,
            error: None,
            success: None,
            in_flight: false,
        }
    }

    fn fields_mut(&mut self) -> [&mut TextField; 5] {
        [
            &mut self.name,
            &mut self.email,
            &mut self.password,
            &mut self.business_license_id,
            &mut self.seller_phno,
        ]
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut Ctx) -> Nav {
        // Once signup succeeded we only wait for the redirect timer.
        if self.success.is_some() {
            return Nav::None;
        }
        match key.code {
            KeyCode::Esc => return Nav::SellerLogin,
            KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.password.toggle_masked();
                return Nav::None;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus = cycle_focus(self.focus, 5, true);
                return Nav::None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = cycle_focus(self.focus, 5, false);
                return Nav::None;
            }
            KeyCode::Enter => {
                self.submit(ctx);
                return Nav::None;
            }
            _ => {}
        }
        let focus = self.focus;
        self.fields_mut()[focus].handle_key(key);
        Nav::None
    }

    fn submit(&mut self, ctx: &mut Ctx) {
        if self.in_flight {
            return;
        }
        let missing = missing_fields(&[
            ("Seller Name", self.name.value()),
            ("Email", self.email.value()),
            ("Password", self.password.value()),
            ("Business License ID", self.business_license_id.value()),
            ("Phone Number", self.seller_phno.value()),
        ]);
        if !missing.is_empty() {
            self.error = Some(format!("Please fill out: {}", missing.join(", ")));
            return;
        }
        self.error = None;
        self.in_flight = true;
        tasks::spawn_register(
            ctx.client,
            ctx.tx,
            RegisterRequest {
                name: self.name.value().trim().to_string(),
                email: self.email.value().trim().to_string(),
                password: self.password.value().to_string(),
                business_license_id: self.business_license_id.value().trim().to_string(),
                seller_phno: self.seller_phno.value().trim().to_string(),
            },
        );
    }

    /// Outcome of the signup request. Success shows a notice and schedules
    /// the automatic switch to the login screen.
    pub fn on_register_result(&mut self, result: api::Result<String>, ctx: &mut Ctx) {
        self.in_flight = false;
        match result {
            Ok(_) => {
                self.success = Some("Signup successful! Redirecting to login…".to_string());
                tasks::schedule_signup_redirect(ctx.tx);
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = centered(frame.area(), 56, 15);
        let block = Block::bordered().title(Line::from("Seller Signup".bold().fg(ACCENT)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![
            Line::default(),
            self.name.display_line(self.focus == 0),
            self.email.display_line(self.focus == 1),
            self.password.display_line(self.focus == 2),
            self.business_license_id.display_line(self.focus == 3),
            self.seller_phno.display_line(self.focus == 4),
            Line::default(),
        ];
        if let Some(success) = &self.success {
            lines.push(Line::from(success.clone().green()));
        } else if self.in_flight {
            lines.push(Line::from("Creating account…".dim()));
        } else if let Some(error) = &self.error {
            lines.push(Line::from(error.clone().red()));
        } else {
            lines.push(Line::default());
        }
        lines.push(Line::default());
        lines.push(Line::from("Enter sign up · Ctrl+T show password · Esc back to login".dim()));
        frame.render_widget(Paragraph::new(lines), inner);
    }
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
    fn role_select_routes_both_roles() {
        let mut screen = RoleSelectScreen::new();
        assert_eq!(screen.handle_key(key(KeyCode::Enter)), Nav::BuyerEntry);
        screen.handle_key(key(KeyCode::Tab));
        assert_eq!(screen.handle_key(key(KeyCode::Enter)), Nav::SellerEntry);
        assert_eq!(screen.handle_key(key(KeyCode::Char('b'))), Nav::BuyerEntry);
    }
}
