//! Top-level application: screen routing, the terminal event loop, and the
//! app event channel.
//!
//! One screen is active at a time. Dashboards are navigation-locked: the
//! only ways out are the explicit logout action (seller) or the explicit
//! back-to-roles action (buyer). There is no history stack to traverse.

use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use ratatui::DefaultTerminal;
use ratatui::Frame;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use tokio_stream::StreamExt;

use dermascan_api::ApiClient;

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;
use crate::modal::Modal;
use crate::modal::ModalOutcome;
use crate::modal::PendingAction;
use crate::modal::centered;
use crate::screens::Ctx;
use crate::screens::Nav;
use crate::screens::auth::RoleSelectScreen;
use crate::screens::auth::SellerLoginScreen;
use crate::screens::auth::SellerSignupScreen;
use crate::screens::buyer::BuyerDashboard;
use crate::screens::seller::SellerDashboard;
use crate::session::SessionIdentity;
use crate::session::SessionStore;
use crate::tasks;
use crate::ui_colors::ACCENT;

enum Screen {
    Splash,
    RoleSelect(RoleSelectScreen),
    SellerLogin(SellerLoginScreen),
    SellerSignup(SellerSignupScreen),
    Seller(SellerDashboard),
    Buyer(BuyerDashboard),
}

struct App {
    screen: Screen,
    modal: Option<Modal>,
    session: SessionStore,
    client: ApiClient,
    tx: AppEventSender,
    should_exit: bool,
}

/// Run the TUI until the user quits. Restores the terminal on the way out.
pub async fn run(client: ApiClient, session: SessionStore, skip_splash: bool) -> anyhow::Result<()> {
    let terminal = ratatui::init();
    let result = run_app(terminal, client, session, skip_splash).await;
    ratatui::restore();
    result
}

async fn run_app(
    mut terminal: DefaultTerminal,
    client: ApiClient,
    session: SessionStore,
    skip_splash: bool,
) -> anyhow::Result<()> {
    let (raw_tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let tx = AppEventSender::new(raw_tx);

    let screen = if skip_splash {
        Screen::RoleSelect(RoleSelectScreen::new())
    } else {
        tasks::schedule_splash(&tx);
        Screen::Splash
    };
    let mut app = App {
        screen,
        modal: None,
        session,
        client,
        tx,
        should_exit: false,
    };

    let mut terminal_events = crossterm::event::EventStream::new();
    while !app.should_exit {
        terminal.draw(|frame| app.render(frame))?;
        tokio::select! {
            Some(event) = terminal_events.next() => match event {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => app.handle_key(key),
                Ok(_) => {}
                Err(err) => return Err(err.into()),
            },
            Some(event) = rx.recv() => app.handle_app_event(event),
            else => break,
        }
    }
    Ok(())
}

impl App {
    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_exit = true;
            return;
        }

        // An open modal owns the keyboard.
        if let Some(modal) = &self.modal {
            match modal.handle_key(key) {
                ModalOutcome::Open => {}
                ModalOutcome::Dismissed => self.modal = None,
                ModalOutcome::Confirmed(action) => {
                    self.modal = None;
                    self.dispatch_action(action);
                }
            }
            return;
        }

        let App {
            screen,
            modal,
            client,
            tx,
            ..
        } = self;
        let mut ctx = Ctx { client, tx, modal };
        let nav = match screen {
            // Any key skips the splash.
            Screen::Splash => Nav::RoleSelect,
            Screen::RoleSelect(role_select) => role_select.handle_key(key),
            Screen::SellerLogin(login) => login.handle_key(key, &mut ctx),
            Screen::SellerSignup(signup) => signup.handle_key(key, &mut ctx),
            Screen::Seller(dashboard) => dashboard.handle_key(key, &mut ctx),
            Screen::Buyer(dashboard) => dashboard.handle_key(key, &mut ctx),
        };
        self.apply_nav(nav);
    }

    fn apply_nav(&mut self, nav: Nav) {
        match nav {
            Nav::None => {}
            Nav::RoleSelect => self.screen = Screen::RoleSelect(RoleSelectScreen::new()),
            Nav::SellerLogin => self.screen = Screen::SellerLogin(SellerLoginScreen::new()),
            Nav::SellerSignup => self.screen = Screen::SellerSignup(SellerSignupScreen::new()),
            Nav::SellerEntry => match self.session.load() {
                Some(identity) => self.enter_seller(identity),
                None => self.screen = Screen::SellerLogin(SellerLoginScreen::new()),
            },
            Nav::BuyerEntry => {
                let App {
                    modal, client, tx, ..
                } = self;
                let mut ctx = Ctx { client, tx, modal };
                self.screen = Screen::Buyer(BuyerDashboard::new(&mut ctx));
            }
            Nav::Logout => {
                self.session.clear();
                self.screen = Screen::RoleSelect(RoleSelectScreen::new());
            }
        }
    }

    fn enter_seller(&mut self, identity: SessionIdentity) {
        let App {
            modal, client, tx, ..
        } = self;
        let mut ctx = Ctx { client, tx, modal };
        self.screen = Screen::Seller(SellerDashboard::new(identity, &mut ctx));
    }

    fn dispatch_action(&mut self, action: PendingAction) {
        match action {
            PendingAction::DeleteProduct { product_id, status } => {
                tasks::spawn_delete_product(&self.client, &self.tx, product_id, status);
            }
            PendingAction::DeleteAccount => {
                if let Screen::Seller(dashboard) = &self.screen {
                    tasks::spawn_delete_account(
                        &self.client,
                        &self.tx,
                        dashboard.identity.seller_id,
                    );
                }
            }
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SplashElapsed => {
                if matches!(self.screen, Screen::Splash) {
                    self.screen = Screen::RoleSelect(RoleSelectScreen::new());
                }
            }
            AppEvent::SignupRedirectElapsed => {
                if matches!(self.screen, Screen::SellerSignup(_)) {
                    self.screen = Screen::SellerLogin(SellerLoginScreen::new());
                }
            }
            AppEvent::LoginCompleted(Ok(seller)) => {
                let identity = SessionIdentity::new(seller.seller_id, seller.name, seller.email);
                self.session.save(&identity);
                self.enter_seller(identity);
            }
            AppEvent::LoginCompleted(Err(err)) => {
                if let Screen::SellerLogin(login) = &mut self.screen {
                    login.on_login_failed(&err);
                }
            }
            AppEvent::RegisterCompleted(result) => {
                let App {
                    screen,
                    modal,
                    client,
                    tx,
                    ..
                } = self;
                if let Screen::SellerSignup(signup) = screen {
                    let mut ctx = Ctx { client, tx, modal };
                    signup.on_register_result(result, &mut ctx);
                }
            }
            AppEvent::AccountDeleted(Ok(())) => {
                self.session.clear();
                self.modal = Some(Modal::info(
                    "Account deleted",
                    "Your account and all associated data have been deleted.",
                ));
                self.screen = Screen::RoleSelect(RoleSelectScreen::new());
            }
            AppEvent::AccountDeleted(Err(err)) => {
                self.modal = Some(Modal::error(format!("Error: {err}")));
            }
            event => {
                // Saving account details also refreshes the persisted
                // session identity before the dashboard consumes the event.
                if let AppEvent::AccountSaved(Ok(account)) = &event
                    && let Screen::Seller(dashboard) = &self.screen
                {
                    let mut identity = dashboard.identity.clone();
                    identity.name = account.name.clone();
                    identity.email = account.email.clone();
                    self.session.save(&identity);
                }

                let App {
                    screen,
                    modal,
                    client,
                    tx,
                    ..
                } = self;
                let mut ctx = Ctx { client, tx, modal };
                match screen {
                    Screen::Seller(dashboard) => dashboard.on_event(event, &mut ctx),
                    Screen::Buyer(dashboard) => dashboard.on_event(event, &mut ctx),
                    _ => tracing::debug!("dropping event for inactive screen: {event:?}"),
                }
            }
        }
    }

    fn render(&self, frame: &mut Frame) {
        match &self.screen {
            Screen::Splash => render_splash(frame),
            Screen::RoleSelect(role_select) => role_select.render(frame),
            Screen::SellerLogin(login) => login.render(frame),
            Screen::SellerSignup(signup) => signup.render(frame),
            Screen::Seller(dashboard) => dashboard.render(frame),
            Screen::Buyer(dashboard) => dashboard.render(frame),
        }
        if let Some(modal) = &self.modal {
            modal.render(frame);
        }
    }
}

fn render_splash(frame: &mut Frame) {
    let area = centered(frame.area(), 40, 7);
    let lines = vec![
        Line::default(),
        Line::from("d e r m a s c a n".bold().fg(ACCENT)).centered(),
        Line::default(),
        Line::from("know what touches your skin".dim()).centered(),
        Line::default(),
        Line::from("press any key to continue".dim().italic()).centered(),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}
