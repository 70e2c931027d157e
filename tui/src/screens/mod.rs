//! Top-level screens and the context they act through.

pub mod auth;
pub mod buyer;
pub mod seller;

use dermascan_api::ApiClient;

use crate::app_event_sender::AppEventSender;
use crate::modal::Modal;
use crate::modal::PendingAction;

/// What a screen borrows from the app while handling input or events:
/// the API client and event channel for spawning work, and the modal slot
/// for surfacing dialogs.
pub(crate) struct Ctx<'a> {
    pub client: &'a ApiClient,
    pub tx: &'a AppEventSender,
    pub modal: &'a mut Option<Modal>,
}

impl Ctx<'_> {
    pub fn show_error(&mut self, message: impl Into<String>) {
        *self.modal = Some(Modal::error(message));
    }

    pub fn show_info(&mut self, title: impl Into<String>, message: impl Into<String>) {
        *self.modal = Some(Modal::info(title, message));
    }

    pub fn confirm(&mut self, message: impl Into<String>, action: PendingAction) {
        *self.modal = Some(Modal::confirm(message, action));
    }
}

/// Screen transition requested by the active screen. Everything that swaps
/// the top-level screen goes through the app's router so the navigation
/// rules (locked dashboards, session checks) live in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Nav {
    None,
    RoleSelect,
    SellerLogin,
    SellerSignup,
    /// Seller role picked: the router decides between login and dashboard
    /// based on the stored session.
    SellerEntry,
    BuyerEntry,
    /// Explicit logout from a dashboard: clear the session, back to roles.
    Logout,
}
