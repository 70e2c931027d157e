//! Spawned work: network calls and timers.
//!
//! Every helper clones what it needs, runs one request (or one sleep) on a
//! tokio task, and posts the outcome as an [`AppEvent`]. Nothing here blocks
//! the UI loop, nothing retries, and nothing mutates screen state; stale
//! outcomes are filtered by the receiving screen via the tokens they carry.

use std::time::Duration;

use dermascan_api::AccountUpdate;
use dermascan_api::ApiClient;
use dermascan_api::CheckProductRequest;
use dermascan_api::ImageAttachment;
use dermascan_api::NewProductUpload;
use dermascan_api::ProductUpdate;
use dermascan_api::RegisterRequest;
use dermascan_api::SkinType;

use crate::app_event::AppEvent;
use crate::app_event::ProductStatus;
use crate::app_event_sender::AppEventSender;
use crate::search::SUGGESTION_DEBOUNCE;

/// How long the splash banner stays up before the role picker appears.
pub(crate) const SPLASH_DELAY: Duration = Duration::from_secs(3);

/// Pause between a successful signup and the switch to the login screen.
pub(crate) const SIGNUP_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

pub(crate) fn schedule_splash(tx: &AppEventSender) {
    let tx = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(SPLASH_DELAY).await;
        tx.send(AppEvent::SplashElapsed);
    });
}

pub(crate) fn schedule_signup_redirect(tx: &AppEventSender) {
    let tx = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(SIGNUP_REDIRECT_DELAY).await;
        tx.send(AppEvent::SignupRedirectElapsed);
    });
}

/// Start the suggestion quiet-interval timer. The firing carries the
/// generation so the search field can ignore it once superseded.
pub(crate) fn schedule_suggestion_debounce(tx: &AppEventSender, generation: u64, query: String) {
    let tx = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(SUGGESTION_DEBOUNCE).await;
        tx.send(AppEvent::SuggestionDebounceElapsed { generation, query });
    });
}

/// Suggestion lookup. A failure is deliberately collapsed into an empty
/// list: the dropdown just stays hidden, no error is surfaced.
pub(crate) fn spawn_suggestions(
    client: &ApiClient,
    tx: &AppEventSender,
    generation: u64,
    query: String,
) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let suggestions = match client.search_suggestions(&query).await {
            Ok(suggestions) => suggestions,
            Err(err) => {
                tracing::debug!("suggestion lookup failed: {err}");
                Vec::new()
            }
        };
        tx.send(AppEvent::SuggestionsLoaded {
            generation,
            suggestions,
        });
    });
}

pub(crate) fn spawn_login(client: &ApiClient, tx: &AppEventSender, email: String, password: String) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        tx.send(AppEvent::LoginCompleted(
            client.login(&email, &password).await,
        ));
    });
}

pub(crate) fn spawn_register(client: &ApiClient, tx: &AppEventSender, request: RegisterRequest) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        tx.send(AppEvent::RegisterCompleted(client.register(&request).await));
    });
}

pub(crate) fn spawn_counts(client: &ApiClient, tx: &AppEventSender, seller_id: i64) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        tx.send(AppEvent::CountsLoaded(client.product_counts(seller_id).await));
    });
}

pub(crate) fn spawn_accepted(client: &ApiClient, tx: &AppEventSender, seller_id: i64) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        tx.send(AppEvent::AcceptedLoaded(
            client.accepted_products(seller_id).await,
        ));
    });
}

pub(crate) fn spawn_rejected(client: &ApiClient, tx: &AppEventSender, seller_id: i64) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        tx.send(AppEvent::RejectedLoaded(
            client.rejected_products(seller_id).await,
        ));
    });
}

pub(crate) fn spawn_seller_product(client: &ApiClient, tx: &AppEventSender, product_id: i64) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        tx.send(AppEvent::SellerProductLoaded(
            client.seller_product(product_id).await,
        ));
    });
}

pub(crate) fn spawn_update_product(
    client: &ApiClient,
    tx: &AppEventSender,
    product_id: i64,
    update: ProductUpdate,
) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        tx.send(AppEvent::ProductSaved(
            client.update_product(product_id, &update).await,
        ));
    });
}

pub(crate) fn spawn_delete_product(
    client: &ApiClient,
    tx: &AppEventSender,
    product_id: i64,
    status: ProductStatus,
) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        tx.send(AppEvent::ProductDeleted {
            status,
            result: client.delete_product(product_id).await,
        });
    });
}

pub(crate) fn spawn_account(client: &ApiClient, tx: &AppEventSender, seller_id: i64) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        tx.send(AppEvent::AccountLoaded(client.seller_account(seller_id).await));
    });
}

pub(crate) fn spawn_update_account(
    client: &ApiClient,
    tx: &AppEventSender,
    seller_id: i64,
    update: AccountUpdate,
) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        tx.send(AppEvent::AccountSaved(
            client.update_seller_account(seller_id, &update).await,
        ));
    });
}

pub(crate) fn spawn_delete_account(client: &ApiClient, tx: &AppEventSender, seller_id: i64) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        tx.send(AppEvent::AccountDeleted(
            client.delete_seller_account(seller_id).await,
        ));
    });
}

pub(crate) fn spawn_upload(client: &ApiClient, tx: &AppEventSender, upload: NewProductUpload) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        tx.send(AppEvent::UploadCompleted(client.upload_product(upload).await));
    });
}

pub(crate) fn spawn_ocr(client: &ApiClient, tx: &AppEventSender, image: ImageAttachment) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        tx.send(AppEvent::OcrCompleted(
            client.extract_ingredients(image).await,
        ));
    });
}

pub(crate) fn spawn_products_default(client: &ApiClient, tx: &AppEventSender) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        tx.send(AppEvent::ProductsLoaded(client.list_products().await));
    });
}

pub(crate) fn spawn_products_search(client: &ApiClient, tx: &AppEventSender, term: String) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        tx.send(AppEvent::ProductsLoaded(client.search_products(&term).await));
    });
}

pub(crate) fn spawn_products_filter(
    client: &ApiClient,
    tx: &AppEventSender,
    skin_types: Vec<SkinType>,
) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        tx.send(AppEvent::ProductsLoaded(
            client.filter_products(&skin_types).await,
        ));
    });
}

pub(crate) fn spawn_product_details(client: &ApiClient, tx: &AppEventSender, product_id: i64) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        tx.send(AppEvent::ProductDetailLoaded(
            client.product_details(product_id).await,
        ));
    });
}

pub(crate) fn spawn_check(client: &ApiClient, tx: &AppEventSender, request: CheckProductRequest) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        tx.send(AppEvent::CheckCompleted(client.check_product(&request).await));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[tokio::test(start_paused = true)]
    async fn debounce_timer_fires_after_the_quiet_interval() {
        let (tx, mut rx) = unbounded_channel();
        let sender = AppEventSender::new(tx);
        let started = tokio::time::Instant::now();

        schedule_suggestion_debounce(&sender, 4, "aloe".to_string());

        let event = rx.recv().await.expect("debounce event");
        assert!(started.elapsed() >= SUGGESTION_DEBOUNCE);
        match event {
            AppEvent::SuggestionDebounceElapsed { generation, query } => {
                assert_eq!(generation, 4);
                assert_eq!(query, "aloe");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn splash_timer_fires_once() {
        let (tx, mut rx) = unbounded_channel();
        let sender = AppEventSender::new(tx);
        schedule_splash(&sender);

        assert!(matches!(rx.recv().await, Some(AppEvent::SplashElapsed)));
        drop(sender);
        assert!(rx.recv().await.is_none());
    }
}
