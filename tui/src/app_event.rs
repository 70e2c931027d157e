//! Application-level events used to coordinate UI actions.
//!
//! Everything asynchronous (timers, network completions) funnels through
//! this enum into the single UI loop. Spawned tasks never touch screen state
//! directly; they post an event and the active screen decides whether the
//! result is still relevant.

use dermascan_api as api;
use dermascan_api::AnalysisReport;
use dermascan_api::LoginSeller;
use dermascan_api::ProductCounts;
use dermascan_api::ProductDetail;
use dermascan_api::ProductSummary;
use dermascan_api::SellerAccount;
use dermascan_api::SellerProductDetail;
use dermascan_api::SellerProductSummary;
use dermascan_api::Suggestion;

/// Which seller product list an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductStatus {
    Accepted,
    Rejected,
}

#[derive(Debug)]
pub enum AppEvent {
    /// The splash-screen delay elapsed.
    SplashElapsed,

    /// The post-signup redirect delay elapsed.
    SignupRedirectElapsed,

    /// The suggestion-fetch quiet interval elapsed. `generation` echoes the
    /// token issued when the timer was scheduled; a firing whose token is no
    /// longer the newest is ignored (the keystroke that superseded it has
    /// already scheduled a fresh timer).
    SuggestionDebounceElapsed { generation: u64, query: String },

    /// Result of a completed suggestion lookup. A failed lookup arrives as
    /// an empty list: the dropdown is simply suppressed, no error shown.
    SuggestionsLoaded {
        generation: u64,
        suggestions: Vec<Suggestion>,
    },

    RegisterCompleted(api::Result<String>),
    LoginCompleted(api::Result<LoginSeller>),

    CountsLoaded(api::Result<ProductCounts>),
    AcceptedLoaded(api::Result<Vec<SellerProductSummary>>),
    RejectedLoaded(api::Result<Vec<SellerProductSummary>>),
    SellerProductLoaded(api::Result<SellerProductDetail>),
    ProductSaved(api::Result<()>),
    ProductDeleted {
        status: ProductStatus,
        result: api::Result<()>,
    },
    AccountLoaded(api::Result<SellerAccount>),
    AccountSaved(api::Result<SellerAccount>),
    AccountDeleted(api::Result<()>),
    UploadCompleted(api::Result<AnalysisReport>),

    /// OCR text extraction finished (shared by the seller upload form and
    /// the buyer product-check form).
    OcrCompleted(api::Result<String>),

    ProductsLoaded(api::Result<Vec<ProductSummary>>),
    ProductDetailLoaded(api::Result<ProductDetail>),
    CheckCompleted(api::Result<AnalysisReport>),
}
