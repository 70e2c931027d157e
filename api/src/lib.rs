//! Service contracts and HTTP client for the dermascan marketplace backend.
//!
//! The marketplace backend is a set of small HTTP services (authentication,
//! OCR, product CRUD, search, ingredient analysis), each listening on its own
//! port. This crate owns the wire types those services speak and a thin
//! [`ApiClient`] that addresses them. Everything interesting (persistence,
//! safety scoring, OCR) happens on the other side of the wire; the client
//! treats the services as black boxes and only shapes requests and decodes
//! responses.

mod client;
mod endpoints;
mod error;
mod types;

pub use client::ApiClient;
pub use endpoints::EndpointError;
pub use endpoints::Endpoints;
pub use error::Error;
pub use error::Result;
pub use types::AccountUpdate;
pub use types::AnalysisReport;
pub use types::AnalysisSummary;
pub use types::CheckProductRequest;
pub use types::ImageAttachment;
pub use types::IngredientVerdict;
pub use types::LoginSeller;
pub use types::MAX_UPLOAD_IMAGES;
pub use types::NewProductUpload;
pub use types::ProductCounts;
pub use types::ProductDetail;
pub use types::ProductSummary;
pub use types::ProductUpdate;
pub use types::RegisterRequest;
pub use types::SellerAccount;
pub use types::SellerProductDetail;
pub use types::SellerProductSummary;
pub use types::SkinType;
pub use types::Suggestion;
pub use types::Verdict;
