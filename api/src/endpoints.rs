//! Base URLs for the marketplace services.
//!
//! The backend is split across many single-purpose services, each on its own
//! port. The defaults below mirror that deployment on localhost; every base
//! can be overridden from the config file (`[endpoints]` table) by service
//! name.

use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("unknown endpoint service '{0}'")]
    UnknownService(String),

    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// One base URL per backend service, keyed by service name.
#[derive(Debug, Clone)]
pub struct Endpoints {
    auth: String,
    ocr: String,
    seller_products: String,
    account: String,
    search: String,
    listing: String,
    counts: String,
    filter: String,
    detail: String,
    check: String,
    manager: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            auth: "http://localhost:5000".to_string(),
            ocr: "http://localhost:5001".to_string(),
            seller_products: "http://localhost:5002".to_string(),
            account: "http://localhost:5003".to_string(),
            search: "http://localhost:5004".to_string(),
            listing: "http://localhost:5008".to_string(),
            counts: "http://localhost:5009".to_string(),
            filter: "http://localhost:5010".to_string(),
            detail: "http://localhost:5011".to_string(),
            check: "http://localhost:5012".to_string(),
            manager: "http://localhost:5014".to_string(),
        }
    }
}

impl Endpoints {
    /// Service names accepted by [`Endpoints::set`], in config-file order.
    pub const SERVICES: [&'static str; 11] = [
        "auth",
        "ocr",
        "seller_products",
        "account",
        "search",
        "listing",
        "counts",
        "filter",
        "detail",
        "check",
        "manager",
    ];

    /// Override one service base URL. The value must parse as an absolute
    /// URL; a trailing slash is trimmed so path concatenation stays uniform.
    pub fn set(&mut self, service: &str, base: &str) -> Result<(), EndpointError> {
        Url::parse(base)?;
        let base = base.trim_end_matches('/').to_string();
        let slot = match service {
            "auth" => &mut self.auth,
            "ocr" => &mut self.ocr,
            "seller_products" => &mut self.seller_products,
            "account" => &mut self.account,
            "search" => &mut self.search,
            "listing" => &mut self.listing,
            "counts" => &mut self.counts,
            "filter" => &mut self.filter,
            "detail" => &mut self.detail,
            "check" => &mut self.check,
            "manager" => &mut self.manager,
            other => return Err(EndpointError::UnknownService(other.to_string())),
        };
        *slot = base;
        Ok(())
    }

    pub(crate) fn register(&self) -> String {
        format!("{}/register", self.auth)
    }

    pub(crate) fn login(&self) -> String {
        format!("{}/login", self.auth)
    }

    pub(crate) fn upload_product(&self) -> String {
        format!("{}/api/upload-product", self.auth)
    }

    pub(crate) fn ocr(&self) -> String {
        format!("{}/api/ocr", self.ocr)
    }

    pub(crate) fn accepted_products(&self, seller_id: i64) -> String {
        format!(
            "{}/api/seller/{seller_id}/accepted-products",
            self.seller_products
        )
    }

    pub(crate) fn rejected_products(&self, seller_id: i64) -> String {
        format!(
            "{}/api/seller/{seller_id}/rejected-products",
            self.seller_products
        )
    }

    pub(crate) fn seller_account(&self, seller_id: i64) -> String {
        format!("{}/api/seller/{seller_id}", self.account)
    }

    pub(crate) fn update_seller_account(&self, seller_id: i64) -> String {
        format!("{}/api/seller/update/{seller_id}", self.account)
    }

    pub(crate) fn delete_seller_account(&self, seller_id: i64) -> String {
        format!("{}/api/seller/delete/{seller_id}", self.account)
    }

    pub(crate) fn search_suggestions(&self) -> String {
        format!("{}/api/search/suggestions", self.search)
    }

    pub(crate) fn search_products(&self) -> String {
        format!("{}/api/search/filter-products", self.search)
    }

    pub(crate) fn list_products(&self) -> String {
        format!("{}/api/products", self.listing)
    }

    pub(crate) fn product_counts(&self, seller_id: i64) -> String {
        format!("{}/api/seller/{seller_id}/product-counts", self.counts)
    }

    pub(crate) fn filter_products(&self) -> String {
        format!("{}/api/products/filter", self.filter)
    }

    pub(crate) fn product_details(&self, product_id: i64) -> String {
        format!("{}/api/product/details/{product_id}", self.detail)
    }

    pub(crate) fn check_product(&self) -> String {
        format!("{}/api/check-product", self.check)
    }

    pub(crate) fn seller_product(&self, product_id: i64) -> String {
        format!("{}/api/product/{product_id}", self.manager)
    }

    pub(crate) fn update_product(&self, product_id: i64) -> String {
        format!("{}/api/product/update/{product_id}", self.manager)
    }

    pub(crate) fn delete_product(&self, product_id: i64) -> String {
        format!("{}/api/product/delete/{product_id}", self.manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_point_at_local_services() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.register(), "http://localhost:5000/register");
        assert_eq!(endpoints.ocr(), "http://localhost:5001/api/ocr");
        assert_eq!(
            endpoints.accepted_products(7),
            "http://localhost:5002/api/seller/7/accepted-products"
        );
        assert_eq!(
            endpoints.product_details(42),
            "http://localhost:5011/api/product/details/42"
        );
    }

    #[test]
    fn set_trims_trailing_slash() {
        let mut endpoints = Endpoints::default();
        endpoints
            .set("search", "http://search.internal:8080/")
            .expect("valid override");
        assert_eq!(
            endpoints.search_suggestions(),
            "http://search.internal:8080/api/search/suggestions"
        );
    }

    #[test]
    fn set_rejects_unknown_service_and_bad_url() {
        let mut endpoints = Endpoints::default();
        assert!(matches!(
            endpoints.set("nope", "http://localhost:1"),
            Err(EndpointError::UnknownService(_))
        ));
        assert!(matches!(
            endpoints.set("auth", "not a url"),
            Err(EndpointError::InvalidUrl(_))
        ));
    }
}
