//! HTTP client for the marketplace services.
//!
//! One method per remote operation. No retries, no backoff: every call is a
//! single request whose failure is reported once to the caller (the UI lets
//! the user retry). Multipart form keys (`sellerId`, `productName`, …) match
//! what the upload and OCR services expect.

use reqwest::multipart;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::Error;
use crate::Result;
use crate::endpoints::Endpoints;
use crate::types::AccountUpdate;
use crate::types::AnalysisReport;
use crate::types::CheckProductRequest;
use crate::types::ImageAttachment;
use crate::types::LoginSeller;
use crate::types::NewProductUpload;
use crate::types::ProductCounts;
use crate::types::ProductDetail;
use crate::types::ProductSummary;
use crate::types::ProductUpdate;
use crate::types::RegisterRequest;
use crate::types::SellerAccount;
use crate::types::SellerProductDetail;
use crate::types::SellerProductSummary;
use crate::types::SkinType;
use crate::types::Suggestion;

const USER_AGENT: &str = concat!("dermascan/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl ApiClient {
    pub fn new(endpoints: Endpoints) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http, endpoints })
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<String> {
        let response = self
            .http
            .post(self.endpoints.register())
            .json(request)
            .send()
            .await?;
        let body: MessageBody = decode(response).await?;
        Ok(body.message)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSeller> {
        #[derive(serde::Serialize)]
        struct LoginRequest<'a> {
            email: &'a str,
            password: &'a str,
        }

        #[derive(Deserialize)]
        struct LoginBody {
            seller: LoginSeller,
        }

        let response = self
            .http
            .post(self.endpoints.login())
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let body: LoginBody = decode(response).await?;
        Ok(body.seller)
    }

    /// Run the OCR service over one ingredient-list photo, returning the
    /// extracted text.
    pub async fn extract_ingredients(&self, image: ImageAttachment) -> Result<String> {
        #[derive(Deserialize)]
        struct OcrBody {
            text: String,
        }

        let part = multipart::Part::bytes(image.bytes).file_name(image.file_name);
        let form = multipart::Form::new().part("image", part);
        let response = self
            .http
            .post(self.endpoints.ocr())
            .multipart(form)
            .send()
            .await?;
        let body: OcrBody = decode(response).await?;
        Ok(body.text)
    }

    /// Submit a new product for analysis. The upload service persists the
    /// product and answers with the freshly computed analysis report.
    pub async fn upload_product(&self, upload: NewProductUpload) -> Result<AnalysisReport> {
        let mut form = multipart::Form::new()
            .text("sellerId", upload.seller_id.to_string())
            .text("productName", upload.product_name)
            .text("description", upload.description)
            .text("price", upload.price)
            .text("productType", upload.product_type)
            .text("brandName", upload.brand_name)
            .text("skinType", upload.skin_type.as_str())
            .text("ingredients", upload.ingredients);
        for image in upload.images {
            let part = multipart::Part::bytes(image.bytes).file_name(image.file_name);
            form = form.part("images", part);
        }
        let response = self
            .http
            .post(self.endpoints.upload_product())
            .multipart(form)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn search_suggestions(&self, query: &str) -> Result<Vec<Suggestion>> {
        let response = self
            .http
            .get(self.endpoints.search_suggestions())
            .query(&[("q", query)])
            .send()
            .await?;
        decode(response).await
    }

    /// Full product search by name, relevance-ordered by the search service.
    pub async fn search_products(&self, term: &str) -> Result<Vec<ProductSummary>> {
        let response = self
            .http
            .get(self.endpoints.search_products())
            .query(&[("search", term)])
            .send()
            .await?;
        decode(response).await
    }

    pub async fn filter_products(&self, skin_types: &[SkinType]) -> Result<Vec<ProductSummary>> {
        let joined = skin_types
            .iter()
            .map(|skin_type| skin_type.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let response = self
            .http
            .get(self.endpoints.filter_products())
            .query(&[("skin_types", joined.as_str())])
            .send()
            .await?;
        decode(response).await
    }

    pub async fn list_products(&self) -> Result<Vec<ProductSummary>> {
        let response = self.http.get(self.endpoints.list_products()).send().await?;
        decode(response).await
    }

    pub async fn product_details(&self, product_id: i64) -> Result<ProductDetail> {
        let response = self
            .http
            .get(self.endpoints.product_details(product_id))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn seller_product(&self, product_id: i64) -> Result<SellerProductDetail> {
        let response = self
            .http
            .get(self.endpoints.seller_product(product_id))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn update_product(&self, product_id: i64, update: &ProductUpdate) -> Result<()> {
        let response = self
            .http
            .put(self.endpoints.update_product(product_id))
            .json(update)
            .send()
            .await?;
        let _: MessageBody = decode(response).await?;
        Ok(())
    }

    pub async fn delete_product(&self, product_id: i64) -> Result<()> {
        let response = self
            .http
            .delete(self.endpoints.delete_product(product_id))
            .send()
            .await?;
        let _: MessageBody = decode(response).await?;
        Ok(())
    }

    pub async fn seller_account(&self, seller_id: i64) -> Result<SellerAccount> {
        let response = self
            .http
            .get(self.endpoints.seller_account(seller_id))
            .send()
            .await?;
        decode(response).await
    }

    /// Persist edited account fields; the service echoes the updated record.
    pub async fn update_seller_account(
        &self,
        seller_id: i64,
        update: &AccountUpdate,
    ) -> Result<SellerAccount> {
        let response = self
            .http
            .put(self.endpoints.update_seller_account(seller_id))
            .json(update)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn delete_seller_account(&self, seller_id: i64) -> Result<()> {
        let response = self
            .http
            .delete(self.endpoints.delete_seller_account(seller_id))
            .send()
            .await?;
        let _: MessageBody = decode(response).await?;
        Ok(())
    }

    pub async fn product_counts(&self, seller_id: i64) -> Result<ProductCounts> {
        let response = self
            .http
            .get(self.endpoints.product_counts(seller_id))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn accepted_products(&self, seller_id: i64) -> Result<Vec<SellerProductSummary>> {
        let response = self
            .http
            .get(self.endpoints.accepted_products(seller_id))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn rejected_products(&self, seller_id: i64) -> Result<Vec<SellerProductSummary>> {
        let response = self
            .http
            .get(self.endpoints.rejected_products(seller_id))
            .send()
            .await?;
        decode(response).await
    }

    /// Ad-hoc buyer-side analysis of a typed/extracted ingredient list.
    pub async fn check_product(&self, request: &CheckProductRequest) -> Result<AnalysisReport> {
        let response = self
            .http
            .post(self.endpoints.check_product())
            .json(request)
            .send()
            .await?;
        decode(response).await
    }
}

/// Successful-status envelope several services answer with.
#[derive(Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: String,
}

/// Decode a success body, or turn a non-2xx answer into [`Error::Service`]
/// using whatever message the backend put in its error envelope.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), "service error: {body}");
    Err(Error::Service {
        status: status.as_u16(),
        message: service_message(status.as_u16(), &body),
    })
}

/// Extract the human-readable message from an error body. The services use
/// either `{"error": …}` or `{"message": …}`; fall back to the status code.
fn service_message(status: u16, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
        message: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body)
        && let Some(message) = parsed.error.or(parsed.message)
        && !message.is_empty()
    {
        return message;
    }
    format!("server error (status {status})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn service_message_prefers_error_field() {
        let message = service_message(409, r#"{"error": "Email already registered"}"#);
        assert_eq!(message, "Email already registered");
    }

    #[test]
    fn service_message_falls_back_to_message_field() {
        let message = service_message(401, r#"{"message": "Invalid credentials"}"#);
        assert_eq!(message, "Invalid credentials");
    }

    #[test]
    fn service_message_falls_back_to_status() {
        assert_eq!(
            service_message(500, "<html>boom</html>"),
            "server error (status 500)"
        );
        assert_eq!(service_message(404, r#"{"error": ""}"#), "server error (status 404)");
    }
}
