/// Errors surfaced to the UI when talking to the marketplace services.
///
/// The taxonomy is intentionally small: either the request never completed
/// (`Transport`) or the service answered with a non-success status
/// (`Service`, carrying whatever message the backend put in its error body).
/// Screens render both as plain text; nothing here is fatal to the app.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Service { status: u16, message: String },
}

impl Error {
    /// True for backend "not found" answers (deleted product, unknown seller).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Service { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
