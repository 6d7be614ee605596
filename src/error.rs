use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Element #{0} not found on the page.")]
    MissingElement(String),
    #[error("#{0} is not a known form.")]
    UnknownForm(String),
    #[error("Form #{0} carries no resource identifier class.")]
    MissingIdentifier(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Could not serialize payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}
