use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::DispatchError;
use crate::form::{FormKind, Request, Submission};
use crate::page::Page;

/// Element un-hidden when a show submission fails.
pub const ERROR_ELEMENT: &str = "error";

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub json: Option<Value>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &Request) -> Result<Response, DispatchError>;
}

/// Sends requests to the backend at `base_url`.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, DispatchError> {
        let mut base_url = Url::parse(base_url)?;
        // Request paths are resolved below the base path, not in place of it.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(HttpTransport {
            client: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &Request) -> Result<Response, DispatchError> {
        let url = self.base_url.join(request.path.trim_start_matches('/'))?;
        let resp = self
            .client
            .request(request.method.clone(), url)
            .header(CONTENT_TYPE, "application/json")
            .json(&request.body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(false, |value| value.starts_with("application/json"));
        let json = if is_json { resp.json().await.ok() } else { None };
        Ok(Response { status, json })
    }
}

/// What became of one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Sent; the response is not looked at.
    Sent,
    /// The backend answered and the handler inspected the answer.
    Responded { status: u16 },
    /// The request failed and the failure was swallowed.
    Failed { reason: String },
    /// The request failed and the page's error element was revealed.
    ErrorRevealed { reason: String },
}

impl Outcome {
    pub fn label(&self) -> String {
        match self {
            Outcome::Sent => "sent".to_string(),
            Outcome::Responded { status } => format!("responded {}", status),
            Outcome::Failed { reason } => format!("failed: {}", reason),
            Outcome::ErrorRevealed { reason } => format!("error shown: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub form: FormKind,
    pub request: Request,
    pub outcome: Outcome,
}

/// One form of a page and what submitting it led to.
#[derive(Debug)]
pub struct Attempt {
    pub element_id: &'static str,
    pub result: Result<Delivery, DispatchError>,
}

pub struct Dispatcher<T> {
    transport: T,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T) -> Self {
        Dispatcher { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn detect(&self, page: &Page) -> Vec<Result<FormKind, DispatchError>> {
        FormKind::detect(page)
    }

    /// Collect one form and send exactly one request for it.
    ///
    /// Only missing page elements are reported as errors. Transport failures
    /// end up in the returned `Outcome`.
    pub async fn submit(&self, page: &mut Page, form: &FormKind) -> Result<Delivery, DispatchError> {
        let submission = Submission::collect(page, form)?;
        if let Submission::CreateShow(show) = &submission {
            match show.start_time_utc() {
                Some(start) => debug!("Show starts at {}", start.to_rfc3339()),
                None => debug!("Unparsed show start time {:?}", show.start_time),
            }
        }
        let request = submission.request()?;
        info!("Submitting {}: {} {}", form, request.method, request.path);

        let result = self.transport.send(&request).await;
        let outcome = match form {
            FormKind::CreateShow => Self::check_response(page, result),
            _ => match result {
                Ok(_) => Outcome::Sent,
                Err(err) => {
                    warn!("{} failed: {}", form, err);
                    Outcome::Failed {
                        reason: err.to_string(),
                    }
                }
            },
        };

        Ok(Delivery {
            form: form.clone(),
            request,
            outcome,
        })
    }

    /// Submit every form on the page, or only the one with `only` as element id.
    ///
    /// A form that cannot be read is reported in its own `Attempt`; the
    /// remaining forms are still submitted.
    pub async fn submit_all(&self, page: &mut Page, only: Option<&str>) -> Vec<Attempt> {
        let element_ids: Vec<_> = FormKind::present(page)
            .into_iter()
            .filter(|element_id| only.map_or(true, |id| *element_id == id))
            .collect();

        let mut attempts = Vec::new();
        for element_id in element_ids {
            let result = match FormKind::identify(page, element_id) {
                Ok(form) => self.submit(page, &form).await,
                Err(err) => Err(err),
            };
            if let Err(err) = &result {
                warn!("Skipping {}: {}", element_id, err);
            }
            attempts.push(Attempt { element_id, result });
        }
        attempts
    }

    fn check_response(page: &mut Page, result: Result<Response, DispatchError>) -> Outcome {
        let reason = match result {
            Ok(resp) if resp.is_success() => {
                if let Some(json) = &resp.json {
                    debug!("Show created: {}", json);
                }
                return Outcome::Responded { status: resp.status };
            }
            Ok(resp) => format!("status {}", resp.status),
            Err(err) => err.to_string(),
        };

        warn!("Show submission failed: {}", reason);
        if page.reveal(ERROR_ELEMENT) {
            Outcome::ErrorRevealed { reason }
        } else {
            Outcome::Failed { reason }
        }
    }
}
