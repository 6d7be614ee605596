use serde::Serialize;

use crate::dispatch::{Attempt, Delivery};

/// One row of the submission report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutputRecord {
    pub page: String,
    pub form: String,
    pub method: String,
    pub path: String,
    pub outcome: String,
}

impl OutputRecord {
    pub fn new(page: &str, delivery: &Delivery) -> Self {
        OutputRecord {
            page: page.to_string(),
            form: delivery.form.to_string(),
            method: delivery.request.method.to_string(),
            path: delivery.request.path.clone(),
            outcome: delivery.outcome.label(),
        }
    }

    /// A row for a form that was sent, or one that was skipped because it could not be read.
    pub fn from_attempt(page: &str, attempt: &Attempt) -> Self {
        match &attempt.result {
            Ok(delivery) => Self::new(page, delivery),
            Err(err) => OutputRecord {
                page: page.to_string(),
                form: attempt.element_id.to_string(),
                method: String::new(),
                path: String::new(),
                outcome: format!("skipped: {}", err),
            },
        }
    }
}
