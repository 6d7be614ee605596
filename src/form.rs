use std::fmt;

use log::debug;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::artist::ArtistPayload;
use crate::error::DispatchError;
use crate::page::Page;
use crate::search::SearchPayload;
use crate::show::ShowPayload;
use crate::venue::VenuePayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Artists,
    Venues,
}

impl Resource {
    fn segment(self) -> &'static str {
        match self {
            Resource::Artists => "artists",
            Resource::Venues => "venues",
        }
    }
}

/// Identifies the resource a delete request removes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePayload {
    pub id: String,
}

/// A form or button recognised on a page.
///
/// Identifiers the markup carries in attributes or display elements are read
/// once, when the form is detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    CreateShow,
    CreateArtist,
    EditArtist { id: String },
    CreateVenue,
    EditVenue { id: String },
    DeleteArtist { id: String },
    DeleteVenue { id: String },
    SearchArtists,
    SearchVenues,
}

/// Element ids of the recognised forms and buttons, in detection order.
pub const FORM_ELEMENTS: [&str; 9] = [
    "create-show-form",
    "create-artist-form",
    "edit-artist-form",
    "create-venue-form",
    "edit-venue-form",
    "delete-artist-btn",
    "delete-venue-btn",
    "search-artists",
    "search-venues",
];

impl FormKind {
    /// Element ids of the recognised forms present on the page.
    pub fn present(page: &Page) -> Vec<&'static str> {
        FORM_ELEMENTS
            .iter()
            .copied()
            .filter(|id| page.contains(id))
            .collect()
    }

    /// Every form present on the page, in a fixed order.
    ///
    /// A form whose identifier cannot be read yields an error in its slot
    /// without affecting the others.
    pub fn detect(page: &Page) -> Vec<Result<FormKind, DispatchError>> {
        let found: Vec<_> = Self::present(page)
            .into_iter()
            .map(|element_id| Self::identify(page, element_id))
            .collect();
        debug!("Detected forms: {:?}", found);
        found
    }

    /// Read the form rendered as `element_id`, including its identifier.
    pub fn identify(page: &Page, element_id: &str) -> Result<FormKind, DispatchError> {
        let form = match element_id {
            "create-show-form" => FormKind::CreateShow,
            "create-artist-form" => FormKind::CreateArtist,
            "edit-artist-form" => FormKind::EditArtist {
                id: class_identifier(page, element_id)?,
            },
            "create-venue-form" => FormKind::CreateVenue,
            "edit-venue-form" => FormKind::EditVenue {
                id: class_identifier(page, element_id)?,
            },
            "delete-artist-btn" => FormKind::DeleteArtist {
                id: page.text("artist-id")?,
            },
            "delete-venue-btn" => FormKind::DeleteVenue {
                id: page.text("venue-id")?,
            },
            "search-artists" => FormKind::SearchArtists,
            "search-venues" => FormKind::SearchVenues,
            other => return Err(DispatchError::UnknownForm(other.to_string())),
        };
        Ok(form)
    }

    pub fn element_id(&self) -> &'static str {
        match self {
            FormKind::CreateShow => "create-show-form",
            FormKind::CreateArtist => "create-artist-form",
            FormKind::EditArtist { .. } => "edit-artist-form",
            FormKind::CreateVenue => "create-venue-form",
            FormKind::EditVenue { .. } => "edit-venue-form",
            FormKind::DeleteArtist { .. } => "delete-artist-btn",
            FormKind::DeleteVenue { .. } => "delete-venue-btn",
            FormKind::SearchArtists => "search-artists",
            FormKind::SearchVenues => "search-venues",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

// Edit forms are rendered as `class="form <id>"`.
fn class_identifier(page: &Page, form_id: &str) -> Result<String, DispatchError> {
    page.class_at(form_id, 1)?
        .ok_or_else(|| DispatchError::MissingIdentifier(form_id.to_string()))
}

/// The typed payload of one submission together with its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    CreateShow(ShowPayload),
    CreateArtist(ArtistPayload),
    EditArtist { id: String, payload: ArtistPayload },
    CreateVenue(VenuePayload),
    EditVenue { id: String, payload: VenuePayload },
    Delete { resource: Resource, payload: DeletePayload },
    Search { resource: Resource, payload: SearchPayload },
}

impl Submission {
    pub fn collect(page: &Page, form: &FormKind) -> Result<Self, DispatchError> {
        let submission = match form {
            FormKind::CreateShow => Submission::CreateShow(ShowPayload::from_page(page)?),
            FormKind::CreateArtist => Submission::CreateArtist(ArtistPayload::from_page(page)?),
            FormKind::EditArtist { id } => Submission::EditArtist {
                id: id.clone(),
                payload: ArtistPayload::from_page(page)?,
            },
            FormKind::CreateVenue => Submission::CreateVenue(VenuePayload::from_page(page)?),
            FormKind::EditVenue { id } => Submission::EditVenue {
                id: id.clone(),
                payload: VenuePayload::from_page(page)?,
            },
            FormKind::DeleteArtist { id } => Submission::Delete {
                resource: Resource::Artists,
                payload: DeletePayload { id: id.clone() },
            },
            FormKind::DeleteVenue { id } => Submission::Delete {
                resource: Resource::Venues,
                payload: DeletePayload { id: id.clone() },
            },
            FormKind::SearchArtists => Submission::Search {
                resource: Resource::Artists,
                payload: SearchPayload {
                    search_term: page.value("artist-search-term")?,
                },
            },
            FormKind::SearchVenues => Submission::Search {
                resource: Resource::Venues,
                payload: SearchPayload {
                    search_term: page.value("venue-search-term")?,
                },
            },
        };
        Ok(submission)
    }

    pub fn request(&self) -> Result<Request, DispatchError> {
        let (method, path, body) = match self {
            Submission::CreateShow(payload) => {
                (Method::POST, "/shows/create".to_string(), serde_json::to_value(payload)?)
            }
            Submission::CreateArtist(payload) => {
                (Method::POST, "/artists/create".to_string(), serde_json::to_value(payload)?)
            }
            Submission::EditArtist { id, payload } => {
                (Method::POST, format!("/artists/{}/edit", id), serde_json::to_value(payload)?)
            }
            Submission::CreateVenue(payload) => {
                (Method::POST, "/venues/create".to_string(), serde_json::to_value(payload)?)
            }
            Submission::EditVenue { id, payload } => {
                (Method::POST, format!("/venues/{}/edit", id), serde_json::to_value(payload)?)
            }
            Submission::Delete { resource, payload } => (
                Method::DELETE,
                format!("/{}/{}", resource.segment(), payload.id),
                serde_json::to_value(payload)?,
            ),
            Submission::Search { resource, payload } => (
                Method::POST,
                format!("/{}/search", resource.segment()),
                serde_json::to_value(payload)?,
            ),
        };
        Ok(Request { method, path, body })
    }
}

/// An HTTP call ready to be sent: always a JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_nothing_on_plain_page() {
        let page = Page::parse("<h1>Fyyur</h1>");
        assert!(FormKind::detect(&page).is_empty());
    }

    #[test]
    fn edit_form_id_comes_from_second_class() {
        let page = Page::parse(r#"<form id="edit-artist-form" class="form 4"></form>"#);
        let detected: Vec<_> = FormKind::detect(&page).into_iter().map(Result::unwrap).collect();
        assert_eq!(detected, vec![FormKind::EditArtist { id: "4".into() }]);
    }

    #[test]
    fn edit_form_without_id_class_is_rejected() {
        let page = Page::parse(r#"<form id="edit-venue-form" class="form"></form>"#);
        assert!(matches!(
            FormKind::detect(&page).as_slice(),
            [Err(DispatchError::MissingIdentifier(_))]
        ));
    }

    #[test]
    fn delete_button_needs_display_element() {
        let page = Page::parse(r#"<button id="delete-venue-btn">Delete</button>"#);
        assert!(matches!(
            FormKind::detect(&page).as_slice(),
            [Err(DispatchError::MissingElement(id))] if id == "venue-id"
        ));
    }

    #[test]
    fn broken_form_does_not_hide_the_others() {
        let page = Page::parse(
            r#"<button id="delete-venue-btn">Delete</button>
               <form id="search-artists"><input id="artist-search-term"></form>"#,
        );
        let detected = FormKind::detect(&page);
        assert_eq!(detected.len(), 2);
        assert!(detected[0].is_err());
        assert_eq!(detected[1].as_ref().unwrap(), &FormKind::SearchArtists);
    }

    #[test]
    fn unknown_element_is_not_a_form() {
        let page = Page::parse(r#"<form id="login-form"></form>"#);
        assert!(FormKind::present(&page).is_empty());
        assert!(matches!(
            FormKind::identify(&page, "login-form"),
            Err(DispatchError::UnknownForm(id)) if id == "login-form"
        ));
    }

    #[test]
    fn search_request_targets_resource() {
        let submission = Submission::Search {
            resource: Resource::Venues,
            payload: SearchPayload {
                search_term: "Music".into(),
            },
        };
        let request = submission.request().unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/venues/search");
        assert_eq!(request.body, serde_json::json!({ "search_term": "Music" }));
    }

    #[test]
    fn delete_request_carries_id_in_path_and_body() {
        let submission = Submission::Delete {
            resource: Resource::Venues,
            payload: DeletePayload { id: "3".into() },
        };
        let request = submission.request().unwrap();
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.path, "/venues/3");
        assert_eq!(request.body["id"], "3");
    }
}
