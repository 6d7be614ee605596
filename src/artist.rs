use serde::{Deserialize, Serialize};

use crate::error::DispatchError;
use crate::page::Page;

/// Body of the create and edit artist requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistPayload {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: String,
    #[serde(rename = "facebook-link")]
    pub facebook_link: String,
}

impl ArtistPayload {
    pub fn from_page(page: &Page) -> Result<Self, DispatchError> {
        Ok(ArtistPayload {
            name: page.value("name")?,
            city: page.value("city")?,
            state: page.value("state")?,
            phone: page.value("phone")?,
            genres: page.multiselect_values("genres"),
            facebook_link: page.value("facebook_link")?,
        })
    }
}
