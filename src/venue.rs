use serde::{Deserialize, Serialize};

use crate::error::DispatchError;
use crate::page::Page;

/// Body of the create and edit venue requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenuePayload {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub genres: String,
    pub facebook_link: String,
}

impl VenuePayload {
    pub fn from_page(page: &Page) -> Result<Self, DispatchError> {
        Ok(VenuePayload {
            name: page.value("name")?,
            city: page.value("city")?,
            state: page.value("state")?,
            address: page.value("address")?,
            phone: page.value("phone")?,
            genres: page.multiselect_values("genres"),
            facebook_link: page.value("facebook_link")?,
        })
    }
}
