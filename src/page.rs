use std::collections::{HashMap, HashSet};

use scraper::{ElementRef, Html};

use crate::error::DispatchError;
use crate::multiselect;

/// A rendered page together with whatever the user typed into it.
///
/// The parsed document is never mutated. Entered values, multi-select choices
/// and revealed elements are tracked beside it and take precedence over the
/// markup when fields are read.
pub struct Page {
    html: Html,
    values: HashMap<String, String>,
    selections: HashMap<String, Vec<String>>,
    revealed: HashSet<String>,
}

impl Page {
    pub fn parse(document: &str) -> Self {
        Page {
            html: Html::parse_document(document),
            values: HashMap::new(),
            selections: HashMap::new(),
            revealed: HashSet::new(),
        }
    }

    /// Enter a value into the field with the given id.
    pub fn set_value(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.values.insert(id.into(), value.into());
    }

    /// Replace the selected options of a select control.
    pub fn select<I, S>(&mut self, id: impl Into<String>, options: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = options.into_iter().map(Into::into).collect();
        self.selections.insert(id.into(), options);
    }

    pub fn element(&self, id: &str) -> Option<ElementRef<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|element| element.value().id() == Some(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    /// Current value of an input, textarea or single select.
    pub fn value(&self, id: &str) -> Result<String, DispatchError> {
        let element = self
            .element(id)
            .ok_or_else(|| DispatchError::MissingElement(id.to_string()))?;

        if let Some(value) = self.values.get(id) {
            return Ok(value.clone());
        }

        let value = match element.value().name() {
            "textarea" => element.text().collect(),
            "select" => self.select_value(element, id),
            _ => element.value().attr("value").unwrap_or_default().to_string(),
        };
        Ok(value)
    }

    /// Comma-joined selection of a multi-select control, empty if it is absent.
    pub fn multiselect_values(&self, id: &str) -> String {
        let selection = self.selections.get(id).map(Vec::as_slice);
        multiselect::selected_values(self.element(id), selection)
    }

    /// Trimmed text content of a display element.
    pub fn text(&self, id: &str) -> Result<String, DispatchError> {
        let element = self
            .element(id)
            .ok_or_else(|| DispatchError::MissingElement(id.to_string()))?;
        Ok(element.text().collect::<String>().trim().to_string())
    }

    /// The class at `index` in the element's class attribute, in source order.
    pub fn class_at(&self, id: &str, index: usize) -> Result<Option<String>, DispatchError> {
        let element = self
            .element(id)
            .ok_or_else(|| DispatchError::MissingElement(id.to_string()))?;
        Ok(element
            .value()
            .attr("class")
            .and_then(|classes| classes.split_whitespace().nth(index))
            .map(str::to_string))
    }

    /// Un-hide an element. Returns false if the page has no such element.
    pub fn reveal(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.revealed.insert(id.to_string());
        true
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        let Some(element) = self.element(id) else {
            return true;
        };
        if self.revealed.contains(id) {
            return false;
        }
        let element = element.value();
        element.attr("hidden").is_some()
            || element
                .attr("class")
                .map_or(false, |classes| classes.split_whitespace().any(|c| c == "hidden"))
    }

    fn select_value(&self, element: ElementRef<'_>, id: &str) -> String {
        if let Some(first) = self.selections.get(id).and_then(|s| s.first()) {
            return first.clone();
        }
        let options: Vec<_> = multiselect::options(element).collect();
        options
            .iter()
            .find(|option| option.value().attr("selected").is_some())
            .or_else(|| options.first())
            .map(|option| multiselect::option_value(*option))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = r#"
        <form id="edit-venue-form" class="form 12">
          <input id="name" value="The Musical Hop">
          <input id="phone">
          <textarea id="address">1015 Folsom Street</textarea>
          <select id="state">
            <option value="CA">CA</option>
            <option value="NY" selected>NY</option>
          </select>
          <p id="error" class="hidden">Something went wrong.</p>
        </form>
        <span id="venue-id">
          7
        </span>
    "#;

    #[test]
    fn reads_values_from_markup() {
        let page = Page::parse(FORM);
        assert_eq!(page.value("name").unwrap(), "The Musical Hop");
        assert_eq!(page.value("phone").unwrap(), "");
        assert_eq!(page.value("address").unwrap(), "1015 Folsom Street");
        assert_eq!(page.value("state").unwrap(), "NY");
    }

    #[test]
    fn entered_values_take_precedence() {
        let mut page = Page::parse(FORM);
        page.set_value("name", "Park Square Live");
        page.select("state", ["CA"]);
        assert_eq!(page.value("name").unwrap(), "Park Square Live");
        assert_eq!(page.value("state").unwrap(), "CA");
    }

    #[test]
    fn missing_field_is_an_error() {
        let page = Page::parse(FORM);
        assert!(matches!(
            page.value("city"),
            Err(DispatchError::MissingElement(id)) if id == "city"
        ));
    }

    #[test]
    fn reads_display_text_and_classes() {
        let page = Page::parse(FORM);
        assert_eq!(page.text("venue-id").unwrap(), "7");
        assert_eq!(page.class_at("edit-venue-form", 1).unwrap().as_deref(), Some("12"));
        assert_eq!(page.class_at("edit-venue-form", 2).unwrap(), None);
    }

    #[test]
    fn reveal_unhides_element() {
        let mut page = Page::parse(FORM);
        assert!(page.is_hidden("error"));
        assert!(page.reveal("error"));
        assert!(!page.is_hidden("error"));
        assert!(!page.reveal("no-such-element"));
    }
}
