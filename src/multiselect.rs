use scraper::ElementRef;

/// Comma-joined values of the selected options of a multi-select control.
///
/// An option contributes its `value` attribute, or its text when the value is
/// missing or empty. When `selection` is given it replaces the `selected`
/// attributes of the markup; options keep their document order either way.
/// Returns an empty string if the control is absent or nothing is selected.
pub fn selected_values(control: Option<ElementRef<'_>>, selection: Option<&[String]>) -> String {
    let Some(control) = control else {
        return String::new();
    };

    options(control)
        .filter_map(|option| {
            let value = option_value(option);
            let selected = match selection {
                Some(selection) => selection.contains(&value),
                None => option.value().attr("selected").is_some(),
            };
            selected.then_some(value)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn options<'a>(control: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    control
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "option")
}

pub(crate) fn option_value(option: ElementRef<'_>) -> String {
    match option.value().attr("value") {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => option
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" "),
    }
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    fn genres(html: &Html) -> Option<ElementRef<'_>> {
        html.root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|e| e.value().id() == Some("genres"))
    }

    #[test]
    fn joins_selected_options() {
        let html = Html::parse_document(
            r#"<select id="genres" multiple>
                 <option value="A" selected>Alternative</option>
                 <option value="B">Blues</option>
                 <option value="C" selected>Classical</option>
               </select>"#,
        );
        assert_eq!(selected_values(genres(&html), None), "A, C");
    }

    #[test]
    fn falls_back_to_option_text() {
        let html = Html::parse_document(
            r#"<select id="genres" multiple>
                 <option selected>Jazz</option>
                 <option value="" selected> Folk </option>
               </select>"#,
        );
        assert_eq!(selected_values(genres(&html), None), "Jazz, Folk");
    }

    #[test]
    fn option_text_whitespace_is_collapsed() {
        let html = Html::parse_document(
            "<select id=\"genres\" multiple>\n<option selected>  Rock\n   n\tRoll </option>\n</select>",
        );
        assert_eq!(selected_values(genres(&html), None), "Rock n Roll");
    }

    #[test]
    fn empty_when_absent_or_unselected() {
        let html = Html::parse_document(
            r#"<select id="genres" multiple><option value="Rock">Rock</option></select>"#,
        );
        assert_eq!(selected_values(genres(&html), None), "");
        assert_eq!(selected_values(None, None), "");
    }

    #[test]
    fn explicit_selection_keeps_document_order() {
        let html = Html::parse_document(
            r#"<select id="genres" multiple>
                 <option value="Funk" selected>Funk</option>
                 <option value="Jazz">Jazz</option>
                 <option value="Soul">Soul</option>
               </select>"#,
        );
        let selection = vec!["Soul".to_string(), "Jazz".to_string()];
        assert_eq!(selected_values(genres(&html), Some(selection.as_slice())), "Jazz, Soul");
    }
}
