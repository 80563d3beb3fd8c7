use scraper::{ElementRef, Html};

use crate::config::TargetSelector;

/// Elements whose text never renders on the page.
const HIDDEN_TEXT_TAGS: &[&str] = &["script", "style", "template"];

/// First element in document order with the selector's tag and every one of its class tokens.
pub fn find_target<'a>(document: &'a Html, selector: &TargetSelector) -> Option<ElementRef<'a>> {
    let tag = selector.tag.trim();
    let tokens: Vec<&str> = selector.class_tokens().collect();

    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| {
            let value = element.value();
            value.name().eq_ignore_ascii_case(tag)
                && tokens
                    .iter()
                    .all(|token| value.classes().any(|class| class == *token))
        })
}

/// Visible text of an element: each text node trimmed, empty ones dropped,
/// the rest joined with a single space.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut pieces = Vec::new();
    collect_visible(element, &mut pieces);
    pieces.join(" ")
}

/// Skips whole hidden subtrees. `noscript` arrives as one raw-text node and is
/// read as markup, so its tags never reach the compared string.
fn collect_visible(element: ElementRef<'_>, pieces: &mut Vec<String>) {
    for node in element.children() {
        if let Some(child) = ElementRef::wrap(node) {
            if !HIDDEN_TEXT_TAGS.contains(&child.value().name()) {
                collect_visible(child, pieces);
            }
        } else if let Some(text) = node.value().as_text() {
            if element.value().name() == "noscript" {
                let fragment = Html::parse_fragment(text);
                collect_visible(fragment.root_element(), pieces);
            } else {
                let text = text.trim();
                if !text.is_empty() {
                    pieces.push(text.to_string());
                }
            }
        }
    }
}

/// Parses `html` and returns the normalized text of the target element, if present.
pub fn extract_target_text(html: &str, selector: &TargetSelector) -> Option<String> {
    let document = Html::parse_document(html);
    find_target(&document, selector).map(visible_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"
        <html><body>
          <h2 class="uk-h2">Unsere Zucht</h2>
          <div class="uk-h2 uk-text-warning">Not a heading</div>
          <h2 class="uk-text-warning uk-h2 uk-margin">
            Aktuell ist kein Wurf geplant.
            <br>
            Daher nehmen wir auch <strong>keine</strong>   Anfragen entgegen.
            <!-- intern: Mai? -->
            <script>var x = 1;</script>
          </h2>
          <h2 class="uk-h2 uk-text-warning">Second match</h2>
        </body></html>
    "#;

    #[test]
    fn first_element_with_all_class_tokens_wins() {
        let text = extract_target_text(PAGE, &TargetSelector::new("h2", "uk-h2 uk-text-warning"));

        assert_eq!(
            text.as_deref(),
            Some("Aktuell ist kein Wurf geplant. Daher nehmen wir auch keine Anfragen entgegen.")
        );
    }

    #[test]
    fn class_match_is_token_based() {
        let document = Html::parse_document(PAGE);

        let found = find_target(&document, &TargetSelector::new("h2", "uk-margin")).unwrap();
        assert!(visible_text(found).starts_with("Aktuell"));

        assert!(find_target(&document, &TargetSelector::new("h2", "uk-text")).is_none());
    }

    #[test]
    fn tag_only_selector_matches_first_tag() {
        let text = extract_target_text(PAGE, &TargetSelector::new("H2", ""));

        assert_eq!(text.as_deref(), Some("Unsere Zucht"));
    }

    #[test]
    fn missing_element_yields_none() {
        assert_eq!(extract_target_text(PAGE, &TargetSelector::new("h3", "uk-h2")), None);
        assert_eq!(extract_target_text("", &TargetSelector::new("h2", "x")), None);
    }

    #[test]
    fn nested_template_text_is_hidden() {
        let html = r#"<h2 class="x">Kein Wurf<template><span>geheim</span></template><style>h2 { }</style></h2>"#;

        assert_eq!(
            extract_target_text(html, &TargetSelector::new("h2", "x")).as_deref(),
            Some("Kein Wurf")
        );
    }

    #[test]
    fn noscript_content_contributes_text_not_markup() {
        let html = r#"<h2 class="x">Kein Wurf<noscript><span>js aus</span></noscript></h2>"#;

        assert_eq!(
            extract_target_text(html, &TargetSelector::new("h2", "x")).as_deref(),
            Some("Kein Wurf js aus")
        );
    }

    #[test]
    fn entities_are_decoded_and_nbsp_trimmed() {
        let html = r#"<p class="note">&nbsp;Wir bitten um Verst&auml;ndnis.&nbsp;</p>"#;

        assert_eq!(
            extract_target_text(html, &TargetSelector::new("p", "note")).as_deref(),
            Some("Wir bitten um Verständnis.")
        );
    }
}
