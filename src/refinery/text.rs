// * Cell Normalizer
// * Whitespace normalization and flattening of one table cell into one string.

use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static SELECTOR_LI: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("Invalid li selector"));
static SELECTOR_BR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("br").expect("Invalid br selector"));

static PATTERN_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

// * Footnote markers such as "[1]" or "[ 12 ]"
static PATTERN_CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\s*\d+\s*\]").expect("Invalid citation regex"));

/// Replaces non-breaking spaces, collapses whitespace runs and trims
pub fn normalize(text: &str) -> String {
    let replaced = text.replace('\u{a0}', " ");
    PATTERN_WHITESPACE
        .replace_all(&replaced, " ")
        .trim()
        .to_string()
}

/// Removes `[<digits>]` citation markers
pub fn strip_citations(text: &str) -> String {
    PATTERN_CITATION.replace_all(text, "").into_owned()
}

/// Normalized text content of an element
pub fn element_text(element: &ElementRef) -> String {
    let raw: String = element.text().collect();
    normalize(&raw)
}

/// Plain text of an HTML snippet such as a MediaWiki display title
pub fn plain_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    element_text(&fragment.root_element())
}

/// Text content with every `<br>` rendered as a newline
pub fn text_with_breaks(element: &ElementRef) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "br" => out.push('\n'),
            _ => {}
        }
    }
    out
}

/// True when the element has at least one `<br>` descendant
pub fn has_line_breaks(element: &ElementRef) -> bool {
    element.select(&SELECTOR_BR).next().is_some()
}

/// Normalized texts of every non-empty `<li>` below the element
pub fn list_item_texts(element: &ElementRef) -> Vec<String> {
    element
        .select(&SELECTOR_LI)
        .map(|li| element_text(&li))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Flattens one table cell into a single string.
///
/// List items are joined with `"; "`; otherwise line breaks become `"; "`
/// separators; otherwise the flat text is returned.
pub fn cell_to_text(cell: &ElementRef) -> String {
    if cell.select(&SELECTOR_LI).next().is_some() {
        return list_item_texts(cell).join("; ");
    }

    if has_line_breaks(cell) {
        return text_with_breaks(cell)
            .split('\n')
            .map(normalize)
            .filter(|piece| !piece.is_empty())
            .collect::<Vec<_>>()
            .join("; ");
    }

    element_text(cell)
}
