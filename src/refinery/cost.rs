// * Cost extraction
// * Header-driven lookup for item pages, currency-token scanning for landing rows.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

use super::text::{element_text, normalize, strip_citations};
use crate::config::constants::COST_UNKNOWN;

static SELECTOR_INFOBOX_ROWS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.infobox tr").expect("Invalid infobox row selector"));
static SELECTOR_TABLE_ROWS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table tr").expect("Invalid table row selector"));
static SELECTOR_TH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th").expect("Invalid th selector"));
static SELECTOR_TD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("Invalid td selector"));

static PATTERN_PRICE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)price|cost|buy").expect("Invalid price header regex"));

// * "120 aUEC", "1,500UEC", "32 SCU"
static PATTERN_CURRENCY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d[\d,.]*\s*(?:auec|uec|scu)\b").expect("Invalid currency regex")
});

/// True for the "N/A" sentinel (or an empty string)
pub fn is_unknown_cost(cost: &str) -> bool {
    let trimmed = cost.trim();
    trimmed.is_empty() || trimmed == COST_UNKNOWN
}

/// First currency-like token in `text`, citations stripped first
pub fn find_currency_token(text: &str) -> Option<String> {
    let cleaned = strip_citations(text);
    PATTERN_CURRENCY
        .find(&cleaned)
        .map(|m| m.as_str().trim().to_string())
}

/// Scans candidate cell texts in order for the first currency-like token.
///
/// Returns `"N/A"` when none carries one.
pub fn extract_cost_from_cells<I, S>(cells: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    cells
        .into_iter()
        .find_map(|cell| find_currency_token(cell.as_ref()))
        .unwrap_or_else(|| COST_UNKNOWN.to_string())
}

/// Price from the first row whose header reads price/cost/buy.
///
/// Infobox rows are checked before other table rows; `"N/A"` when no row has
/// both such a header and a non-empty data cell.
pub fn extract_price_by_header(document: &Html) -> String {
    let rows = document
        .select(&SELECTOR_INFOBOX_ROWS)
        .chain(document.select(&SELECTOR_TABLE_ROWS));

    for row in rows {
        let Some(header) = row.select(&SELECTOR_TH).next() else {
            continue;
        };
        let Some(cell) = row.select(&SELECTOR_TD).next() else {
            continue;
        };
        if !PATTERN_PRICE_HEADER.is_match(&element_text(&header)) {
            continue;
        }
        let value = normalize(&strip_citations(&element_text(&cell)));
        if !value.is_empty() {
            return value;
        }
    }

    COST_UNKNOWN.to_string()
}

/// Detail cost unless it is the sentinel, then the stub cost, then `"N/A"`
pub fn prefer_cost(detail: &str, stub: &str) -> String {
    if !is_unknown_cost(detail) {
        detail.trim().to_string()
    } else if !is_unknown_cost(stub) {
        stub.trim().to_string()
    } else {
        COST_UNKNOWN.to_string()
    }
}
