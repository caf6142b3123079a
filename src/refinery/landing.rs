// * Landing page extraction
// * Every data row of the landing page's tables becomes a low-confidence item stub.

use indexmap::IndexMap;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::cost::{extract_cost_from_cells, find_currency_token};
use super::requirements::{extract_requirements, IngredientRequirement};
use super::tables::{row_cells, table_rows, table_to_cell_grid};
use super::text::{cell_to_text, element_text, normalize};
use crate::config::constants::COST_UNKNOWN;

static SELECTOR_CONTENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".mw-parser-output").expect("Invalid content selector"));
static SELECTOR_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("Invalid table selector"));
static SELECTOR_TITLED_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[title]").expect("Invalid titled link selector"));
static SELECTOR_IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("Invalid img selector"));

// * Header substrings that mark the requirements column
const REQUIREMENT_HEADER_HINTS: [&str; 6] =
    ["reward", "need", "ingredient", "depend", "require", "craft"];

// * Link targets that never name an item
const NON_ITEM_NAMESPACES: [&str; 4] = ["File:", "Category:", "Special:", "Template:"];

// * MediaWiki appends this to red links
const MISSING_PAGE_SUFFIX: &str = " (page does not exist)";

/// Item data guessed from a landing-page row or a category listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemStub {
    pub title: String,
    pub page_id: Option<u64>,
    pub image: Option<String>,
    pub cost: String,
    pub ingredients: Vec<IngredientRequirement>,
}

impl ItemStub {
    /// A stub that knows nothing beyond its title
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            cost: COST_UNKNOWN.to_string(),
            ..Default::default()
        }
    }

    pub fn with_page_id(mut self, page_id: u64) -> Self {
        self.page_id = Some(page_id);
        self
    }
}

/// Image source of an `img`, skipping inline `data:` placeholders of lazy loaders
pub fn image_source(img: &ElementRef) -> Option<String> {
    let usable = |src: &&str| !src.trim().is_empty() && !src.trim_start().starts_with("data:");
    img.value()
        .attr("src")
        .filter(usable)
        .or_else(|| img.value().attr("data-src").filter(usable))
        .map(|src| src.trim().to_string())
}

fn is_image_link(link: &ElementRef) -> bool {
    link.value()
        .classes()
        .any(|c| c == "image" || c == "mw-file-description")
}

/// Title of the first link naming an item page
pub fn item_title(row: &ElementRef) -> Option<String> {
    row.select(&SELECTOR_TITLED_LINK)
        .filter(|link| !is_image_link(link))
        .filter_map(|link| link.value().attr("title").map(normalize))
        .map(|title| {
            title
                .strip_suffix(MISSING_PAGE_SUFFIX)
                .map(str::to_string)
                .unwrap_or(title)
        })
        .find(|title| {
            !title.is_empty() && !NON_ITEM_NAMESPACES.iter().any(|ns| title.starts_with(ns))
        })
}

/// Index of the first header hinting at requirements
pub fn requirement_column(headers: &[String]) -> Option<usize> {
    headers.iter().position(|header| {
        let lower = header.to_lowercase();
        REQUIREMENT_HEADER_HINTS.iter().any(|hint| lower.contains(hint))
    })
}

fn is_data_cell(cell: &ElementRef) -> bool {
    cell.value().name() == "td"
}

fn holds_title_link(cell: &ElementRef, title: &str) -> bool {
    cell.select(&SELECTOR_TITLED_LINK).any(|link| {
        link.value()
            .attr("title")
            .is_some_and(|t| normalize(t).starts_with(title))
    })
}

// * Without a matching header: the last data cell that is neither the title nor a price
fn fallback_requirement_cell<'a>(cells: &[ElementRef<'a>], title: &str) -> Option<ElementRef<'a>> {
    let data: Vec<&ElementRef<'a>> = cells.iter().filter(|c| is_data_cell(c)).collect();
    if data.len() < 2 {
        return None;
    }
    data.into_iter()
        .rev()
        .find(|cell| {
            let text = element_text(cell);
            !text.is_empty()
                && !holds_title_link(cell, title)
                && find_currency_token(&text).is_none()
        })
        .copied()
}

// * `grid_row` is the row's span-expanded layout; header positions index into it
fn stub_from_row<'a>(
    row: &ElementRef<'a>,
    grid_row: &[Option<ElementRef<'a>>],
    requirement_col: Option<usize>,
) -> Option<ItemStub> {
    let cells = row_cells(row);
    if !cells.iter().any(is_data_cell) {
        return None;
    }

    let title = item_title(row)?;

    let requirement_cell = match requirement_col {
        Some(col) => grid_row.get(col).copied().flatten(),
        None => fallback_requirement_cell(&cells, &title),
    };

    let data_texts = cells
        .iter()
        .filter(|c| is_data_cell(c))
        .map(|c| element_text(c));
    let cost = extract_cost_from_cells(
        requirement_cell
            .iter()
            .map(|c| element_text(c))
            .chain(data_texts),
    );

    let image = row.select(&SELECTOR_IMG).find_map(|img| image_source(&img));

    let ingredients = requirement_cell
        .map(|cell| extract_requirements(&cell))
        .unwrap_or_default();

    Some(ItemStub {
        title,
        page_id: None,
        image,
        cost,
        ingredients,
    })
}

/// Stubs from every data row of one table
pub fn stubs_from_table(table: &ElementRef) -> Vec<ItemStub> {
    let rows = table_rows(table);
    let grid = table_to_cell_grid(table);
    let Some(first) = rows.first() else {
        return Vec::new();
    };

    // * Headers are read from the expanded grid so a colspan header keeps columns aligned
    let has_header = row_cells(first).iter().any(|c| c.value().name() == "th");
    let headers: Vec<String> = if has_header {
        grid.first()
            .map(|cells| {
                cells
                    .iter()
                    .map(|cell| cell.as_ref().map(cell_to_text).unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default()
    } else {
        Vec::new()
    };
    let start = usize::from(has_header);

    let requirement_col = requirement_column(&headers);
    rows.iter()
        .zip(grid.iter())
        .skip(start)
        .filter_map(|(row, grid_row)| stub_from_row(row, grid_row, requirement_col))
        .collect()
}

/// Stubs from every table in the page's main content area.
///
/// Duplicate titles collapse: the first occurrence fixes the position, the
/// last occurrence supplies the data.
pub fn extract_landing_stubs(html: &str) -> Vec<ItemStub> {
    let document = Html::parse_document(html);
    let root = document
        .select(&SELECTOR_CONTENT)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut stubs: IndexMap<String, ItemStub> = IndexMap::new();
    for table in root.select(&SELECTOR_TABLE) {
        for stub in stubs_from_table(&table) {
            stubs.insert(stub.title.clone(), stub);
        }
    }
    stubs.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(name: &str, quantity: u32) -> IngredientRequirement {
        IngredientRequirement::new(name, quantity)
    }

    #[test]
    fn test_single_row_with_ingredients() {
        let html = r#"<div class="mw-parser-output"><table>
            <tr><th>Item</th><th>Ingredients</th></tr>
            <tr><td><a href="/Widget" title="Widget">Widget</a></td><td>2x Bolt</td></tr>
        </table></div>"#;
        let stubs = extract_landing_stubs(html);
        assert_eq!(stubs.len(), 1);
        assert_eq!(stubs[0].title, "Widget");
        assert_eq!(stubs[0].ingredients, vec![req("Bolt", 2)]);
        assert_eq!(stubs[0].cost, "N/A");
        assert_eq!(stubs[0].image, None);
    }

    #[test]
    fn test_fallback_requirement_cell_without_matching_header() {
        let html = r#"<table>
            <tr><th>Item</th><th>Price</th><th>What you bring</th></tr>
            <tr><td><a title="Widget">Widget</a></td><td>120 aUEC</td><td>2x Bolt</td></tr>
        </table>"#;
        let stubs = extract_landing_stubs(html);
        assert_eq!(stubs[0].ingredients, vec![req("Bolt", 2)]);
        assert_eq!(stubs[0].cost, "120 aUEC");
    }

    #[test]
    fn test_rows_without_title_are_rejected() {
        let html = r#"<table>
            <tr><th>Item</th><th>Needs</th></tr>
            <tr><td>Unlinked</td><td>Gold</td></tr>
            <tr><th colspan="2">Group header</th></tr>
            <tr><td><a class="mw-file-description" title="File:Bolt.png"><img src="/x.png"></a></td><td>Gold</td></tr>
        </table>"#;
        assert!(extract_landing_stubs(html).is_empty());
    }

    #[test]
    fn test_image_and_cost_from_row() {
        let html = r#"<table>
            <tr><th>Image</th><th>Item</th><th>Requirements</th></tr>
            <tr>
                <td><img src="data:image/gif;base64,R0l" data-src="//media.example/polaris.png"></td>
                <td><a title="Polaris">Polaris</a></td>
                <td><ul><li>50 SCU of Wikelo Favor</li><li>Irradiated Pearl x3</li></ul></td>
            </tr>
        </table>"#;
        let stubs = extract_landing_stubs(html);
        assert_eq!(stubs[0].image.as_deref(), Some("//media.example/polaris.png"));
        assert_eq!(
            stubs[0].ingredients,
            vec![req("SCU of Wikelo Favor", 50), req("Irradiated Pearl", 3)]
        );
        assert_eq!(stubs[0].cost, "50 SCU");
    }

    #[test]
    fn test_duplicate_titles_keep_first_position_last_data() {
        let html = r#"<table>
            <tr><th>Item</th><th>Ingredients</th></tr>
            <tr><td><a title="Alpha">Alpha</a></td><td>Gold</td></tr>
            <tr><td><a title="Beta">Beta</a></td><td>Iron</td></tr>
            <tr><td><a title="Alpha">Alpha</a></td><td>3 Titanium</td></tr>
        </table>"#;
        let stubs = extract_landing_stubs(html);
        let titles: Vec<&str> = stubs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Beta"]);
        assert_eq!(stubs[0].ingredients, vec![req("Titanium", 3)]);
    }

    #[test]
    fn test_requirement_column_follows_row_spans() {
        let html = r#"<table>
            <tr><th>Category</th><th>Item</th><th>Ingredients</th></tr>
            <tr>
                <td rowspan="2">Armor</td>
                <td><a title="Alpha">Alpha</a></td>
                <td>2x Bolt</td>
            </tr>
            <tr><td><a title="Beta">Beta</a></td><td>3 Gold</td></tr>
        </table>"#;
        let stubs = extract_landing_stubs(html);
        assert_eq!(stubs.len(), 2);
        assert_eq!(stubs[0].ingredients, vec![req("Bolt", 2)]);
        assert_eq!(stubs[1].title, "Beta");
        assert_eq!(stubs[1].ingredients, vec![req("Gold", 3)]);
    }

    #[test]
    fn test_requirement_column_after_colspan_header() {
        let html = r#"<table>
            <tr><th colspan="2">Item</th><th>Requirements</th></tr>
            <tr>
                <td><img src="/a.png"></td>
                <td><a title="Alpha">Alpha</a></td>
                <td><ul><li>Titanium × 4</li><li>Gold</li></ul></td>
            </tr>
        </table>"#;
        let stubs = extract_landing_stubs(html);
        assert_eq!(stubs[0].ingredients, vec![req("Titanium", 4), req("Gold", 1)]);
    }

    #[test]
    fn test_red_link_title_suffix_removed() {
        let html = r#"<table>
            <tr><td><a class="new" title="Pearl Armor (page does not exist)">Pearl Armor</a></td><td>Gold</td></tr>
        </table>"#;
        let stubs = extract_landing_stubs(html);
        assert_eq!(stubs[0].title, "Pearl Armor");
    }

    #[test]
    fn test_requirement_column_hints() {
        let headers: Vec<String> = ["Item", "Dependencies", "Needs"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(requirement_column(&headers), Some(1));
        assert_eq!(requirement_column(&["Item".to_string()]), None);
    }
}
