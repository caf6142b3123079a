// * Section HTML → plain structured data (KV pairs, tables, lists)

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::kv::KvMap;
use super::prose::extract_colon_kv;
use super::tables::{extract_kv_from_two_col_table, interpret_table, TableResult};
use super::text::element_text;

static SELECTOR_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("Invalid table selector"));
static SELECTOR_LISTS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul, ol").expect("Invalid list selector"));

/// Everything extracted from one section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionData {
    pub kv: KvMap,
    pub tables: Vec<TableResult>,
    pub lists: Vec<Vec<String>>,
}

/// Non-empty texts of a list's direct items
fn list_items(list: &ElementRef) -> Vec<String> {
    list.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li")
        .map(|li| element_text(&li))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Extracts KV pairs, tables and plain lists from a parsed fragment.
///
/// Two-column tables feed the KV map; every table with data rows is kept as
/// row objects. Prose pairs only fill keys the tables did not provide.
pub fn extract_section_data(root: &ElementRef) -> SectionData {
    let mut data = SectionData::default();

    for table in root.select(&SELECTOR_TABLE) {
        let (matrix, result) = interpret_table(&table);
        data.kv.extend_appending(extract_kv_from_two_col_table(&matrix));
        if !result.rows.is_empty() {
            data.tables.push(result);
        }
    }

    for (key, value) in extract_colon_kv(root) {
        data.kv.insert_if_absent(key, value);
    }

    data.lists = root
        .select(&SELECTOR_LISTS)
        .map(|list| list_items(&list))
        .filter(|items| !items.is_empty())
        .collect();

    data
}

/// Parses section HTML and extracts its structured data
pub fn section_html_to_plain_data(html: &str) -> SectionData {
    let fragment = Html::parse_fragment(html);
    extract_section_data(&fragment.root_element())
}
