// * Span-aware table extraction
// * Densifies rowspan/colspan tables into rectangular matrices, then interprets
// * them as header-keyed row objects or as two-column key/value tables.

use indexmap::IndexMap;
use regex::Regex;
use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::kv::KvMap;
use super::text::{cell_to_text, element_text, normalize};
use crate::config::constants::{MAX_COLSPAN, MAX_ROWSPAN};

// * Precompiled CSS selectors
static SELECTOR_TR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("Invalid tr selector"));

// * First-column values that mark a header row in a two-column table
static PATTERN_KV_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(key|value|name|description)$").expect("Invalid KV header regex")
});

/// Rectangular grid of normalized cell strings
pub type CellMatrix = Vec<Vec<String>>;

/// One data row keyed by header
pub type TableRow = IndexMap<String, String>;

/// A table interpreted as header-keyed rows
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableResult {
    pub caption: String,
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// The owning cell of every grid position, `None` for gaps and padding
pub type CellGrid<'a> = Vec<Vec<Option<ElementRef<'a>>>>;

// * Pending rowspan fill for one column
#[derive(Debug, Clone)]
struct Carry<T> {
    remaining: usize,
    value: T,
}

/// Rows owned by this table; rows of nested tables are left to the nested table
pub fn table_rows<'a>(table: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let table_id = table.id();
    table
        .select(&SELECTOR_TR)
        .filter(|tr| {
            tr.ancestors()
                .find(|node| node.value().as_element().is_some_and(|el| el.name() == "table"))
                .map(|node| node.id())
                == Some(table_id)
        })
        .collect()
}

/// Direct `th`/`td` children of a row
pub fn row_cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "th" | "td"))
        .collect()
}

/// True when the table's first row holds at least one `th`
pub fn first_row_has_header(table: &ElementRef) -> bool {
    table_rows(table)
        .first()
        .is_some_and(|row| row_cells(row).iter().any(|c| c.value().name() == "th"))
}

/// Normalized text of the table's own caption, empty when absent
pub fn table_caption(table: &ElementRef) -> String {
    table
        .children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "caption")
        .map(|caption| element_text(&caption))
        .unwrap_or_default()
}

// * Leading digits only, like a lenient integer parse; non-positive falls back to 1
fn span_attr(cell: &ElementRef, name: &str, max: usize) -> usize {
    cell.value()
        .attr(name)
        .and_then(|raw| {
            let digits: String = raw
                .trim()
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            digits.parse::<usize>().ok()
        })
        .filter(|n| *n > 0)
        .map_or(1, |n| n.min(max))
}

fn is_active<T>(carry: Option<&Option<Carry<T>>>) -> bool {
    matches!(carry, Some(Some(c)) if c.remaining > 0)
}

// * Copies carried values into the row while the next column is still spanned
fn fill_carried<T: Clone>(carries: &mut [Option<Carry<T>>], row: &mut Vec<T>) {
    while let Some(Some(carry)) = carries.get_mut(row.len()) {
        if carry.remaining == 0 {
            break;
        }
        carry.remaining -= 1;
        row.push(carry.value.clone());
    }
}

// * Walks the table's own rows placing one value per covered grid position.
// * Rows come back ragged; callers pad.
fn expand_spans<'a, T, F>(table: &ElementRef<'a>, value_of: F, gap: T) -> Vec<Vec<T>>
where
    T: Clone,
    F: Fn(&ElementRef<'a>) -> T,
{
    let mut grid: Vec<Vec<T>> = Vec::new();
    let mut carries: Vec<Option<Carry<T>>> = Vec::new();

    for row in table_rows(table) {
        let mut out: Vec<T> = Vec::new();

        for cell in row_cells(&row) {
            fill_carried(&mut carries, &mut out);

            let value = value_of(&cell);
            let rowspan = span_attr(&cell, "rowspan", MAX_ROWSPAN);
            let colspan = span_attr(&cell, "colspan", MAX_COLSPAN);

            for _ in 0..colspan {
                let col = out.len();
                if rowspan > 1 {
                    if carries.len() <= col {
                        carries.resize(col + 1, None);
                    }
                    carries[col] = Some(Carry {
                        remaining: rowspan - 1,
                        value: value.clone(),
                    });
                }
                out.push(value.clone());
            }
        }

        fill_carried(&mut carries, &mut out);

        // * Spanned columns past a gap still belong to this row
        if let Some(last) = (0..carries.len()).rev().find(|i| is_active(carries.get(*i))) {
            while out.len() <= last {
                if is_active(carries.get(out.len())) {
                    fill_carried(&mut carries, &mut out);
                } else {
                    out.push(gap.clone());
                }
            }
        }

        grid.push(out);
    }

    grid
}

fn pad_rows<T: Clone>(grid: &mut [Vec<T>], filler: T) {
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    for row in grid.iter_mut() {
        row.resize(width, filler.clone());
    }
}

/// Expands a table into a dense matrix.
///
/// Spanned cells are duplicated into every grid position they cover and every
/// row is padded to the widest row.
pub fn table_to_matrix(table: &ElementRef) -> CellMatrix {
    let mut grid = expand_spans(table, cell_to_text, String::new());
    pad_rows(&mut grid, String::new());
    grid.into_iter()
        .map(|row| row.iter().map(|cell| normalize(cell)).collect())
        .collect()
}

/// Same layout as `table_to_matrix`, but each position holds the cell element
/// covering it, so callers can read the cell's markup by grid column.
pub fn table_to_cell_grid<'a>(table: &ElementRef<'a>) -> CellGrid<'a> {
    let mut grid = expand_spans(table, |cell| Some(*cell), None);
    pad_rows(&mut grid, None);
    grid
}

/// Interprets a matrix as header-keyed rows.
///
/// With a header row its texts become headers (`col<N>` for blanks, 1-based);
/// without one every header is `col<N>` and every row is data. All-empty rows
/// are dropped.
pub fn matrix_to_objects(matrix: &CellMatrix, header_row: bool) -> (Vec<String>, Vec<TableRow>) {
    let Some(first) = matrix.first() else {
        return (Vec::new(), Vec::new());
    };

    let headers: Vec<String> = first
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if header_row && !h.is_empty() {
                h.clone()
            } else {
                format!("col{}", i + 1)
            }
        })
        .collect();

    let start = usize::from(header_row);
    let rows = matrix[start..]
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| (h.clone(), row.get(i).cloned().unwrap_or_default()))
                .collect::<TableRow>()
        })
        .collect();

    (headers, rows)
}

/// Key/value pairs of a table exactly two columns wide.
///
/// Rows with an empty side or a header-like key (`key`, `value`, `name`,
/// `description`) contribute nothing.
pub fn extract_kv_from_two_col_table(matrix: &CellMatrix) -> KvMap {
    let mut kv = KvMap::new();
    if matrix.first().map(Vec::len) != Some(2) {
        return kv;
    }

    for row in matrix {
        let key = normalize(&row[0]);
        let value = normalize(&row[1]);
        if key.is_empty() || value.is_empty() {
            continue;
        }
        if PATTERN_KV_HEADER.is_match(&key) {
            continue;
        }
        kv.accumulate(key, value);
    }

    kv
}

/// Builds the matrix and interprets it as row objects with the table caption
pub fn interpret_table(table: &ElementRef) -> (CellMatrix, TableResult) {
    let matrix = table_to_matrix(table);
    let (headers, rows) = matrix_to_objects(&matrix, first_row_has_header(table));
    let result = TableResult {
        caption: table_caption(table),
        headers,
        rows,
    };
    (matrix, result)
}
