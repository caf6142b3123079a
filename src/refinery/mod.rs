// * The Refinery (Extraction Engine)
// * Turns irregular wiki HTML into structured fragments: dense table matrices,
// * KV maps, requirements, costs, item stubs and item details.
// * Nothing in here fails: malformed markup degrades to empty values or sentinels.

pub mod cost;
pub mod detail;
pub mod kv;
pub mod landing;
pub mod prose;
pub mod requirements;
pub mod section;
pub mod tables;
pub mod text;

// * Re-exports for convenient access
pub use cost::{extract_cost_from_cells, extract_price_by_header, prefer_cost};
pub use detail::{extract_item_detail, ItemDetail};
pub use kv::{KvMap, KvValue};
pub use landing::{extract_landing_stubs, ItemStub};
pub use prose::extract_colon_kv;
pub use requirements::{
    extract_heading_ingredients, extract_requirements, parse_requirement_fragment,
    IngredientRequirement,
};
pub use section::{section_html_to_plain_data, SectionData};
pub use tables::{
    extract_kv_from_two_col_table, matrix_to_objects, table_to_matrix, CellMatrix, TableResult,
    TableRow,
};
pub use text::{cell_to_text, normalize};
