// * Item detail page extraction (price, ingredients, image, display title)

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::cost::extract_price_by_header;
use super::landing::image_source;
use super::requirements::{extract_heading_ingredients, IngredientRequirement};
use super::text::plain_text;

// * Image lookup order: infobox, figures, anything
static SELECTOR_IMAGE_CANDIDATES: LazyLock<[Selector; 3]> = LazyLock::new(|| {
    [".infobox img", "figure img", "img"]
        .map(|css| Selector::parse(css).expect("Invalid image selector"))
});

/// Fields an item's own page can contribute
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemDetail {
    pub display_title: Option<String>,
    pub image: Option<String>,
    pub cost: String,
    pub ingredients: Vec<IngredientRequirement>,
}

/// First usable image source, by preference order
pub fn primary_image(document: &Html) -> Option<String> {
    SELECTOR_IMAGE_CANDIDATES.iter().find_map(|selector| {
        document
            .select(selector)
            .find_map(|img| image_source(&img))
    })
}

/// Extracts detail fields from a rendered page.
///
/// `display_title` is the MediaWiki display title, which may carry markup.
pub fn extract_item_detail(html: &str, display_title: Option<&str>) -> ItemDetail {
    let document = Html::parse_document(html);
    ItemDetail {
        display_title: display_title
            .map(plain_text)
            .filter(|title| !title.is_empty()),
        image: primary_image(&document),
        cost: extract_price_by_header(&document),
        ingredients: extract_heading_ingredients(&document),
    }
}
