// * Requirement/ingredient extraction
// * Parses free-form "quantity + name" notations found in wiki cells and
// * under recipe headings into structured requirements.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

use super::text::{has_line_breaks, normalize, strip_citations, text_with_breaks};

static SELECTOR_LI: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("Invalid li selector"));
static SELECTOR_HEADINGS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2, h3, h4").expect("Invalid heading selector"));

// * "2x Bolt", "3 Iron Ore", "4 × Titanium", "1,000 Scrap"
static PATTERN_QTY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d[\d,]*(?:\.\d+)?)(?:\s*[×x*]\s+|[×x*]|\s+)(.+)$")
        .expect("Invalid quantity-first regex")
});

// * "Titanium × 4", "Gold x2", "Wikelo Favor 12"
// * A bare `x` needs whitespace before it so "Quantum Flux 3" keeps its name
static PATTERN_NAME_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?)(?:\s*[×*]\s*|\s+x\s*|\s+)(\d[\d,]*)$")
        .expect("Invalid name-first regex")
});

// * Unanchored forms seen under recipe headings
static PATTERN_LOOSE_TIMES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(.+?)(?:\s*[×*]\s*|\s+x\s*)(\d+)").expect("Invalid loose multiplier regex")
});
static PATTERN_LOOSE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(.+?)\s*(\d+)x").expect("Invalid loose suffix regex"));

// * Delimiters for cells without list or line-break structure
static PATTERN_DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n•·;,]").expect("Invalid delimiter regex"));

static PATTERN_RECIPE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ingredient|recipe|required|craft").expect("Invalid recipe heading regex")
});

/// One required item and how many of it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngredientRequirement {
    pub name: String,
    pub quantity: u32,
}

impl IngredientRequirement {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.max(1),
        }
    }
}

/// Parses a quantity; fractions truncate, zero or garbage become 1
pub fn parse_quantity(raw: &str) -> u32 {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    match cleaned.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 1.0 => n.trunc().min(u32::MAX as f64) as u32,
        _ => 1,
    }
}

fn clean_fragment(raw: &str) -> String {
    normalize(&strip_citations(raw))
}

// * Quantity-first, then name-first; None when neither shape matches
fn match_strict(text: &str) -> Option<IngredientRequirement> {
    if let Some(caps) = PATTERN_QTY_FIRST.captures(text) {
        let name = caps[2].trim();
        if !name.is_empty() {
            return Some(IngredientRequirement::new(name, parse_quantity(&caps[1])));
        }
    }
    if let Some(caps) = PATTERN_NAME_FIRST.captures(text) {
        let name = caps[1].trim();
        if !name.is_empty() {
            return Some(IngredientRequirement::new(name, parse_quantity(&caps[2])));
        }
    }
    None
}

/// Parses one fragment such as `"2x Bolt"` or `"Titanium × 4"`.
///
/// Returns `None` for fragments that are empty once citations are stripped;
/// anything else yields a requirement, defaulting to quantity 1.
pub fn parse_requirement_fragment(raw: &str) -> Option<IngredientRequirement> {
    let text = clean_fragment(raw);
    if text.is_empty() {
        return None;
    }
    Some(match_strict(&text).unwrap_or_else(|| IngredientRequirement::new(text, 1)))
}

/// Splits free text on newline, bullet, semicolon or comma and parses each piece
pub fn parse_requirements_text(text: &str) -> Vec<IngredientRequirement> {
    PATTERN_DELIMITERS
        .split(text)
        .filter_map(parse_requirement_fragment)
        .collect()
}

/// Extracts requirements from a cell or element.
///
/// List items win over line breaks, which win over delimiter splitting.
pub fn extract_requirements(element: &ElementRef) -> Vec<IngredientRequirement> {
    let items: Vec<ElementRef> = element.select(&SELECTOR_LI).collect();
    if !items.is_empty() {
        return items
            .iter()
            .filter_map(|li| parse_requirement_fragment(&li.text().collect::<String>()))
            .collect();
    }

    if has_line_breaks(element) {
        return text_with_breaks(element)
            .split('\n')
            .filter_map(parse_requirement_fragment)
            .collect();
    }

    let raw: String = element.text().collect();
    parse_requirements_text(&raw)
}

/// Parses a list item under a recipe heading, accepting the looser notations
pub fn parse_loose_requirement(raw: &str) -> Option<IngredientRequirement> {
    let text = clean_fragment(raw);
    if text.is_empty() {
        return None;
    }
    if let Some(found) = match_strict(&text) {
        return Some(found);
    }

    let loose = PATTERN_LOOSE_TIMES
        .captures(&text)
        .or_else(|| PATTERN_LOOSE_SUFFIX.captures(&text))
        .and_then(|caps| {
            let name = caps[1].trim();
            (!name.is_empty()).then(|| IngredientRequirement::new(name, parse_quantity(&caps[2])))
        });

    Some(loose.unwrap_or_else(|| IngredientRequirement::new(text, 1)))
}

fn heading_level_of(name: &str) -> Option<u8> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn is_heading_wrapper(el: &ElementRef) -> bool {
    el.value().classes().any(|c| c == "mw-heading")
}

// * Heading level of an element, looking through MediaWiki's mw-heading wrapper
fn heading_level(el: &ElementRef) -> Option<u8> {
    if let Some(level) = heading_level_of(el.value().name()) {
        return Some(level);
    }
    if is_heading_wrapper(el) {
        return el
            .children()
            .filter_map(ElementRef::wrap)
            .find_map(|child| heading_level_of(child.value().name()));
    }
    None
}

/// Requirements listed under "Ingredients"/"Recipe"/"Required"/"Crafting" headings.
///
/// Each matching heading's span runs until the next heading of equal or higher
/// priority; every list item inside it is parsed.
pub fn extract_heading_ingredients(document: &Html) -> Vec<IngredientRequirement> {
    let mut ingredients = Vec::new();
    // * A matching subheading sits inside its parent's span; each item counts once
    let mut seen = HashSet::new();

    for heading in document.select(&SELECTOR_HEADINGS) {
        let title: String = heading.text().collect();
        if !PATTERN_RECIPE_HEADING.is_match(&title) {
            continue;
        }
        let Some(level) = heading_level(&heading) else {
            continue;
        };

        let anchor = heading
            .parent()
            .and_then(ElementRef::wrap)
            .filter(is_heading_wrapper)
            .unwrap_or(heading);

        for sibling in anchor.next_siblings().filter_map(ElementRef::wrap) {
            if heading_level(&sibling).is_some_and(|l| l <= level) {
                break;
            }
            for li in sibling.select(&SELECTOR_LI) {
                if !seen.insert(li.id()) {
                    continue;
                }
                if let Some(found) = parse_loose_requirement(&li.text().collect::<String>()) {
                    ingredients.push(found);
                }
            }
        }
    }

    ingredients
}
