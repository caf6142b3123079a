// * Prose "Key: Value" extraction from paragraphs and list items

use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

use super::kv::KvMap;
use super::text::{element_text, normalize};
use crate::config::constants::MAX_PROSE_KEY_CHARS;

static SELECTOR_PROSE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p, li").expect("Invalid prose selector"));

/// Splits a line at its first colon into a plausible key/value pair
pub fn split_colon_pair(text: &str) -> Option<(String, String)> {
    let (raw_key, raw_value) = text.split_once(':')?;
    let key = normalize(raw_key);
    let value = normalize(raw_value);

    if key.is_empty() || value.is_empty() {
        return None;
    }
    // * Long "keys" are sentences with an incidental colon
    if key.chars().count() > MAX_PROSE_KEY_CHARS {
        return None;
    }

    Some((key, value))
}

/// Collects "Key: Value" pairs from every `p` and `li` below `root`
pub fn extract_colon_kv(root: &ElementRef) -> KvMap {
    let mut kv = KvMap::new();
    for node in root.select(&SELECTOR_PROSE) {
        if let Some((key, value)) = split_colon_pair(&element_text(&node)) {
            kv.accumulate(key, value);
        }
    }
    kv
}
