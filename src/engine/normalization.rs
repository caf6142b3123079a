use url::Url;

// * Resolves an item image reference to an absolute URL.
// *
// * Logic:
// * 1. Missing, blank or inline `data:` sources fall back to the placeholder.
// * 2. Absolute http(s) passes through untouched.
// * 3. Protocol-relative `//host/...` gets `https:`.
// * 4. Everything else is joined onto the wiki origin.
pub fn resolve_image_url(src: Option<&str>, origin: &str, placeholder: &str) -> String {
    let Some(src) = src.map(str::trim).filter(|s| !s.is_empty()) else {
        return placeholder.to_string();
    };

    if src.starts_with("data:") {
        return placeholder.to_string();
    }

    if let Some(rest) = src.strip_prefix("//") {
        return match Url::parse(&format!("https://{rest}")) {
            Ok(url) => url.to_string(),
            Err(_) => placeholder.to_string(),
        };
    }

    if let Ok(url) = Url::parse(src) {
        // ! Only web schemes are usable by a consumer
        return match url.scheme() {
            "http" | "https" => src.to_string(),
            _ => placeholder.to_string(),
        };
    }

    Url::parse(origin)
        .and_then(|base| base.join(src))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| placeholder.to_string())
}

// * Canonical page URL: origin + title with spaces as underscores.
// * The title is pushed as one path segment so `/`, `?` and `#` stay escaped.
pub fn page_url(origin: &str, title: &str) -> Option<String> {
    let mut url = Url::parse(origin).ok()?;
    let slug = title.trim().replace(' ', "_");
    url.path_segments_mut().ok()?.clear().push(&slug);
    Some(url.to_string())
}
