//! Page-name extraction from the current navigable location.

use url::Url;

const BASE: &str = "http://localhost/";

/// Final path segment of `location`, or `default_page` when the path is
/// empty or ends with `/`.
///
/// Accepts absolute URLs (`https://shop.example/products/shoes.html?x=1`)
/// as well as bare paths (`/products/shoes.html`).
pub fn page_name(location: &str, default_page: &str) -> String {
    let parsed =
        Url::parse(location).or_else(|_| Url::parse(BASE).and_then(|base| base.join(location)));

    let last = match &parsed {
        Ok(url) => url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string),
        Err(_) => location
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .map(str::to_string),
    };

    match last {
        Some(segment) if !segment.is_empty() => segment,
        _ => default_page.to_string(),
    }
}
