//! Problem URL slug extraction.

use regex::Regex;
use std::sync::LazyLock;

/// Pattern for `.../problems/{slug}/...`
static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/problems/([^/?#\s]+)").expect("Invalid regex")
});

/// Extracts the problem slug from a problem URL.
///
/// Returns `None` when the URL has no `/problems/{slug}` segment.
///
/// ```
/// use focus_core::extract_slug;
///
/// assert_eq!(
///     extract_slug("https://leetcode.com/problems/two-sum/description/").as_deref(),
///     Some("two-sum")
/// );
/// assert_eq!(extract_slug("https://leetcode.com/contest/"), None);
/// ```
pub fn extract_slug(url: &str) -> Option<String> {
    SLUG_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Turns a slug into a readable title: `"two-sum"` becomes `"Two Sum"`.
pub fn humanize_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
