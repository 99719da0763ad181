//! URL construction for upstream endpoints.

use url::Url;

/// Appends path segments and query pairs to `base`.
///
/// Segments are percent-encoded; an empty final segment yields a trailing
/// slash, which the submit endpoints require.
pub(crate) fn build_url(
    base: &str,
    segments: &[&str],
    query: &[(&str, &str)],
) -> Result<String, String> {
    let mut url = Url::parse(base).map_err(|e| format!("{base}: {e}"))?;
    url.path_segments_mut()
        .map_err(|()| format!("{base}: cannot be a base URL"))?
        .pop_if_empty()
        .extend(segments);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_with_query() {
        let url = build_url(
            "https://alfa-leetcode-api.onrender.com",
            &["alice", "acSubmission"],
            &[("limit", "20")],
        )
        .unwrap();
        assert_eq!(
            url,
            "https://alfa-leetcode-api.onrender.com/alice/acSubmission?limit=20"
        );
    }

    #[test]
    fn test_build_url_trailing_slash() {
        let url = build_url("https://leetcode.com/", &["problems", "two-sum", "submit", ""], &[])
            .unwrap();
        assert_eq!(url, "https://leetcode.com/problems/two-sum/submit/");
    }

    #[test]
    fn test_build_url_encodes_segments() {
        let url = build_url("https://x.test", &["a b"], &[]).unwrap();
        assert_eq!(url, "https://x.test/a%20b");
    }

    #[test]
    fn test_build_url_rejects_garbage() {
        assert!(build_url("not a url", &["x"], &[]).is_err());
        assert!(build_url("mailto:a@b.c", &["x"], &[]).is_err());
    }
}
