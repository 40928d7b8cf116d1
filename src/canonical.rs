use url::Url;

/// Canonical form used everywhere a URL becomes a crawl key: scheme + host +
/// path, with both the fragment and the query dropped. Dropping the query is
/// what guarantees termination on sites that generate unbounded
/// query-string variations of the same page.
///
/// Non-HTTP(S) and malformed URLs canonicalize to `None` and are excluded
/// silently rather than treated as errors.
pub fn frontier_key(raw: &str) -> Option<String> {
    let mut url = parse_http(raw)?;
    url.set_fragment(None);
    url.set_query(None);
    Some(url.to_string())
}

/// Canonical form for de-duplicating outbound links within a single page:
/// the fragment is dropped but the query is kept, so distinct query-driven
/// views remain distinct entries in the page record.
pub fn link_key(raw: &str) -> Option<String> {
    let mut url = parse_http(raw)?;
    url.set_fragment(None);
    Some(url.to_string())
}

/// Same-site membership compares hostnames only; scheme and port are
/// deliberately ignored.
pub fn same_site(raw: &str, site: &Url) -> bool {
    match Url::parse(raw) {
        Ok(url) => url.host_str().is_some() && url.host_str() == site.host_str(),
        Err(_) => false,
    }
}

fn parse_http(raw: &str) -> Option<Url> {
    let url = Url::parse(raw).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontier_key_drops_query_and_fragment() {
        let key = frontier_key("https://example.com/about?utm=1#team").unwrap();
        assert_eq!(key, "https://example.com/about");
    }

    #[test]
    fn test_link_key_keeps_query() {
        let key = link_key("https://example.com/search?q=news#results").unwrap();
        assert_eq!(key, "https://example.com/search?q=news");
    }

    #[test]
    fn test_canonicalization_is_idempotent() {
        for raw in [
            "https://example.com",
            "https://example.com/a/b?x=1#frag",
            "http://example.com/page.html",
        ] {
            let once = frontier_key(raw).unwrap();
            assert_eq!(frontier_key(&once).unwrap(), once);

            let once = link_key(raw).unwrap();
            assert_eq!(link_key(&once).unwrap(), once);
        }
    }

    #[test]
    fn test_non_http_urls_are_excluded() {
        assert!(frontier_key("mailto:info@example.com").is_none());
        assert!(frontier_key("javascript:void(0)").is_none());
        assert!(frontier_key("not a url").is_none());
        assert!(link_key("ftp://example.com/file").is_none());
    }

    #[test]
    fn test_same_site_compares_hostname_only() {
        let site = Url::parse("https://example.com").unwrap();
        assert!(same_site("http://example.com:8080/page", &site));
        assert!(!same_site("https://other.example/page", &site));
        assert!(!same_site("mailto:info@example.com", &site));
    }
}
