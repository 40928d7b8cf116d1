use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));
static SLUG_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid regex"));

/// Derive an artifact slug from a page title: strip everything but word
/// characters, whitespace and hyphens, collapse separator runs to a single
/// hyphen, lowercase, truncate to 50 characters.
///
/// This is a best-effort display slug, not a unique key; two distinct titles
/// can collapse to the same filename and the later page overwrites the
/// earlier artifacts.
pub fn slugify(title: &str) -> String {
    let stripped = NON_SLUG_CHARS.replace_all(title, "");
    let joined = SLUG_SEPARATORS.replace_all(&stripped, "-");
    joined.to_lowercase().chars().take(50).collect()
}

/// Last path segment of a URL, used as the local media filename.
/// Returns `None` for URLs with an empty path.
pub fn url_basename(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let name = url.path_segments()?.next_back()?.to_string();
    if name.is_empty() { None } else { Some(name) }
}
