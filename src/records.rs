use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Structured extraction result for one rendered page.
///
/// Serialized as the page's `{filename}.json` artifact and aggregated into
/// the run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    /// Canonical URL the page was fetched from
    pub url: String,

    /// Raw page title (may be a fallback name if the page has none)
    pub title: String,

    /// Title-derived slug used for all artifact paths; collision-prone
    pub filename: String,

    /// RFC 3339 timestamp of extraction
    pub scraped_at: String,

    pub meta: PageMeta,
    pub navigation: Vec<NavLink>,
    pub content: PageContent,
    pub images: Vec<ImageRef>,
    pub forms: Vec<FormRecord>,
    pub links: Vec<LinkRef>,
    pub screenshots: Screenshots,
}

/// Meta tags of interest: description, keywords and all Open Graph tags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMeta {
    pub description: String,
    pub keywords: String,
    /// Open Graph property suffix (`og:title` -> `title`) to content
    pub og_tags: BTreeMap<String, String>,
}

/// One entry of the navigation menu structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub text: String,
    pub href: String,
    /// Class of the closest nav/header/[role=navigation] ancestor
    #[serde(default)]
    pub parent: String,
}

/// Textual content of the primary content region
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageContent {
    pub headings: Vec<Heading>,
    pub paragraphs: Vec<String>,
    pub lists: Vec<ListBlock>,
    /// Newline-joined visible text of the content region
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level, 1 through 6
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListBlock {
    #[serde(rename = "type")]
    pub kind: ListKind,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListKind {
    #[serde(rename = "ul")]
    Unordered,
    #[serde(rename = "ol")]
    Ordered,
}

/// An image reference with its source resolved to an absolute URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
    pub title: String,
}

/// A form-like element found in the rendered page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FormRecord {
    /// A native HTML form with its input fields
    #[serde(rename = "form")]
    Native {
        action: String,
        method: String,
        fields: Vec<FormField>,
    },
    /// A third-party embed iframe matching a configured widget marker
    #[serde(rename = "embedded_widget")]
    Widget {
        src: String,
        width: String,
        height: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub id: String,
    pub placeholder: String,
    pub required: bool,
}

/// A same-site outbound link, deduplicated by fragment-stripped URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRef {
    pub text: String,
    pub href: String,
}

/// Paths of the desktop and mobile captures; `None` when a capture failed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Screenshots {
    pub desktop: Option<String>,
    pub mobile: Option<String>,
}
