//! JavaScript snippets evaluated in page context through the renderer.
//!
//! These cover the facets that depend on post-render DOM state and cannot be
//! recovered from static markup alone (dynamically inserted menus, widget
//! iframes, resolved anchor hrefs).

/// Collects navigation links from common navigational containers,
/// deduplicated by full structural equality.
pub const NAVIGATION: &str = r#"
const navLinks = [];
const selectors = [
    'nav a',
    '[role="navigation"] a',
    'header a',
    '.menu a',
    '[data-testid="linkElement"]'
];

for (const selector of selectors) {
    document.querySelectorAll(selector).forEach(link => {
        if (link.href && link.textContent.trim()) {
            navLinks.push({
                text: link.textContent.trim(),
                href: link.href,
                parent: link.closest('nav, header, [role="navigation"]')?.className || ''
            });
        }
    });
}

return [...new Set(navLinks.map(JSON.stringify))].map(JSON.parse);
"#;

/// Collects native form descriptors plus embed iframes whose src contains
/// one of the marker substrings passed as `arguments[0]`.
pub const FORMS: &str = r#"
const markers = arguments[0];
const forms = [];

document.querySelectorAll('form').forEach(form => {
    const fields = [];
    form.querySelectorAll('input, textarea, select').forEach(field => {
        fields.push({
            type: field.type || field.tagName.toLowerCase(),
            name: field.name || '',
            id: field.id || '',
            placeholder: field.placeholder || '',
            required: !!field.required
        });
    });

    forms.push({
        type: 'form',
        action: form.action || '',
        method: form.method || '',
        fields: fields
    });
});

document.querySelectorAll('iframe').forEach(iframe => {
    const src = iframe.src;
    if (src && markers.some(m => src.includes(m))) {
        forms.push({
            type: 'embedded_widget',
            src: src,
            width: String(iframe.width || ''),
            height: String(iframe.height || '')
        });
    }
});

return forms;
"#;

/// Collects anchors whose resolved hostname equals `arguments[0]`,
/// fragment-stripped (query kept), deduplicated in first-seen order.
pub const SITE_LINKS: &str = r#"
const siteHostname = arguments[0];
const links = [];
const seenUrls = new Set();

document.querySelectorAll('a[href]').forEach(link => {
    try {
        const url = new URL(link.href);
        if (url.hostname === siteHostname) {
            const cleanUrl = url.origin + url.pathname + url.search;
            if (!seenUrls.has(cleanUrl)) {
                seenUrls.add(cleanUrl);
                links.push({
                    text: link.textContent.trim(),
                    href: cleanUrl
                });
            }
        }
    } catch (e) {
        // skip invalid URLs
    }
});

return links;
"#;
