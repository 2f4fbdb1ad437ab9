//! Structural extraction from search-result and job-posting HTML.
//!
//! Result nodes are located by their class attribute (`result-link` /
//! `result-snippet` on the lite search page, `result__a` / `result__snippet`
//! on the html page). Anything outside those nodes is ignored.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use url::Url;

static RE_ANCHOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<a\s([^>]*)>(.*?)</a>").unwrap());

static RE_RESULT_LINK_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)class\s*=\s*['"][^'"]*\bresult(?:-link|__a)\b[^'"]*['"]"#).unwrap()
});

static RE_RESULT_SNIPPET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<(?:td|a|div)\s[^>]*class\s*=\s*['"][^'"]*\bresult(?:-snippet|__snippet)\b[^'"]*['"][^>]*>(.*?)</(?:td|a|div)>"#,
    )
    .unwrap()
});

static RE_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)href\s*=\s*['"]([^'"]+)['"]"#).unwrap());

static RE_NON_CONTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b.*?</script>|<style\b.*?</style>|<noscript\b.*?</noscript>|<!--.*?-->")
        .unwrap()
});

static RE_BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<body[^>]*>(.*)</body>").unwrap());

static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

static RE_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").unwrap());

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// One matched result node on a search results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub url: Option<String>,
    pub snippet: String,
}

/// Parses result links and snippets in document order. Each snippet belongs
/// to the nearest result link before it; a result without a snippet keeps an
/// empty one, and a snippet with no open result becomes a title-less hit.
pub fn parse_search_results(html: &str) -> Vec<SearchHit> {
    let links = RE_ANCHOR
        .captures_iter(html)
        .filter(|caps| RE_RESULT_LINK_CLASS.is_match(&caps[1]))
        .filter_map(|caps| {
            let start = caps.get(0)?.start();
            let url = RE_HREF
                .captures(&caps[1])
                .and_then(|h| resolve_result_url(&decode_entities(&h[1])));
            Some((start, strip_tags(&caps[2]), url))
        });
    let snippets = RE_RESULT_SNIPPET
        .captures_iter(html)
        .filter_map(|caps| Some((caps.get(0)?.start(), strip_tags(&caps[1]))));

    let mut nodes: Vec<(usize, ResultNode)> = links
        .map(|(start, title, url)| (start, ResultNode::Link { title, url }))
        .chain(snippets.map(|(start, text)| (start, ResultNode::Snippet(text))))
        .collect();
    nodes.sort_by_key(|(start, _)| *start);

    let mut hits: Vec<SearchHit> = Vec::new();
    // Whether the last hit is a link still waiting for its snippet.
    let mut open = false;
    for (_, node) in nodes {
        match node {
            ResultNode::Link { title, url } => {
                hits.push(SearchHit {
                    title,
                    url,
                    snippet: String::new(),
                });
                open = true;
            }
            ResultNode::Snippet(text) if text.is_empty() => {}
            ResultNode::Snippet(text) => {
                let pending = if open { hits.last_mut() } else { None };
                match pending {
                    Some(hit) => {
                        hit.snippet = text;
                        open = false;
                    }
                    None => hits.push(SearchHit {
                        title: String::new(),
                        url: None,
                        snippet: text,
                    }),
                }
            }
        }
    }

    hits.retain(|hit| !hit.title.is_empty() || !hit.snippet.is_empty());
    hits
}

enum ResultNode {
    Link { title: String, url: Option<String> },
    Snippet(String),
}

/// Text of every snippet node, in document order.
pub fn parse_snippets(html: &str) -> Vec<String> {
    RE_RESULT_SNIPPET
        .captures_iter(html)
        .map(|caps| strip_tags(&caps[1]))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Visible text of a whole page: scripts and styles dropped, body only,
/// whitespace collapsed.
pub fn extract_page_text(html: &str) -> String {
    let cleaned = RE_NON_CONTENT.replace_all(html, " ");
    let body = RE_BODY
        .captures(&cleaned)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| cleaned.to_string());
    strip_tags(&body)
}

/// Removes markup, decodes entities and collapses whitespace.
pub fn strip_tags(fragment: &str) -> String {
    let text = RE_TAG.replace_all(fragment, " ");
    let text = decode_entities(&text);
    RE_WHITESPACE.replace_all(&text, " ").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    RE_ENTITY
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    _ => None,
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Unwraps search-engine redirect links (`//duckduckgo.com/l/?uddg=...`)
/// and keeps only absolute http(s) targets.
fn resolve_result_url(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };
    let parsed = Url::parse(&absolute).ok()?;

    if let Some((_, target)) = parsed.query_pairs().find(|(k, _)| k == "uddg") {
        return Url::parse(&target)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .map(|u| u.to_string());
    }

    matches!(parsed.scheme(), "http" | "https").then(|| parsed.to_string())
}
