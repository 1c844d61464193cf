//! HTML steps built on `scraper`.

use scraper::{Html, Node, Selector};

use crate::error::TransformError;

/// Elements whose text is not document content.
const SKIPPED: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that start a new line in the extracted text.
const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Replace markup with its text content. Block elements start a new line;
/// script and style contents are dropped.
pub fn strip_tags(text: &str) -> String {
    let document = Html::parse_document(text);
    let mut out = String::with_capacity(text.len());
    for node in document.root_element().descendants() {
        match node.value() {
            Node::Element(element) if BLOCKS.contains(&element.name()) => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Node::Text(chunk) => {
                let skipped = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .is_some_and(|el| SKIPPED.contains(&el.name()))
                });
                if !skipped {
                    out.push_str(chunk);
                }
            }
            _ => {}
        }
    }
    out
}

/// Keep the outer HTML of every element matching `selector`, one per line.
pub fn select(text: &str, selector: &str) -> Result<String, TransformError> {
    let parsed = Selector::parse(selector).map_err(|e| TransformError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })?;
    let document = Html::parse_document(text);
    let matches: Vec<String> = document.select(&parsed).map(|el| el.html()).collect();
    if matches.is_empty() {
        return Err(TransformError::NoMatch {
            selector: selector.to_string(),
        });
    }
    Ok(matches.join("\n"))
}
