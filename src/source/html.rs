use scraper::{Html, Node};

/// Elements whose text never belongs to the document body.
const SKIPPED_ELEMENTS: [&str; 5] = ["script", "style", "nav", "footer", "header"];

/// Visible text of `html` with page chrome removed.
///
/// Text nodes are joined with single spaces; callers normalize whitespace.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut parts: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let inside_skipped = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|el| SKIPPED_ELEMENTS.contains(&el.name()))
                .unwrap_or(false)
        });
        if !inside_skipped {
            parts.push(text);
        }
    }

    parts.join(" ")
}
