//! domq HTML - Parser and serializer
//!
//! HTML5 parsing built on html5ever, converted into the `domq_dom` arena,
//! plus the `innerHTML`/`outerHTML` serializer.

mod parser;
mod serializer;

use domq_dom::{Document, DomError, DomTree, NodeId};

pub use parser::HtmlParser;
pub use serializer::{HtmlSerializer, inner_html, outer_html};

/// Parse a full HTML document
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// Parse a body-context fragment, appending the nodes to `parent`
pub fn parse_fragment(html: &str, tree: &mut DomTree, parent: NodeId) -> Result<Vec<NodeId>, HtmlError> {
    HtmlParser::new().parse_fragment(html, tree, parent)
}

/// HTML parsing error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("Failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsed tree could not be built: {0}")]
    Tree(#[from] DomError),
}
