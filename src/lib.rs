//! twigparser: a small, lossless parser for Shopware-flavoured Twig templates.
//!
//! The parser exists so that template-upgrade tooling can read and rewrite
//! storefront templates structurally instead of treating them as opaque text.
//! It understands a fixed set of tags and keeps everything else verbatim.
//!
//! Supported subset:
//! - `{% block name %} ... {% endblock %}`
//! - `{% for item in items %} ... {% endfor %}`
//! - `{% sw_extends 'path' %}` and `{% sw_extends { template: '...', scopes: [...] } %}`
//! - `{% set a = b %}` and `{% set a %} ... {% endset %}`
//! - `{% autoescape [strategy] %} ... {% endautoescape %}`
//! - `{% deprecated '...' %}` and `{% types key:'value' %}`
//! - `{{ parent() }}` and any other `{{ expr }}`, kept as raw text.
//!
//! Not supported:
//! - Evaluating or rendering anything.
//! - Filters, macros, includes and the rest of the expression grammar.
//!
//! Unknown tags and end tags without a matching opener are kept as literal
//! text, so templates using constructs outside this subset still parse. Only
//! an unclosed `{%` / `{{` or a malformed `sw_extends` / `types` body is an
//! error.
//!
//! Round trip: [`NodeList::dump`] gives back the input for anything written in
//! canonical spelling (`{% block name %}`, `{{ expr }}`, ...). Text outside
//! tags and unknown tags are reproduced byte for byte; `types` values are
//! always re-emitted single-quoted.
//!
//! ```
//! let mut nodes = twigparser::parse_template(
//!     "{% sw_extends '@Storefront/storefront/base.html.twig' %}\n\
//!      {% block base_header %}{{ parent() }}{% endblock %}",
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     nodes.extends().map(|e| e.relative_path()),
//!     Some("storefront/base.html.twig")
//! );
//! assert_eq!(nodes.block_names(), vec!["base_header"]);
//!
//! nodes.traverse(|node| match node {
//!     twigparser::Node::Block(block) if block.delegates_to_parent() => {
//!         twigparser::Node::Text(format!("{{{{ block(\"{}\") }}}}", block.name))
//!     }
//!     other => other,
//! });
//! assert!(nodes.dump().ends_with("{{ block(\"base_header\") }}"));
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
mod literals;
pub mod node_list;
pub mod parser;

pub use ast::{Autoescape, Block, Extends, For, Node, Set, Types, DEFAULT_AUTOESCAPE_STRATEGY};
pub use error::ParseError;
pub use lexer::tokenize_text;
pub use node_list::NodeList;
pub use parser::Parser;

/// Parse a template into its node tree.
///
/// Fails on unclosed `{%` / `{{` delimiters and on malformed `sw_extends` or
/// `types` bodies. No partial tree is returned.
pub fn parse_template(input: &str) -> Result<NodeList, ParseError> {
    Parser::new(input).parse()
}
